// src/handlers/settings.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{i18n::Locale, tenancy::TenantContext},
    models::settings::{SettingsView, UpdateSettingsRequest},
};

// GET /api/settings
#[utoipa::path(
    get,
    path = "/api/settings",
    tag = "Settings",
    params(("x-tenant-id" = Option<Uuid>, Header, description = "ID da empresa")),
    responses(
        (status = 200, description = "Configurações da empresa (segredos mascarados para não administradores)", body = SettingsView),
        (status = 403, description = "Sem acesso a nenhuma empresa")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_settings(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    let settings = app_state
        .settings_service
        .get(&tenant)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(settings)))
}

// PUT /api/settings
#[utoipa::path(
    put,
    path = "/api/settings",
    tag = "Settings",
    request_body = UpdateSettingsRequest,
    params(("x-tenant-id" = Option<Uuid>, Header, description = "ID da empresa")),
    responses(
        (status = 200, description = "Configurações salvas", body = SettingsView),
        (status = 400, description = "Horário, status ou dias inválidos"),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_settings(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Json(payload): Json<UpdateSettingsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = app_state
        .settings_service
        .update(&tenant, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(updated)))
}
