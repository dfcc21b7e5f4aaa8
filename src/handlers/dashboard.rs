// src/handlers/dashboard.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid; // Importante para o Swagger params

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{i18n::Locale, tenancy::TenantAccess},
    models::{dashboard::DashboardReport, transaction::TransactionQuery},
};

// GET /api/dashboard
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Dashboard",
    params(
        TransactionQuery,
        ("x-tenant-id" = Option<Uuid>, Header, description = "ID da empresa")
    ),
    responses(
        (status = 200, description = "Resumo, distribuição por categoria e fluxo mensal", body = DashboardReport),
        (status = 400, description = "Filtro inválido"),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_dashboard(
    State(app_state): State<AppState>,
    locale: Locale,
    access: TenantAccess,
    Query(query): Query<TransactionQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let report = app_state
        .dashboard_service
        .report(access, &query, &locale)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(report)))
}
