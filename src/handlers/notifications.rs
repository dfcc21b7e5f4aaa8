// src/handlers/notifications.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{i18n::Locale, tenancy::TenantContext},
    models::notification::{NotificationTestRequest, NotificationTestResponse},
    services::template::{available_variables, VariableInfo},
};

// POST /api/notifications/test
#[utoipa::path(
    post,
    path = "/api/notifications/test",
    tag = "Notifications",
    request_body = NotificationTestRequest,
    params(("x-tenant-id" = Option<Uuid>, Header, description = "ID da empresa")),
    responses(
        (status = 200, description = "Mensagens enviadas ao Telegram", body = NotificationTestResponse),
        (status = 422, description = "Nada para testar ou Telegram não configurado"),
        (status = 502, description = "Falha no envio")
    ),
    security(("api_jwt" = []))
)]
pub async fn send_test_notification(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Json(payload): Json<NotificationTestRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let sent = app_state
        .notification_service
        .send_test(&tenant, payload.message_template.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let message = if locale.is_english() {
        format!("{} test messages sent.", sent)
    } else {
        format!("{} mensagens de teste enviadas.", sent)
    };

    Ok((StatusCode::OK, Json(NotificationTestResponse { sent, message })))
}

// GET /api/notifications/variables
#[utoipa::path(
    get,
    path = "/api/notifications/variables",
    tag = "Notifications",
    responses(
        (status = 200, description = "Variáveis aceitas no modelo de mensagem", body = Vec<VariableInfo>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_variables() -> Json<Vec<VariableInfo>> {
    Json(available_variables())
}
