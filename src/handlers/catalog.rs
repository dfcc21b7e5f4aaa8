// src/handlers/catalog.rs
// Plano de contas e formas de pagamento

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{i18n::Locale, tenancy::TenantContext},
    models::catalog::{Category, CategoryPayload, PaymentMethod, PaymentMethodPayload},
};

// =========================================================================
//  CATEGORIAS
// =========================================================================

#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "Categories",
    params(("x-tenant-id" = Option<Uuid>, Header, description = "ID da empresa")),
    responses((status = 200, description = "Plano de contas, por nome", body = Vec<Category>)),
    security(("api_jwt" = []))
)]
pub async fn list_categories(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    let categories = app_state
        .catalog_service
        .list_categories(&tenant)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(categories)))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    tag = "Categories",
    request_body = CategoryPayload,
    params(("x-tenant-id" = Option<Uuid>, Header, description = "ID da empresa")),
    responses(
        (status = 201, description = "Categoria criada", body = Category),
        (status = 409, description = "Já existe uma categoria com esse nome")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_category(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Json(payload): Json<CategoryPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let category = app_state
        .catalog_service
        .create_category(&tenant, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(category)))
}

#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    tag = "Categories",
    request_body = CategoryPayload,
    params(
        ("id" = Uuid, Path, description = "ID da categoria"),
        ("x-tenant-id" = Option<Uuid>, Header, description = "ID da empresa")
    ),
    responses(
        (status = 200, description = "Categoria atualizada", body = Category),
        (status = 404, description = "Não encontrada"),
        (status = 409, description = "Já existe uma categoria com esse nome")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_category(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let category = app_state
        .catalog_service
        .update_category(&tenant, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(category)))
}

#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    tag = "Categories",
    params(
        ("id" = Uuid, Path, description = "ID da categoria"),
        ("x-tenant-id" = Option<Uuid>, Header, description = "ID da empresa")
    ),
    responses(
        (status = 204, description = "Categoria excluída"),
        (status = 409, description = "Categoria usada por lançamentos")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_category(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .catalog_service
        .delete_category(&tenant, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}

// =========================================================================
//  FORMAS DE PAGAMENTO
// =========================================================================

#[utoipa::path(
    get,
    path = "/api/payment-methods",
    tag = "Payment Methods",
    params(("x-tenant-id" = Option<Uuid>, Header, description = "ID da empresa")),
    responses((status = 200, description = "Formas de pagamento, por nome", body = Vec<PaymentMethod>)),
    security(("api_jwt" = []))
)]
pub async fn list_payment_methods(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    let methods = app_state
        .catalog_service
        .list_payment_methods(&tenant)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(methods)))
}

#[utoipa::path(
    post,
    path = "/api/payment-methods",
    tag = "Payment Methods",
    request_body = PaymentMethodPayload,
    params(("x-tenant-id" = Option<Uuid>, Header, description = "ID da empresa")),
    responses((status = 201, description = "Forma de pagamento criada", body = PaymentMethod)),
    security(("api_jwt" = []))
)]
pub async fn create_payment_method(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Json(payload): Json<PaymentMethodPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let method = app_state
        .catalog_service
        .create_payment_method(&tenant, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(method)))
}

#[utoipa::path(
    put,
    path = "/api/payment-methods/{id}",
    tag = "Payment Methods",
    request_body = PaymentMethodPayload,
    params(
        ("id" = Uuid, Path, description = "ID da forma de pagamento"),
        ("x-tenant-id" = Option<Uuid>, Header, description = "ID da empresa")
    ),
    responses(
        (status = 200, description = "Forma de pagamento atualizada", body = PaymentMethod),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_payment_method(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<PaymentMethodPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let method = app_state
        .catalog_service
        .update_payment_method(&tenant, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(method)))
}

#[utoipa::path(
    delete,
    path = "/api/payment-methods/{id}",
    tag = "Payment Methods",
    params(
        ("id" = Uuid, Path, description = "ID da forma de pagamento"),
        ("x-tenant-id" = Option<Uuid>, Header, description = "ID da empresa")
    ),
    responses(
        (status = 204, description = "Forma de pagamento excluída"),
        (status = 409, description = "Forma de pagamento usada por lançamentos")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_payment_method(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .catalog_service
        .delete_payment_method(&tenant, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}
