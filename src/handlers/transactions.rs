// src/handlers/transactions.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        i18n::Locale,
        tenancy::{TenantAccess, TenantContext},
    },
    models::transaction::{
        TransactionDetail, TransactionListResponse, TransactionPayload, TransactionQuery,
    },
};

// GET /api/transactions
#[utoipa::path(
    get,
    path = "/api/transactions",
    tag = "Transactions",
    params(
        TransactionQuery,
        ("x-tenant-id" = Option<Uuid>, Header, description = "ID da empresa")
    ),
    responses(
        (status = 200, description = "Lançamentos filtrados (vazio com aviso se não houver empresa)", body = TransactionListResponse),
        (status = 400, description = "Filtro inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_transactions(
    State(app_state): State<AppState>,
    locale: Locale,
    access: TenantAccess,
    Query(query): Query<TransactionQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let response = app_state
        .transaction_service
        .list(access, &query, &locale)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(response)))
}

// GET /api/transactions/{id}
#[utoipa::path(
    get,
    path = "/api/transactions/{id}",
    tag = "Transactions",
    params(
        ("id" = Uuid, Path, description = "ID do lançamento"),
        ("x-tenant-id" = Option<Uuid>, Header, description = "ID da empresa")
    ),
    responses(
        (status = 200, description = "Lançamento", body = TransactionDetail),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_transaction(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let transaction = app_state
        .transaction_service
        .get(&tenant, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(transaction)))
}

// POST /api/transactions
#[utoipa::path(
    post,
    path = "/api/transactions",
    tag = "Transactions",
    request_body = TransactionPayload,
    params(
        ("x-tenant-id" = Option<Uuid>, Header, description = "ID da empresa")
    ),
    responses(
        (status = 201, description = "Lançamento criado", body = TransactionDetail),
        (status = 400, description = "Dados inválidos ou referência de outra empresa"),
        (status = 403, description = "Sem acesso a nenhuma empresa")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_transaction(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Json(payload): Json<TransactionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let transaction = app_state
        .transaction_service
        .create(&tenant, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

// PUT /api/transactions/{id}
#[utoipa::path(
    put,
    path = "/api/transactions/{id}",
    tag = "Transactions",
    request_body = TransactionPayload,
    params(
        ("id" = Uuid, Path, description = "ID do lançamento"),
        ("x-tenant-id" = Option<Uuid>, Header, description = "ID da empresa")
    ),
    responses(
        (status = 200, description = "Lançamento atualizado", body = TransactionDetail),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_transaction(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransactionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let transaction = app_state
        .transaction_service
        .update(&tenant, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(transaction)))
}

// DELETE /api/transactions/{id}
#[utoipa::path(
    delete,
    path = "/api/transactions/{id}",
    tag = "Transactions",
    params(
        ("id" = Uuid, Path, description = "ID do lançamento"),
        ("x-tenant-id" = Option<Uuid>, Header, description = "ID da empresa")
    ),
    responses(
        (status = 204, description = "Lançamento excluído"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_transaction(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .transaction_service
        .delete(&tenant, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}
