// src/middleware/tenancy.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::authenticate,
    models::tenancy::TenantRole,
};

// Cabeçalho opcional para escolher o inquilino quando o usuário tem vários
const TENANT_ID_HEADER: &str = "x-tenant-id";

/// A "sessão" explícita de uma requisição: quem é o usuário, em qual
/// inquilino está operando e com qual papel. É passada aos serviços.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantContext {
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub role: TenantRole,
}

impl TenantContext {
    pub fn require_admin(&self) -> Result<(), AppError> {
        match self.role {
            TenantRole::Admin => Ok(()),
            TenantRole::User => Err(AppError::AdminRequired),
        }
    }
}

/// Resultado da resolução do inquilino. `NoAccess` não é erro por si só:
/// a listagem de lançamentos responde vazia com um aviso.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantAccess {
    Granted(TenantContext),
    NoAccess,
}

impl TenantAccess {
    pub fn context(self) -> Result<TenantContext, AppError> {
        match self {
            TenantAccess::Granted(ctx) => Ok(ctx),
            TenantAccess::NoAccess => Err(AppError::NoTenantAccess),
        }
    }
}

fn requested_tenant(headers: &HeaderMap) -> Result<Option<Uuid>, AppError> {
    match headers.get(TENANT_ID_HEADER) {
        None => Ok(None),
        Some(value) => value
            .to_str()
            .ok()
            .and_then(|s| Uuid::parse_str(s.trim()).ok())
            .map(Some)
            .ok_or_else(|| AppError::InvalidFilter(TENANT_ID_HEADER.to_string())),
    }
}

// Autentica e resolve o inquilino do usuário (primeiro passo de toda consulta)
pub async fn tenant_guard(
    State(app_state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(&app_state, bearer).await?;
    let requested = requested_tenant(request.headers())?;

    let membership = app_state
        .tenant_service
        .resolve_membership(user.0.id, requested)
        .await?;

    let access = match membership {
        Some(m) => TenantAccess::Granted(TenantContext {
            tenant_id: m.tenant_id,
            user_id: m.user_id,
            role: m.role,
        }),
        None => {
            tracing::warn!("Usuário {} sem associação de inquilino", user.0.id);
            TenantAccess::NoAccess
        }
    };

    request.extensions_mut().insert(user);
    request.extensions_mut().insert(access);
    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for TenantAccess
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TenantAccess>()
            .copied()
            .ok_or(AppError::InvalidToken)
    }
}

impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        TenantAccess::from_request_parts(parts, state).await?.context()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn ctx(role: TenantRole) -> TenantContext {
        TenantContext { tenant_id: Uuid::new_v4(), user_id: Uuid::new_v4(), role }
    }

    #[test]
    fn only_admins_pass_require_admin() {
        assert!(ctx(TenantRole::Admin).require_admin().is_ok());
        assert!(matches!(ctx(TenantRole::User).require_admin(), Err(AppError::AdminRequired)));
    }

    #[test]
    fn no_access_is_an_error_only_when_a_context_is_demanded() {
        assert!(matches!(TenantAccess::NoAccess.context(), Err(AppError::NoTenantAccess)));
        let granted = ctx(TenantRole::User);
        assert_eq!(TenantAccess::Granted(granted).context().unwrap(), granted);
    }

    #[test]
    fn tenant_header_is_optional_but_must_be_a_uuid() {
        let mut headers = HeaderMap::new();
        assert_eq!(requested_tenant(&headers).unwrap(), None);

        let id = Uuid::new_v4();
        headers.insert(TENANT_ID_HEADER, HeaderValue::from_str(&id.to_string()).unwrap());
        assert_eq!(requested_tenant(&headers).unwrap(), Some(id));

        headers.insert(TENANT_ID_HEADER, HeaderValue::from_static("loja-1"));
        assert!(requested_tenant(&headers).is_err());
    }
}
