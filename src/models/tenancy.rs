// src/models/tenancy.rs

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

static SLUG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9-]+$").expect("regex de slug inválida")
});

// Slug: apenas letras minúsculas, números e hífens, com no mínimo 2 caracteres
pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if slug.chars().count() < 2 || !SLUG_PATTERN.is_match(slug) {
        let mut err = ValidationError::new("slug");
        err.message = Some("Slug deve conter apenas letras minúsculas, números e hífens (mínimo 2).".into());
        return Err(err);
    }
    Ok(())
}

// Nome do inquilino: pelo menos 2 caracteres, sem contar espaços nas pontas
pub fn validate_tenant_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().chars().count() < 2 {
        return Err(ValidationError::new("length"));
    }
    Ok(())
}

// Papel do usuário dentro de um inquilino
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "tenant_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TenantRole {
    Admin,
    User,
}

// ---
// 1. Tenant (O "Inquilino")
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: Uuid,
    #[schema(example = "Clínica Vila Velha")]
    pub name: String,
    #[schema(example = "clinica-vila-velha")]
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

// ---
// 2. TenantMembership (A "Ponte" Usuário-Tenant)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TenantMembership {
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    pub role: TenantRole,
    pub created_at: DateTime<Utc>,
}

// Inquilino visto pelo usuário logado (com o papel dele)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MyTenant {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub role: TenantRole,
    pub created_at: DateTime<Utc>,
}

// Linha da tela de usuários
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TenantMember {
    pub id: Uuid,
    pub email: String,
    pub role: TenantRole,
    pub tenant_id: Uuid,
    pub tenant_name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTenantPayload {
    #[validate(custom(function = "validate_tenant_name", message = "Nome deve ter pelo menos 2 caracteres"))]
    #[schema(example = "Clínica Vila Velha")]
    pub name: String,

    #[validate(custom(function = "validate_slug"))]
    #[schema(example = "clinica-vila-velha")]
    pub slug: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserPayload {
    #[validate(email(message = "Email inválido"))]
    pub email: String,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres"))]
    pub password: String,

    pub tenant_id: Uuid,

    pub role: TenantRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_accepts_lowercase_digits_and_hyphens() {
        assert!(validate_slug("empresa-1").is_ok());
        assert!(validate_slug("ab").is_ok());
    }

    #[test]
    fn slug_rejects_everything_else() {
        for bad in ["a", "", "Empresa", "com espaço", "acentuação", "under_score", "ponto.com"] {
            assert!(validate_slug(bad).is_err(), "slug {:?} deveria ser inválido", bad);
        }
    }

    #[test]
    fn create_tenant_payload_validates_name_and_slug() {
        let payload = CreateTenantPayload { name: "X".into(), slug: "X Y".into() };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
        assert!(errors.field_errors().contains_key("slug"));

        let ok = CreateTenantPayload { name: "Loja".into(), slug: "loja".into() };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn tenant_name_is_measured_without_surrounding_spaces() {
        let padded = CreateTenantPayload { name: " a ".into(), slug: "loja".into() };
        let errors = padded.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));

        let blank = CreateTenantPayload { name: "    ".into(), slug: "loja".into() };
        assert!(blank.validate().is_err());

        let ok = CreateTenantPayload { name: " Lo ".into(), slug: "loja".into() };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn roles_use_lowercase_wire_names() {
        let role: TenantRole = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, TenantRole::Admin);
        assert_eq!(serde_json::to_string(&TenantRole::User).unwrap(), "\"user\"");
    }
}
