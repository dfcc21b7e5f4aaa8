// src/models/catalog.rs
// Cadastros de apoio: plano de contas e formas de pagamento

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::transaction::validate_not_blank;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,

    #[schema(ignore)]
    pub tenant_id: Uuid,

    #[schema(example = "Despesas Fixas")]
    pub name: String,

    #[schema(example = "Aluguel, energia, internet")]
    pub description: Option<String>,

    #[schema(example = true)]
    pub is_active: Option<bool>,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPayload {
    #[validate(custom(function = "validate_not_blank", message = "Nome é obrigatório"))]
    #[schema(example = "Despesas Fixas")]
    pub name: String,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    pub id: Uuid,

    #[schema(ignore)]
    pub tenant_id: Uuid,

    #[schema(example = "Cartão de Crédito")]
    pub name: String,

    #[schema(example = "Parcelamento em até 12x")]
    pub description: Option<String>,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodPayload {
    #[validate(custom(function = "validate_not_blank", message = "Nome é obrigatório"))]
    #[schema(example = "PIX")]
    pub name: String,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_required() {
        let category = CategoryPayload { name: String::new(), description: None, is_active: None };
        assert!(category.validate().is_err());

        let method = PaymentMethodPayload { name: "PIX".into(), description: None };
        assert!(method.validate().is_ok());
    }

    #[test]
    fn whitespace_only_names_are_rejected() {
        let category = CategoryPayload { name: "   ".into(), description: None, is_active: Some(true) };
        let errors = category.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));

        let method = PaymentMethodPayload { name: "\n ".into(), description: None };
        assert!(method.validate().is_err());
    }
}
