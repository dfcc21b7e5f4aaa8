// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::middleware::i18n::Locale;

// Erros internos da aplicação. Cada variante vira um "aviso" para o usuário
// através de `to_api_error`, já no idioma pedido pelo cliente.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Filtro inválido: {0}")]
    InvalidFilter(String),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Slug '{0}' já está em uso")]
    TenantSlugAlreadyExists(String),

    #[error("Categoria '{0}' já existe")]
    CategoryNameAlreadyExists(String),

    #[error("Referência inválida: {0}")]
    InvalidReference(String),

    #[error("Usuário sem acesso a nenhum inquilino")]
    NoTenantAccess,

    #[error("Ação permitida apenas para administradores")]
    AdminRequired,

    #[error("Registro não encontrado: {0}")]
    ResourceNotFound(&'static str),

    #[error("Registro em uso: {0}")]
    ResourceInUse(&'static str),

    #[error("Nada para testar")]
    NothingToTest,

    #[error("Token do bot ou Chat ID não configurados")]
    TelegramNotConfigured,

    #[error("Falha no relay de mensagens: {0}")]
    RelayError(String),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Erro do cliente HTTP: {0}")]
    HttpClientError(#[from] reqwest::Error),
}

// O erro que efetivamente sai pela API
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self { status, error: error.into(), details: None }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    /// Converte o erro interno num aviso para o usuário.
    /// Erros inesperados são logados aqui e nunca expostos ao cliente.
    pub fn to_api_error(&self, locale: &Locale) -> ApiError {
        let en = locale.is_english();
        let pick = |pt: &str, english: &str| if en { english.to_string() } else { pt.to_string() };

        match self {
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<Value> = field_errors
                        .iter()
                        .map(|e| {
                            let msg = e.message.as_ref().map(|m| m.to_string()).unwrap_or_else(|| e.code.to_string());
                            Value::String(msg)
                        })
                        .collect();
                    details.insert(wire_field_name(&field), Value::Array(messages));
                }
                ApiError {
                    status: StatusCode::BAD_REQUEST,
                    error: pick("Um ou mais campos são inválidos.", "One or more fields are invalid."),
                    details: Some(Value::Object(details)),
                }
            }
            AppError::InvalidFilter(field) => ApiError::new(
                StatusCode::BAD_REQUEST,
                if en { format!("Invalid filter value for '{}'.", field) } else { format!("Valor de filtro inválido para '{}'.", field) },
            ),
            AppError::EmailAlreadyExists => ApiError::new(
                StatusCode::CONFLICT,
                pick("Este e-mail já está em uso.", "This e-mail is already in use."),
            ),
            AppError::InvalidCredentials => ApiError::new(
                StatusCode::UNAUTHORIZED,
                pick("E-mail ou senha inválidos.", "Invalid e-mail or password."),
            ),
            AppError::InvalidToken => ApiError::new(
                StatusCode::UNAUTHORIZED,
                pick("Token de autenticação inválido ou ausente.", "Missing or invalid authentication token."),
            ),
            AppError::UserNotFound => ApiError::new(
                StatusCode::NOT_FOUND,
                pick("Usuário não encontrado.", "User not found."),
            ),
            AppError::TenantSlugAlreadyExists(slug) => ApiError::new(
                StatusCode::CONFLICT,
                if en { format!("The slug '{}' is already in use.", slug) } else { format!("O slug '{}' já está em uso.", slug) },
            ),
            AppError::CategoryNameAlreadyExists(name) => ApiError::new(
                StatusCode::CONFLICT,
                if en { format!("A category named '{}' already exists.", name) } else { format!("Já existe uma categoria com o nome '{}'.", name) },
            ),
            AppError::InvalidReference(field) => ApiError::new(
                StatusCode::BAD_REQUEST,
                if en { format!("'{}' does not reference a record of this tenant.", field) } else { format!("'{}' não referencia um registro deste inquilino.", field) },
            ),
            AppError::NoTenantAccess => ApiError::new(
                StatusCode::FORBIDDEN,
                pick("Você não tem acesso a nenhum inquilino.", "You do not have access to any tenant."),
            ),
            AppError::AdminRequired => ApiError::new(
                StatusCode::FORBIDDEN,
                pick("Apenas administradores podem realizar esta ação.", "Only administrators can perform this action."),
            ),
            AppError::ResourceNotFound(what) => ApiError::new(
                StatusCode::NOT_FOUND,
                if en { format!("{} not found.", what) } else { format!("{} não encontrado(a).", what) },
            ),
            AppError::ResourceInUse(what) => ApiError::new(
                StatusCode::CONFLICT,
                if en { format!("{} is referenced by transactions and cannot be deleted.", what) } else { format!("{} está em uso por lançamentos e não pode ser excluído(a).", what) },
            ),
            AppError::NothingToTest => ApiError::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                pick("Nenhum lançamento encontrado para teste.", "Nothing to test: no transactions or settings found."),
            ),
            AppError::TelegramNotConfigured => ApiError::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                pick("Token do bot ou Chat ID não configurados.", "Bot token or chat ID not configured."),
            ),
            AppError::RelayError(reason) => {
                tracing::warn!("Falha ao enviar notificação: {}", reason);
                ApiError::new(
                    StatusCode::BAD_GATEWAY,
                    pick("Erro ao enviar notificações de teste.", "Failed to send test notifications."),
                )
            }
            e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                ApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    pick("Ocorreu um erro inesperado.", "An unexpected error occurred."),
                )
            }
        }
    }
}

// O validator reporta o nome do campo em Rust; o cliente conhece o nome do JSON
fn wire_field_name(field: &str) -> String {
    if field == "kind" {
        return "type".to_string();
    }
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

// Usado pelos middlewares, que rejeitam antes de conhecer o idioma
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Payload {
        #[validate(length(min = 1, message = "Nome é obrigatório"))]
        name: String,
    }

    #[test]
    fn validation_errors_carry_field_details() {
        let errors = Payload { name: String::new() }.validate().unwrap_err();
        let api = AppError::ValidationError(errors).to_api_error(&Locale::default());

        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        let details = api.details.unwrap();
        assert_eq!(details["name"][0], "Nome é obrigatório");
    }

    #[test]
    fn validation_details_use_json_field_names() {
        let payload: crate::models::transaction::TransactionPayload = serde_json::from_value(json!({
            "description": "Aluguel",
            "supplier": "Imobiliária",
            "unit": "vila_velha",
            "amount": 0
        }))
        .unwrap();
        let errors = payload.validate().unwrap_err();
        let details = AppError::ValidationError(errors).to_api_error(&Locale::default()).details.unwrap();

        for field in ["dueDate", "categoryId", "status", "type", "amount"] {
            assert!(details.get(field).is_some(), "faltou detalhe para {}", field);
        }
        assert!(details.get("due_date").is_none());
        assert!(details.get("kind").is_none());
        assert_eq!(details["dueDate"][0], "Data de vencimento é obrigatória");
    }

    #[test]
    fn snake_case_fields_become_camel_case() {
        assert_eq!(wire_field_name("actual_amount"), "actualAmount");
        assert_eq!(wire_field_name("payment_method_id"), "paymentMethodId");
        assert_eq!(wire_field_name("name"), "name");
        assert_eq!(wire_field_name("kind"), "type");
    }

    #[test]
    fn known_conflicts_map_to_409_with_specific_message() {
        let api = AppError::TenantSlugAlreadyExists("acme".into()).to_api_error(&Locale::default());
        assert_eq!(api.status, StatusCode::CONFLICT);
        assert!(api.error.contains("acme"));
    }

    #[test]
    fn english_locale_translates_notices() {
        let api = AppError::NothingToTest.to_api_error(&Locale("en".into()));
        assert_eq!(api.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(api.error.starts_with("Nothing to test"));
    }

    #[test]
    fn relay_failures_collapse_into_one_generic_notice() {
        let api = AppError::RelayError("timeout".into()).to_api_error(&Locale::default());
        assert_eq!(api.status, StatusCode::BAD_GATEWAY);
        assert_eq!(api.error, "Erro ao enviar notificações de teste.");
    }

    #[test]
    fn internal_errors_are_not_leaked() {
        let api = AppError::InternalServerError(anyhow::anyhow!("segredo")).to_api_error(&Locale::default());
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!api.error.contains("segredo"));
    }
}
