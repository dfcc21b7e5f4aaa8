// src/models/transaction.rs

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::common::error::AppError;

// Valor usado pelos filtros do front para "não filtrar"
pub const FILTER_ALL: &str = "all";

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "transaction_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Entrada,
    Saida,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "transaction_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pendente,
    Pago,
    Atrasado,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Entrada => "entrada",
            TransactionType::Saida => "saida",
        }
    }
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pendente => "pendente",
            TransactionStatus::Pago => "pago",
            TransactionStatus::Atrasado => "atrasado",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "entrada" => Ok(TransactionType::Entrada),
            "saida" => Ok(TransactionType::Saida),
            _ => Err(AppError::InvalidFilter("type".into())),
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pendente" => Ok(TransactionStatus::Pendente),
            "pago" => Ok(TransactionStatus::Pago),
            "atrasado" => Ok(TransactionStatus::Atrasado),
            _ => Err(AppError::InvalidFilter("status".into())),
        }
    }
}

// ---
// Lançamento (já com os nomes de categoria e forma de pagamento)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetail {
    pub id: Uuid,

    #[schema(ignore)]
    pub tenant_id: Uuid,

    #[schema(example = "Aluguel da sala")]
    pub description: String,

    #[schema(value_type = String, format = Date, example = "2024-03-20")]
    pub due_date: NaiveDate,
    #[schema(value_type = Option<String>, format = Date, example = "2024-03-20")]
    pub payment_date: Option<NaiveDate>,

    #[schema(example = "Imobiliária Central")]
    pub supplier: String,
    pub status: TransactionStatus,

    pub category_id: Uuid,
    #[schema(example = "Despesas Fixas")]
    pub category_name: String,

    pub payment_method_id: Option<Uuid>,
    #[schema(example = "PIX")]
    pub payment_method_name: Option<String>,

    #[schema(example = "vila_velha")]
    pub unit: String,

    // Valor previsto e valor realizado
    #[schema(example = "1500.00")]
    pub amount: Decimal,
    pub actual_amount: Option<Decimal>,

    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: TransactionType,

    // Código de barras ou "copia e cola" do PIX
    pub barcode: Option<String>,
    pub invoice_number: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn validate_positive_amount(val: &Decimal) -> Result<(), ValidationError> {
    // o banco arredonda para centavos como o Postgres: 0,005 vira 0,01
    if val.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero) <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.01);
        err.message = Some("Valor deve ser maior que zero".into());
        return Err(err);
    }
    // NUMERIC(14, 2): até 12 dígitos inteiros
    if val.trunc() >= Decimal::new(1_000_000_000_000, 0) {
        let mut err = ValidationError::new("range");
        err.message = Some("Valor acima do limite permitido".into());
        return Err(err);
    }
    Ok(())
}

// Texto obrigatório: só espaços conta como vazio
pub fn validate_not_blank(val: &str) -> Result<(), ValidationError> {
    if val.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

// ---
// Payload de criação/edição
// ---
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPayload {
    #[validate(custom(function = "validate_not_blank", message = "Descrição é obrigatória"))]
    pub description: String,

    #[validate(required(message = "Data de vencimento é obrigatória"))]
    #[schema(value_type = String, format = Date, example = "2024-03-20")]
    pub due_date: Option<NaiveDate>,

    #[schema(value_type = Option<String>, format = Date)]
    pub payment_date: Option<NaiveDate>,

    #[validate(custom(function = "validate_not_blank", message = "Fornecedor é obrigatório"))]
    pub supplier: String,

    #[validate(required(message = "Status é obrigatório"))]
    pub status: Option<TransactionStatus>,

    #[validate(required(message = "Plano de contas é obrigatório"))]
    pub category_id: Option<Uuid>,

    pub payment_method_id: Option<Uuid>,

    #[validate(custom(function = "validate_not_blank", message = "Unidade é obrigatória"))]
    pub unit: String,

    #[validate(custom(function = "validate_positive_amount"))]
    #[schema(value_type = f64, example = 1500.0)]
    pub amount: Decimal,

    #[validate(custom(function = "validate_positive_amount"))]
    #[schema(value_type = Option<f64>)]
    pub actual_amount: Option<Decimal>,

    #[serde(rename = "type")]
    #[validate(required(message = "Tipo é obrigatório"))]
    pub kind: Option<TransactionType>,

    pub barcode: Option<String>,
    pub invoice_number: Option<String>,
}

/// Lançamento já validado, pronto para ir ao banco.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub description: String,
    pub due_date: NaiveDate,
    pub payment_date: Option<NaiveDate>,
    pub supplier: String,
    pub status: TransactionStatus,
    pub category_id: Uuid,
    pub payment_method_id: Option<Uuid>,
    pub unit: String,
    pub amount: Decimal,
    pub actual_amount: Option<Decimal>,
    pub kind: TransactionType,
    pub barcode: Option<String>,
    pub invoice_number: Option<String>,
}

// Campos de texto opcionais vazios viram NULL
fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl TryFrom<TransactionPayload> for NewTransaction {
    type Error = AppError;

    fn try_from(payload: TransactionPayload) -> Result<Self, Self::Error> {
        payload.validate()?;

        match (payload.due_date, payload.status, payload.category_id, payload.kind) {
            (Some(due_date), Some(status), Some(category_id), Some(kind)) => Ok(NewTransaction {
                description: payload.description.trim().to_string(),
                due_date,
                payment_date: payload.payment_date,
                supplier: payload.supplier.trim().to_string(),
                status,
                category_id,
                payment_method_id: payload.payment_method_id,
                unit: payload.unit.trim().to_string(),
                amount: payload.amount,
                actual_amount: payload.actual_amount,
                kind,
                barcode: non_blank(payload.barcode),
                invoice_number: non_blank(payload.invoice_number),
            }),
            // validate() já garante os obrigatórios
            _ => Err(anyhow::anyhow!("lançamento validado sem campos obrigatórios").into()),
        }
    }
}

// ---
// Filtros da listagem (como chegam na query string)
// ---
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TransactionQuery {
    /// Vencimento a partir de (YYYY-MM-DD)
    pub start_date: Option<String>,
    /// Vencimento até (YYYY-MM-DD)
    pub end_date: Option<String>,
    /// entrada | saida | all
    #[serde(rename = "type")]
    #[param(rename = "type")]
    pub kind: Option<String>,
    /// pendente | pago | atrasado | all
    pub status: Option<String>,
    /// ID do plano de contas ou all
    pub category: Option<String>,
    /// Geração da requisição, devolvida como veio
    pub generation: Option<u64>,
}

/// Filtros já tipados. `None` = não filtrar.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub kind: Option<TransactionType>,
    pub status: Option<TransactionStatus>,
    pub category_id: Option<Uuid>,
    pub limit: Option<i64>,
}

// Filtro ausente, vazio ou "all" não restringe nada
fn active(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != FILTER_ALL)
}

impl TransactionQuery {
    pub fn to_filter(&self) -> Result<TransactionFilter, AppError> {
        let date = |field: &str, value: &Option<String>| -> Result<Option<NaiveDate>, AppError> {
            active(value)
                .map(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d").map_err(|_| AppError::InvalidFilter(field.into())))
                .transpose()
        };

        Ok(TransactionFilter {
            start_date: date("startDate", &self.start_date)?,
            end_date: date("endDate", &self.end_date)?,
            kind: active(&self.kind).map(str::parse).transpose()?,
            status: active(&self.status).map(str::parse).transpose()?,
            category_id: active(&self.category)
                .map(|v| Uuid::parse_str(v).map_err(|_| AppError::InvalidFilter("category".into())))
                .transpose()?,
            limit: None,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionListResponse {
    pub transactions: Vec<TransactionDetail>,
    /// Aviso para o usuário (ex.: sem acesso a inquilino)
    pub notice: Option<String>,
    pub generation: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(amount: serde_json::Value) -> TransactionPayload {
        serde_json::from_value(json!({
            "description": "Aluguel",
            "dueDate": "2024-03-20",
            "supplier": "Imobiliária",
            "status": "pendente",
            "categoryId": Uuid::new_v4(),
            "unit": "vila_velha",
            "amount": amount,
            "type": "saida"
        }))
        .unwrap()
    }

    #[test]
    fn amount_must_be_greater_than_zero() {
        for bad in [json!(0), json!(-10.5)] {
            let err = NewTransaction::try_from(payload(bad)).unwrap_err();
            match err {
                AppError::ValidationError(e) => assert!(e.field_errors().contains_key("amount")),
                other => panic!("esperava erro de validação, veio {:?}", other),
            }
        }
        assert!(NewTransaction::try_from(payload(json!(0.01))).is_ok());
    }

    #[test]
    fn amount_must_fit_the_money_column() {
        let mut p = payload(json!(10));
        p.amount = Decimal::from_str("0.004").unwrap();
        let err = NewTransaction::try_from(p).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(e) if e.field_errors().contains_key("amount")));

        let mut p = payload(json!(10));
        p.actual_amount = Some(Decimal::from_str("0.004").unwrap());
        let err = NewTransaction::try_from(p).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(e) if e.field_errors().contains_key("actual_amount")));

        let mut p = payload(json!(10));
        p.amount = Decimal::from_str("1000000000000").unwrap();
        assert!(NewTransaction::try_from(p).is_err());

        let mut p = payload(json!(10));
        p.amount = Decimal::from_str("999999999999.99").unwrap();
        assert!(NewTransaction::try_from(p).is_ok());

        let mut p = payload(json!(10));
        p.amount = Decimal::from_str("0.005").unwrap();
        assert!(NewTransaction::try_from(p).is_ok());
    }

    #[test]
    fn whitespace_only_required_texts_are_rejected() {
        for field in ["description", "supplier", "unit"] {
            let mut p = payload(json!(10));
            match field {
                "description" => p.description = "   ".into(),
                "supplier" => p.supplier = "\t ".into(),
                _ => p.unit = " ".into(),
            }
            match NewTransaction::try_from(p).unwrap_err() {
                AppError::ValidationError(e) => assert!(e.field_errors().contains_key(field), "faltou erro para {}", field),
                other => panic!("esperava erro de validação, veio {:?}", other),
            }
        }
    }

    #[test]
    fn required_texts_are_stored_trimmed() {
        let mut p = payload(json!(10));
        p.description = "  Aluguel ".into();
        p.supplier = " Imobiliária".into();
        p.unit = "vila_velha  ".into();
        let tx = NewTransaction::try_from(p).unwrap();
        assert_eq!(tx.description, "Aluguel");
        assert_eq!(tx.supplier, "Imobiliária");
        assert_eq!(tx.unit, "vila_velha");
    }

    #[test]
    fn required_fields_are_reported() {
        let p: TransactionPayload = serde_json::from_value(json!({
            "description": "",
            "supplier": "",
            "unit": "",
            "amount": 10
        }))
        .unwrap();
        let errors = p.validate().unwrap_err();
        let fields = errors.field_errors();
        // nomes em Rust aqui; a resposta HTTP os converte para camelCase
        for field in ["description", "due_date", "supplier", "status", "category_id", "unit", "kind"] {
            assert!(fields.contains_key(field), "faltou erro para {}", field);
        }
    }

    #[test]
    fn direction_accepts_only_two_values() {
        let mut value = json!({
            "description": "x", "supplier": "y", "unit": "z", "amount": 1, "type": "transferencia"
        });
        assert!(serde_json::from_value::<TransactionPayload>(value.clone()).is_err());
        value["type"] = json!("entrada");
        assert!(serde_json::from_value::<TransactionPayload>(value).is_ok());
    }

    #[test]
    fn blank_optional_texts_become_none() {
        let mut p = payload(json!(10));
        p.barcode = Some("   ".into());
        p.invoice_number = Some(" NF-123 ".into());
        let tx = NewTransaction::try_from(p).unwrap();
        assert_eq!(tx.barcode, None);
        assert_eq!(tx.invoice_number.as_deref(), Some("NF-123"));
    }

    #[test]
    fn all_sentinel_and_blanks_do_not_filter() {
        let query = TransactionQuery {
            start_date: Some(String::new()),
            end_date: None,
            kind: Some("all".into()),
            status: Some("all".into()),
            category: Some("all".into()),
            generation: Some(7),
        };
        assert_eq!(query.to_filter().unwrap(), TransactionFilter::default());
    }

    #[test]
    fn present_filters_are_parsed() {
        let category = Uuid::new_v4();
        let query = TransactionQuery {
            start_date: Some("2024-01-01".into()),
            end_date: Some("2024-01-31".into()),
            kind: Some("entrada".into()),
            status: Some("pago".into()),
            category: Some(category.to_string()),
            generation: None,
        };
        let filter = query.to_filter().unwrap();
        assert_eq!(filter.start_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(filter.end_date, NaiveDate::from_ymd_opt(2024, 1, 31));
        assert_eq!(filter.kind, Some(TransactionType::Entrada));
        assert_eq!(filter.status, Some(TransactionStatus::Pago));
        assert_eq!(filter.category_id, Some(category));
    }

    #[test]
    fn malformed_filters_are_rejected() {
        let query = TransactionQuery { status: Some("cancelado".into()), ..Default::default() };
        assert!(matches!(query.to_filter(), Err(AppError::InvalidFilter(f)) if f == "status"));

        let query = TransactionQuery { start_date: Some("20/03/2024".into()), ..Default::default() };
        assert!(matches!(query.to_filter(), Err(AppError::InvalidFilter(f)) if f == "startDate"));
    }
}
