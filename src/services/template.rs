// src/services/template.rs
//
// Modelos de mensagem com variáveis `{nome}`. O vocabulário é fechado:
// cada variável tem um acessor explícito sobre o lançamento.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::{Captures, Regex};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{common::currency::format_brl, models::transaction::TransactionDetail};

pub const BARCODE_MESSAGE_PREFIX: &str = "Código de barras/PIX:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateVariable {
    Description,
    Supplier,
    Amount,
    ActualAmount,
    DueDate,
    PaymentDate,
    Status,
    Category,
    PaymentMethod,
    Unit,
    Type,
    TotalAmount,
    Count,
    Barcode,
    InvoiceNumber,
}

impl TemplateVariable {
    pub const ALL: [TemplateVariable; 15] = [
        TemplateVariable::Description,
        TemplateVariable::Supplier,
        TemplateVariable::Amount,
        TemplateVariable::ActualAmount,
        TemplateVariable::DueDate,
        TemplateVariable::PaymentDate,
        TemplateVariable::Status,
        TemplateVariable::Category,
        TemplateVariable::PaymentMethod,
        TemplateVariable::Unit,
        TemplateVariable::Type,
        TemplateVariable::TotalAmount,
        TemplateVariable::Count,
        TemplateVariable::Barcode,
        TemplateVariable::InvoiceNumber,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TemplateVariable::Description => "description",
            TemplateVariable::Supplier => "supplier",
            TemplateVariable::Amount => "amount",
            TemplateVariable::ActualAmount => "actualAmount",
            TemplateVariable::DueDate => "dueDate",
            TemplateVariable::PaymentDate => "paymentDate",
            TemplateVariable::Status => "status",
            TemplateVariable::Category => "category",
            TemplateVariable::PaymentMethod => "paymentMethod",
            TemplateVariable::Unit => "unit",
            TemplateVariable::Type => "type",
            TemplateVariable::TotalAmount => "totalAmount",
            TemplateVariable::Count => "count",
            TemplateVariable::Barcode => "barcode",
            TemplateVariable::InvoiceNumber => "invoiceNumber",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TemplateVariable::Description => "Descrição do lançamento",
            TemplateVariable::Supplier => "Nome do fornecedor",
            TemplateVariable::Amount => "Valor do lançamento",
            TemplateVariable::ActualAmount => "Valor realizado",
            TemplateVariable::DueDate => "Data de vencimento",
            TemplateVariable::PaymentDate => "Data de pagamento",
            TemplateVariable::Status => "Status do lançamento",
            TemplateVariable::Category => "Plano de contas",
            TemplateVariable::PaymentMethod => "Forma de pagamento",
            TemplateVariable::Unit => "Unidade",
            TemplateVariable::Type => "Tipo (entrada/saída)",
            TemplateVariable::TotalAmount => "Valor total dos lançamentos",
            TemplateVariable::Count => "Quantidade de lançamentos",
            TemplateVariable::Barcode => "Código de barras",
            TemplateVariable::InvoiceNumber => "Número da nota fiscal",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.name() == name)
    }

    /// Variáveis calculadas uma vez sobre o lote inteiro.
    pub fn is_aggregate(&self) -> bool {
        matches!(self, TemplateVariable::TotalAmount | TemplateVariable::Count)
    }

    /// Valor da variável para um lançamento. `None` mantém o `{nome}` literal.
    pub fn resolve(&self, tx: &TransactionDetail) -> Option<String> {
        match self {
            TemplateVariable::Description => Some(tx.description.clone()),
            TemplateVariable::Supplier => Some(tx.supplier.clone()),
            TemplateVariable::Amount => Some(format_brl(tx.amount)),
            TemplateVariable::ActualAmount => tx.actual_amount.map(format_brl),
            TemplateVariable::DueDate => Some(format_date(tx.due_date)),
            TemplateVariable::PaymentDate => tx.payment_date.map(format_date),
            TemplateVariable::Status => Some(tx.status.to_string()),
            TemplateVariable::Category => Some(tx.category_name.clone()),
            TemplateVariable::PaymentMethod => tx.payment_method_name.clone(),
            TemplateVariable::Unit => Some(tx.unit.clone()),
            TemplateVariable::Type => Some(tx.kind.to_string()),
            TemplateVariable::Barcode => tx.barcode.clone(),
            TemplateVariable::InvoiceNumber => tx.invoice_number.clone(),
            TemplateVariable::TotalAmount | TemplateVariable::Count => None,
        }
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

// Item da lista de variáveis exibida na tela de configurações
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VariableInfo {
    #[schema(example = "supplier")]
    pub name: String,
    #[schema(example = "Nome do fornecedor")]
    pub description: String,
}

pub fn available_variables() -> Vec<VariableInfo> {
    TemplateVariable::ALL
        .iter()
        .map(|v| VariableInfo {
            name: v.name().to_string(),
            description: v.description().to_string(),
        })
        .collect()
}

/// Agregados do lote: `{totalAmount}` e `{count}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchAggregates {
    pub total_amount: Decimal,
    pub count: usize,
}

impl BatchAggregates {
    pub fn from_transactions(transactions: &[TransactionDetail]) -> Self {
        Self {
            total_amount: transactions.iter().map(|t| t.amount).sum(),
            count: transactions.len(),
        }
    }

    fn resolve(&self, variable: TemplateVariable) -> Option<String> {
        match variable {
            TemplateVariable::TotalAmount => Some(format_brl(self.total_amount)),
            TemplateVariable::Count => Some(self.count.to_string()),
            _ => None,
        }
    }
}

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\w+)\}").expect("regex de variável inválida"));

/// Troca cada `{nome}` pelo valor devolvido por `lookup`, numa única
/// passada. Valores inseridos não são reprocessados; nomes sem valor ficam
/// como estão.
pub fn substitute<F>(template: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Expande o modelo para um lote de lançamentos.
///
/// Os agregados são resolvidos uma vez, no modelo, antes da expansão por
/// lançamento. Cada lançamento gera uma mensagem; se tiver código de
/// barras/PIX, uma segunda mensagem só com o código vem logo em seguida.
pub fn render_batch(template: &str, transactions: &[TransactionDetail]) -> Vec<String> {
    let aggregates = BatchAggregates::from_transactions(transactions);
    let template = substitute(template, |name| {
        TemplateVariable::from_name(name)
            .filter(TemplateVariable::is_aggregate)
            .and_then(|v| aggregates.resolve(v))
    });

    let mut messages = Vec::with_capacity(transactions.len());
    for tx in transactions {
        let message = substitute(&template, |name| {
            TemplateVariable::from_name(name)
                .filter(|v| !v.is_aggregate())
                .and_then(|v| v.resolve(tx))
        });
        messages.push(message.trim().to_string());

        if let Some(barcode) = tx.barcode.as_deref().filter(|b| !b.trim().is_empty()) {
            messages.push(format!("{}\n{}", BARCODE_MESSAGE_PREFIX, barcode));
        }
    }

    messages
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::transaction::{TransactionStatus, TransactionType};
    use chrono::Utc;
    use std::str::FromStr;
    use uuid::Uuid;

    pub(crate) fn transaction(supplier: &str, amount: &str) -> TransactionDetail {
        TransactionDetail {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            description: "Aluguel".into(),
            due_date: NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(),
            payment_date: None,
            supplier: supplier.into(),
            status: TransactionStatus::Pendente,
            category_id: Uuid::new_v4(),
            category_name: "Despesas Fixas".into(),
            payment_method_id: None,
            payment_method_name: None,
            unit: "vila_velha".into(),
            amount: Decimal::from_str(amount).unwrap(),
            actual_amount: None,
            kind: TransactionType::Saida,
            barcode: None,
            invoice_number: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn supplier_and_amount_are_substituted_with_currency() {
        let messages = render_batch("{supplier} - {amount}", &[transaction("Acme", "150")]);
        assert_eq!(messages, vec!["Acme - R$ 150,00"]);
    }

    #[test]
    fn rendering_is_idempotent() {
        let batch = [transaction("Acme", "150")];
        let first = render_batch("{supplier} - {amount} ({count})", &batch);
        let second = render_batch("{supplier} - {amount} ({count})", &batch);
        assert_eq!(first, second);
    }

    #[test]
    fn aggregates_resolve_identically_across_the_batch() {
        let batch = [
            transaction("A", "100"),
            transaction("B", "50.5"),
            transaction("C", "1000"),
        ];
        let messages = render_batch("{supplier}: {count} itens, total {totalAmount}", &batch);

        assert_eq!(
            messages,
            vec![
                "A: 3 itens, total R$ 1.150,50",
                "B: 3 itens, total R$ 1.150,50",
                "C: 3 itens, total R$ 1.150,50",
            ]
        );
    }

    #[test]
    fn unknown_and_absent_placeholders_stay_literal() {
        let messages = render_batch(
            "{supplier} {naoExiste} {paymentDate} {actualAmount}",
            &[transaction("Acme", "10")],
        );
        assert_eq!(messages, vec!["Acme {naoExiste} {paymentDate} {actualAmount}"]);
    }

    #[test]
    fn every_field_of_the_vocabulary_is_rendered() {
        let mut tx = transaction("Acme", "10");
        tx.actual_amount = Some(Decimal::from(12));
        tx.payment_date = NaiveDate::from_ymd_opt(2024, 3, 21);
        tx.payment_method_name = Some("PIX".into());
        tx.invoice_number = Some("NF-9".into());

        let template = "{description}|{dueDate}|{paymentDate}|{status}|{category}|{paymentMethod}|{unit}|{type}|{actualAmount}|{invoiceNumber}";
        let messages = render_batch(template, &[tx]);
        assert_eq!(
            messages[0],
            "Aluguel|20/03/2024|21/03/2024|pendente|Despesas Fixas|PIX|vila_velha|saida|R$ 12,00|NF-9"
        );
    }

    #[test]
    fn barcode_yields_a_follow_up_message() {
        let mut with_code = transaction("Acme", "10");
        with_code.barcode = Some("00020126580014BR.GOV.BCB.PIX".into());
        let without_code = transaction("Beta", "20");

        let messages = render_batch("  {supplier}  ", &[with_code, without_code]);
        assert_eq!(
            messages,
            vec![
                "Acme".to_string(),
                "Código de barras/PIX:\n00020126580014BR.GOV.BCB.PIX".to_string(),
                "Beta".to_string(),
            ]
        );
    }

    #[test]
    fn substituted_values_are_not_expanded_again() {
        let mut tx = transaction("{amount}", "10");
        tx.description = "{supplier}".into();
        let messages = render_batch("{description} / {supplier}", &[tx]);
        assert_eq!(messages, vec!["{supplier} / {amount}"]);
    }

    #[test]
    fn unbalanced_braces_are_kept() {
        let out = substitute("a { b {supplier} c }", |name| (name == "supplier").then(|| "X".to_string()));
        assert_eq!(out, "a { b X c }");
        assert_eq!(substitute("{{supplier}}", |_| Some("X".into())), "{X}");
        assert_eq!(substitute("{supplier", |_| Some("X".into())), "{supplier");
        assert_eq!(substitute("{} {sup plier}", |_| Some("X".into())), "{} {sup plier}");
    }

    #[test]
    fn vocabulary_is_closed_and_round_trips_names() {
        assert_eq!(available_variables().len(), TemplateVariable::ALL.len());
        for v in TemplateVariable::ALL {
            assert_eq!(TemplateVariable::from_name(v.name()), Some(v));
        }
        assert_eq!(TemplateVariable::from_name("due_date"), None);
    }
}
