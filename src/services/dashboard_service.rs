// src/services/dashboard_service.rs

use std::collections::BTreeMap;

use chrono::Datelike;
use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    middleware::{i18n::Locale, tenancy::TenantAccess},
    models::{
        dashboard::{CategoryEntry, DashboardReport, DashboardSummary, MonthlyEntry},
        transaction::{TransactionDetail, TransactionQuery, TransactionStatus, TransactionType},
    },
    services::transaction_service::{no_access_notice, TransactionService},
};

// Rótulos curtos dos meses, como no gráfico
const MONTH_LABELS: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
];

/// Resumo, série por categoria e série mensal. Função pura da coleção.
pub fn build_report(transactions: &[TransactionDetail]) -> DashboardReport {
    let mut summary = DashboardSummary::default();
    let mut by_category: BTreeMap<&str, Decimal> = BTreeMap::new();
    // Índice do mês (0..12) -> (entradas, saídas)
    let mut monthly: BTreeMap<u32, (Decimal, Decimal)> = BTreeMap::new();

    for tx in transactions {
        let month = monthly.entry(tx.due_date.month0()).or_default();
        match tx.kind {
            TransactionType::Entrada => {
                summary.income += tx.amount;
                month.0 += tx.amount;
            }
            TransactionType::Saida => {
                summary.expenses += tx.amount;
                month.1 += tx.amount;
            }
        }

        if tx.status == TransactionStatus::Pendente {
            summary.pending += tx.amount;
        }

        *by_category.entry(tx.category_name.as_str()).or_default() += tx.amount;
    }

    DashboardReport {
        summary,
        by_category: by_category
            .into_iter()
            .map(|(name, value)| CategoryEntry { name: name.to_string(), value })
            .collect(),
        monthly: monthly
            .into_iter()
            .map(|(month0, (income, expenses))| MonthlyEntry {
                month: MONTH_LABELS[month0 as usize].to_string(),
                income,
                expenses,
            })
            .collect(),
        notice: None,
    }
}

#[derive(Clone)]
pub struct DashboardService {
    transactions: TransactionService,
}

impl DashboardService {
    pub fn new(transactions: TransactionService) -> Self {
        Self { transactions }
    }

    pub async fn report(
        &self,
        access: TenantAccess,
        query: &TransactionQuery,
        locale: &Locale,
    ) -> Result<DashboardReport, AppError> {
        let ctx = match access {
            TenantAccess::Granted(ctx) => ctx,
            TenantAccess::NoAccess => {
                return Ok(DashboardReport {
                    notice: Some(no_access_notice(locale)),
                    ..Default::default()
                });
            }
        };

        let filter = query.to_filter()?;
        let transactions = self.transactions.fetch(&ctx, &filter).await?;
        Ok(build_report(&transactions))
    }
}
