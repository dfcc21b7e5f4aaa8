// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

// 1. Os Cards do Topo
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub income: Decimal,   // Entradas
    pub expenses: Decimal, // Saídas
    pub pending: Decimal,  // A Pagar (status pendente)
}

// 2. Distribuição por Categoria
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryEntry {
    pub name: String,
    pub value: Decimal,
}

// 3. Fluxo de Caixa Mensal
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyEntry {
    #[schema(example = "mar")]
    pub month: String,
    pub income: Decimal,
    pub expenses: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub summary: DashboardSummary,
    pub by_category: Vec<CategoryEntry>,
    pub monthly: Vec<MonthlyEntry>,
    pub notice: Option<String>,
}
