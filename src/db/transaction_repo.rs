// src/db/transaction_repo.rs

use sqlx::{Executor, PgConnection, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::{
        db_utils::{is_foreign_key_violation, violated_constraint},
        error::AppError,
    },
    models::transaction::{NewTransaction, TransactionDetail, TransactionFilter},
};

// Lançamento + nomes do plano de contas e da forma de pagamento
const SELECT_DETAIL: &str = r#"
    SELECT
        t.id, t.tenant_id, t.description, t.due_date, t.payment_date,
        t.supplier, t.status,
        t.category_id, c.name AS category_name,
        t.payment_method_id, pm.name AS payment_method_name,
        t.unit, t.amount, t.actual_amount, t.type,
        t.barcode, t.invoice_number, t.created_at, t.updated_at
    FROM transactions t
    JOIN categories c ON c.id = t.category_id
    LEFT JOIN payment_methods pm ON pm.id = t.payment_method_id
"#;

/// Monta a consulta da listagem. O predicado do inquilino vem sempre
/// primeiro; cada filtro do usuário só entra quando presente.
pub(crate) fn build_list_query(
    tenant_id: Uuid,
    filter: &TransactionFilter,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(SELECT_DETAIL);
    qb.push(" WHERE t.tenant_id = ").push_bind(tenant_id);

    if let Some(start_date) = filter.start_date {
        qb.push(" AND t.due_date >= ").push_bind(start_date);
    }
    if let Some(end_date) = filter.end_date {
        qb.push(" AND t.due_date <= ").push_bind(end_date);
    }
    if let Some(kind) = filter.kind {
        qb.push(" AND t.type = ").push_bind(kind);
    }
    if let Some(status) = filter.status {
        qb.push(" AND t.status = ").push_bind(status);
    }
    if let Some(category_id) = filter.category_id {
        qb.push(" AND t.category_id = ").push_bind(category_id);
    }

    // Mais recentes primeiro
    qb.push(" ORDER BY t.created_at DESC");

    if let Some(limit) = filter.limit {
        qb.push(" LIMIT ").push_bind(limit);
    }

    qb
}

// FK composta (id, tenant_id): referência a registro de outro inquilino ou inexistente
fn map_reference_error(err: sqlx::Error) -> AppError {
    if is_foreign_key_violation(&err) {
        let field = match violated_constraint(&err).as_deref() {
            Some("transactions_payment_method_fkey") => "paymentMethodId",
            _ => "categoryId",
        };
        return AppError::InvalidReference(field.to_string());
    }
    err.into()
}

// Sem pool própria: toda operação roda dentro da transação RLS do chamador
#[derive(Clone, Default)]
pub struct TransactionRepository;

impl TransactionRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        filter: &TransactionFilter,
    ) -> Result<Vec<TransactionDetail>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut qb = build_list_query(tenant_id, filter);
        let transactions = qb
            .build_query_as::<TransactionDetail>()
            .fetch_all(executor)
            .await?;

        Ok(transactions)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<TransactionDetail>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let query = format!("{} WHERE t.tenant_id = $1 AND t.id = $2", SELECT_DETAIL);
        let transaction = sqlx::query_as::<_, TransactionDetail>(&query)
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(transaction)
    }

    pub async fn create(
        &self,
        conn: &mut PgConnection,
        tenant_id: Uuid,
        input: &NewTransaction,
    ) -> Result<TransactionDetail, AppError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO transactions (
                tenant_id, description, due_date, payment_date, supplier, status,
                category_id, payment_method_id, unit, amount, actual_amount, type,
                barcode, invoice_number
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING id
            "#,
        )
        .bind(tenant_id)
        .bind(&input.description)
        .bind(input.due_date)
        .bind(input.payment_date)
        .bind(&input.supplier)
        .bind(input.status)
        .bind(input.category_id)
        .bind(input.payment_method_id)
        .bind(&input.unit)
        .bind(input.amount)
        .bind(input.actual_amount)
        .bind(input.kind)
        .bind(&input.barcode)
        .bind(&input.invoice_number)
        .fetch_one(&mut *conn)
        .await
        .map_err(map_reference_error)?;

        self.find_by_id(&mut *conn, tenant_id, id)
            .await?
            .ok_or(AppError::ResourceNotFound("Lançamento"))
    }

    /// Sem controle de versão: a última escrita vence.
    pub async fn update(
        &self,
        conn: &mut PgConnection,
        tenant_id: Uuid,
        id: Uuid,
        input: &NewTransaction,
    ) -> Result<TransactionDetail, AppError> {
        let updated: Option<Uuid> = sqlx::query_scalar(
            r#"
            UPDATE transactions SET
                description = $3, due_date = $4, payment_date = $5, supplier = $6,
                status = $7, category_id = $8, payment_method_id = $9, unit = $10,
                amount = $11, actual_amount = $12, type = $13, barcode = $14,
                invoice_number = $15, updated_at = NOW()
            WHERE tenant_id = $1 AND id = $2
            RETURNING id
            "#,
        )
        .bind(tenant_id)
        .bind(id)
        .bind(&input.description)
        .bind(input.due_date)
        .bind(input.payment_date)
        .bind(&input.supplier)
        .bind(input.status)
        .bind(input.category_id)
        .bind(input.payment_method_id)
        .bind(&input.unit)
        .bind(input.amount)
        .bind(input.actual_amount)
        .bind(input.kind)
        .bind(&input.barcode)
        .bind(&input.invoice_number)
        .fetch_optional(&mut *conn)
        .await
        .map_err(map_reference_error)?;

        let id = updated.ok_or(AppError::ResourceNotFound("Lançamento"))?;

        self.find_by_id(&mut *conn, tenant_id, id)
            .await?
            .ok_or(AppError::ResourceNotFound("Lançamento"))
    }

    pub async fn delete<'e, E>(&self, executor: E, tenant_id: Uuid, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM transactions WHERE tenant_id = $1 AND id = $2")
            .bind(tenant_id)
            .bind(id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound("Lançamento"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::transaction::{TransactionStatus, TransactionType};
    use chrono::NaiveDate;

    #[test]
    fn tenant_predicate_is_always_the_first_condition() {
        let tenant = Uuid::new_v4();
        let filter = TransactionFilter {
            status: Some(TransactionStatus::Pendente),
            kind: Some(TransactionType::Saida),
            ..Default::default()
        };
        let qb = build_list_query(tenant, &filter);
        let sql = qb.sql();

        let where_pos = sql.find(" WHERE t.tenant_id = $1").expect("predicado do inquilino");
        assert!(sql[..where_pos].find("$").is_none());
        assert!(sql.contains(" AND t.type = $2"));
        assert!(sql.contains(" AND t.status = $3"));
    }

    #[test]
    fn empty_filter_only_scopes_by_tenant_and_orders_newest_first() {
        let qb = build_list_query(Uuid::new_v4(), &TransactionFilter::default());
        let sql = qb.sql();

        assert!(sql.contains("WHERE t.tenant_id = $1 ORDER BY t.created_at DESC"));
        assert!(!sql.contains(" AND "));
        assert!(!sql.contains("LIMIT"));
    }

    #[test]
    fn all_filters_compose_conjunctively() {
        let filter = TransactionFilter {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 31),
            kind: Some(TransactionType::Entrada),
            status: Some(TransactionStatus::Pago),
            category_id: Some(Uuid::new_v4()),
            limit: Some(3),
        };
        let qb = build_list_query(Uuid::new_v4(), &filter);
        let sql = qb.sql();

        assert_eq!(sql.matches(" AND ").count(), 5);
        assert!(sql.contains("t.due_date >= $2"));
        assert!(sql.contains("t.due_date <= $3"));
        assert!(sql.contains("t.category_id = $6"));
        assert!(sql.trim_end().ends_with("LIMIT $7"));
    }
}
