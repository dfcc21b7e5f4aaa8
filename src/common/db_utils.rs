use sqlx::{PgPool, Postgres, Transaction};

use crate::common::error::AppError;
use crate::middleware::tenancy::TenantContext;

// ---
// Helper RLS: A "Chave" para o Banco de Dados
// ---
/// Abre uma transação e define as variáveis RLS (`app.tenant_id` e `app.user_id`).
/// `set_config(..., true)` só vale dentro da transação, por isso o helper
/// devolve a transação em vez de uma conexão solta.
pub(crate) async fn begin_rls_transaction(
    pool: &PgPool,
    tenant_ctx: &TenantContext,
) -> Result<Transaction<'static, Postgres>, AppError> {
    let mut tx = pool.begin().await?;

    sqlx::query("SELECT set_config('app.tenant_id', $1, true)")
        .bind(tenant_ctx.tenant_id.to_string())
        .execute(&mut *tx)
        .await?;

    sqlx::query("SELECT set_config('app.user_id', $1, true)")
        .bind(tenant_ctx.user_id.to_string())
        .execute(&mut *tx)
        .await?;

    Ok(tx)
}

/// Nome da constraint violada, quando o erro é de banco.
pub(crate) fn violated_constraint(err: &sqlx::Error) -> Option<String> {
    err.as_database_error()
        .and_then(|db_err| db_err.constraint().map(str::to_string))
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db_err| db_err.is_unique_violation())
        .unwrap_or(false)
}

pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db_err| db_err.is_foreign_key_violation())
        .unwrap_or(false)
}
