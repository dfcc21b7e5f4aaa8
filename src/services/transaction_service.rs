// src/services/transaction_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{db_utils::begin_rls_transaction, error::AppError},
    db::TransactionRepository,
    middleware::{
        i18n::Locale,
        tenancy::{TenantAccess, TenantContext},
    },
    models::transaction::{
        NewTransaction, TransactionDetail, TransactionFilter, TransactionListResponse,
        TransactionPayload, TransactionQuery,
    },
};

/// Aviso mostrado quando o usuário não pertence a nenhum inquilino.
pub(crate) fn no_access_notice(locale: &Locale) -> String {
    AppError::NoTenantAccess.to_api_error(locale).error
}

#[derive(Clone)]
pub struct TransactionService {
    repo: TransactionRepository,
    pool: PgPool,
}

impl TransactionService {
    pub fn new(repo: TransactionRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    /// Listagem com filtros. Sem associação, responde vazio com um aviso
    /// e nem chega a consultar os lançamentos.
    pub async fn list(
        &self,
        access: TenantAccess,
        query: &TransactionQuery,
        locale: &Locale,
    ) -> Result<TransactionListResponse, AppError> {
        let ctx = match access {
            TenantAccess::Granted(ctx) => ctx,
            TenantAccess::NoAccess => {
                return Ok(TransactionListResponse {
                    transactions: Vec::new(),
                    notice: Some(no_access_notice(locale)),
                    generation: query.generation,
                });
            }
        };

        let filter = query.to_filter()?;
        let transactions = self.fetch(&ctx, &filter).await?;

        Ok(TransactionListResponse {
            transactions,
            notice: None,
            generation: query.generation,
        })
    }

    /// Consulta com escopo de inquilino, compartilhada com o dashboard
    /// e com o teste de notificações.
    pub async fn fetch(
        &self,
        ctx: &TenantContext,
        filter: &TransactionFilter,
    ) -> Result<Vec<TransactionDetail>, AppError> {
        let mut tx = begin_rls_transaction(&self.pool, ctx).await?;
        let transactions = self.repo.list(&mut *tx, ctx.tenant_id, filter).await?;
        tx.commit().await?;
        Ok(transactions)
    }

    pub async fn get(&self, ctx: &TenantContext, id: Uuid) -> Result<TransactionDetail, AppError> {
        let mut tx = begin_rls_transaction(&self.pool, ctx).await?;
        let transaction = self
            .repo
            .find_by_id(&mut *tx, ctx.tenant_id, id)
            .await?
            .ok_or(AppError::ResourceNotFound("Lançamento"))?;
        tx.commit().await?;
        Ok(transaction)
    }

    pub async fn create(
        &self,
        ctx: &TenantContext,
        payload: TransactionPayload,
    ) -> Result<TransactionDetail, AppError> {
        let input = NewTransaction::try_from(payload)?;

        let mut tx = begin_rls_transaction(&self.pool, ctx).await?;
        let created = self.repo.create(&mut *tx, ctx.tenant_id, &input).await?;
        tx.commit().await?;

        tracing::info!("Lançamento {} criado no inquilino {}", created.id, ctx.tenant_id);
        Ok(created)
    }

    pub async fn update(
        &self,
        ctx: &TenantContext,
        id: Uuid,
        payload: TransactionPayload,
    ) -> Result<TransactionDetail, AppError> {
        let input = NewTransaction::try_from(payload)?;

        let mut tx = begin_rls_transaction(&self.pool, ctx).await?;
        let updated = self.repo.update(&mut *tx, ctx.tenant_id, id, &input).await?;
        tx.commit().await?;

        Ok(updated)
    }

    pub async fn delete(&self, ctx: &TenantContext, id: Uuid) -> Result<(), AppError> {
        let mut tx = begin_rls_transaction(&self.pool, ctx).await?;
        self.repo.delete(&mut *tx, ctx.tenant_id, id).await?;
        tx.commit().await?;

        tracing::info!("Lançamento {} excluído do inquilino {}", id, ctx.tenant_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    fn service() -> TransactionService {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/financeiro_test")
            .unwrap();
        TransactionService::new(TransactionRepository::new(), pool)
    }

    #[tokio::test]
    async fn caller_without_tenant_gets_an_empty_list_regardless_of_filters() {
        let queries = [
            TransactionQuery::default(),
            TransactionQuery {
                status: Some("pago".into()),
                kind: Some("entrada".into()),
                generation: Some(3),
                ..Default::default()
            },
            // Nem filtros inválidos chegam a ser avaliados
            TransactionQuery { start_date: Some("ontem".into()), ..Default::default() },
        ];

        for query in queries {
            let response = service()
                .list(TenantAccess::NoAccess, &query, &Locale::default())
                .await
                .unwrap();
            assert!(response.transactions.is_empty());
            assert_eq!(response.generation, query.generation);
            assert_eq!(response.notice.as_deref(), Some("Você não tem acesso a nenhum inquilino."));
        }
    }

    #[test]
    fn notice_follows_the_locale() {
        assert_eq!(no_access_notice(&Locale("en".into())), "You do not have access to any tenant.");
    }
}
