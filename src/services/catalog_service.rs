// src/services/catalog_service.rs

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{db_utils::begin_rls_transaction, error::AppError},
    db::CatalogRepository,
    middleware::tenancy::TenantContext,
    models::catalog::{Category, CategoryPayload, PaymentMethod, PaymentMethodPayload},
};

#[derive(Clone)]
pub struct CatalogService {
    repo: CatalogRepository,
    pool: PgPool,
}

impl CatalogService {
    pub fn new(repo: CatalogRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    // --- Plano de contas ---

    pub async fn list_categories(&self, ctx: &TenantContext) -> Result<Vec<Category>, AppError> {
        let mut tx = begin_rls_transaction(&self.pool, ctx).await?;
        let categories = self.repo.list_categories(&mut *tx, ctx.tenant_id).await?;
        tx.commit().await?;
        Ok(categories)
    }

    pub async fn create_category(
        &self,
        ctx: &TenantContext,
        payload: &CategoryPayload,
    ) -> Result<Category, AppError> {
        payload.validate()?;

        let mut tx = begin_rls_transaction(&self.pool, ctx).await?;
        let category = self.repo.create_category(&mut *tx, ctx.tenant_id, payload).await?;
        tx.commit().await?;
        Ok(category)
    }

    pub async fn update_category(
        &self,
        ctx: &TenantContext,
        id: Uuid,
        payload: &CategoryPayload,
    ) -> Result<Category, AppError> {
        payload.validate()?;

        let mut tx = begin_rls_transaction(&self.pool, ctx).await?;
        let category = self.repo.update_category(&mut *tx, ctx.tenant_id, id, payload).await?;
        tx.commit().await?;
        Ok(category)
    }

    pub async fn delete_category(&self, ctx: &TenantContext, id: Uuid) -> Result<(), AppError> {
        let mut tx = begin_rls_transaction(&self.pool, ctx).await?;
        self.repo.delete_category(&mut *tx, ctx.tenant_id, id).await?;
        tx.commit().await?;
        Ok(())
    }

    // --- Formas de pagamento ---

    pub async fn list_payment_methods(
        &self,
        ctx: &TenantContext,
    ) -> Result<Vec<PaymentMethod>, AppError> {
        let mut tx = begin_rls_transaction(&self.pool, ctx).await?;
        let methods = self.repo.list_payment_methods(&mut *tx, ctx.tenant_id).await?;
        tx.commit().await?;
        Ok(methods)
    }

    pub async fn create_payment_method(
        &self,
        ctx: &TenantContext,
        payload: &PaymentMethodPayload,
    ) -> Result<PaymentMethod, AppError> {
        payload.validate()?;

        let mut tx = begin_rls_transaction(&self.pool, ctx).await?;
        let method = self.repo.create_payment_method(&mut *tx, ctx.tenant_id, payload).await?;
        tx.commit().await?;
        Ok(method)
    }

    pub async fn update_payment_method(
        &self,
        ctx: &TenantContext,
        id: Uuid,
        payload: &PaymentMethodPayload,
    ) -> Result<PaymentMethod, AppError> {
        payload.validate()?;

        let mut tx = begin_rls_transaction(&self.pool, ctx).await?;
        let method = self
            .repo
            .update_payment_method(&mut *tx, ctx.tenant_id, id, payload)
            .await?;
        tx.commit().await?;
        Ok(method)
    }

    pub async fn delete_payment_method(&self, ctx: &TenantContext, id: Uuid) -> Result<(), AppError> {
        let mut tx = begin_rls_transaction(&self.pool, ctx).await?;
        self.repo.delete_payment_method(&mut *tx, ctx.tenant_id, id).await?;
        tx.commit().await?;
        Ok(())
    }
}
