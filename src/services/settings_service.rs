// src/services/settings_service.rs

use sqlx::PgPool;
use validator::Validate;

use crate::{
    common::{db_utils::begin_rls_transaction, error::AppError},
    db::SettingsRepository,
    middleware::tenancy::TenantContext,
    models::settings::{Setting, SettingKey, SettingsView, UpdateSettingsRequest},
};

#[derive(Clone)]
pub struct SettingsService {
    repo: SettingsRepository,
    pool: PgPool,
}

impl SettingsService {
    pub fn new(repo: SettingsRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn get(&self, ctx: &TenantContext) -> Result<SettingsView, AppError> {
        let mut tx = begin_rls_transaction(&self.pool, ctx).await?;
        let settings = self.repo.list(&mut *tx, ctx.tenant_id).await?;
        tx.commit().await?;
        Ok(SettingsView::from(settings.as_slice()).for_role(ctx.role))
    }

    /// Grava só os campos enviados. Restrito a administradores.
    pub async fn update(
        &self,
        ctx: &TenantContext,
        request: UpdateSettingsRequest,
    ) -> Result<SettingsView, AppError> {
        ctx.require_admin()?;
        request.validate()?;

        let entries = request.into_entries();

        let mut tx = begin_rls_transaction(&self.pool, ctx).await?;
        if !entries.is_empty() {
            self.repo.upsert(&mut *tx, ctx.tenant_id, &entries).await?;
        }
        let settings = self.repo.list(&mut *tx, ctx.tenant_id).await?;
        tx.commit().await?;

        tracing::info!("{} configurações salvas no inquilino {}", entries.len(), ctx.tenant_id);
        Ok(SettingsView::from(settings.as_slice()))
    }

    /// Linhas de configuração do Telegram (token, chat e modelo).
    pub async fn telegram_settings(&self, ctx: &TenantContext) -> Result<Vec<Setting>, AppError> {
        let mut tx = begin_rls_transaction(&self.pool, ctx).await?;
        let settings = self
            .repo
            .find_keys(&mut *tx, ctx.tenant_id, &SettingKey::TELEGRAM)
            .await?;
        tx.commit().await?;
        Ok(settings)
    }
}
