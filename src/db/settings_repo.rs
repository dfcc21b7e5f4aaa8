// src/db/settings_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::settings::{Setting, SettingKey},
};

#[derive(Clone, Default)]
pub struct SettingsRepository;

impl SettingsRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn list<'e, E>(&self, executor: E, tenant_id: Uuid) -> Result<Vec<Setting>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let settings = sqlx::query_as::<_, Setting>(
            "SELECT key, value FROM settings WHERE tenant_id = $1 ORDER BY key",
        )
        .bind(tenant_id)
        .fetch_all(executor)
        .await?;

        Ok(settings)
    }

    // Apenas as chaves pedidas (ex.: as do Telegram)
    pub async fn find_keys<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        keys: &[SettingKey],
    ) -> Result<Vec<Setting>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let keys: Vec<&str> = keys.iter().map(SettingKey::as_str).collect();
        let settings = sqlx::query_as::<_, Setting>(
            "SELECT key, value FROM settings WHERE tenant_id = $1 AND key = ANY($2)",
        )
        .bind(tenant_id)
        .bind(&keys)
        .fetch_all(executor)
        .await?;

        Ok(settings)
    }

    /// UPSERT (Insert or Update) de vários pares num único comando.
    pub async fn upsert<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        entries: &[(SettingKey, String)],
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        let values: Vec<&str> = entries.iter().map(|(_, v)| v.as_str()).collect();

        sqlx::query(
            r#"
            INSERT INTO settings (tenant_id, key, value)
            SELECT $1, k, v FROM UNNEST($2::text[], $3::text[]) AS s(k, v)
            ON CONFLICT (tenant_id, key)
            DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
            "#,
        )
        .bind(tenant_id)
        .bind(&keys)
        .bind(&values)
        .execute(executor)
        .await?;

        Ok(())
    }
}
