// src/db/catalog_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        db_utils::{is_foreign_key_violation, is_unique_violation},
        error::AppError,
    },
    models::catalog::{Category, CategoryPayload, PaymentMethod, PaymentMethodPayload},
};

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

// Repositório do plano de contas e das formas de pagamento.
// Roda sempre dentro da transação RLS do chamador.
#[derive(Clone, Default)]
pub struct CatalogRepository;

impl CatalogRepository {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    //  CATEGORIAS (Plano de Contas)
    // =========================================================================

    pub async fn list_categories<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
    ) -> Result<Vec<Category>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE tenant_id = $1 ORDER BY name ASC",
        )
        .bind(tenant_id)
        .fetch_all(executor)
        .await?;

        Ok(categories)
    }

    pub async fn create_category<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        input: &CategoryPayload,
    ) -> Result<Category, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let name = input.name.trim();
        sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (tenant_id, name, description, is_active)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(name)
        .bind(non_blank(&input.description))
        .bind(input.is_active)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return AppError::CategoryNameAlreadyExists(name.to_string());
            }
            e.into()
        })
    }

    pub async fn update_category<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        id: Uuid,
        input: &CategoryPayload,
    ) -> Result<Category, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let name = input.name.trim();
        sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = $3, description = $4, is_active = $5
            WHERE tenant_id = $1 AND id = $2
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(id)
        .bind(name)
        .bind(non_blank(&input.description))
        .bind(input.is_active)
        .fetch_optional(executor)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return AppError::CategoryNameAlreadyExists(name.to_string());
            }
            AppError::from(e)
        })?
        .ok_or(AppError::ResourceNotFound("Categoria"))
    }

    pub async fn delete_category<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM categories WHERE tenant_id = $1 AND id = $2")
            .bind(tenant_id)
            .bind(id)
            .execute(executor)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    return AppError::ResourceInUse("Categoria");
                }
                AppError::from(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound("Categoria"));
        }
        Ok(())
    }

    // =========================================================================
    //  FORMAS DE PAGAMENTO
    // =========================================================================

    pub async fn list_payment_methods<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
    ) -> Result<Vec<PaymentMethod>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let methods = sqlx::query_as::<_, PaymentMethod>(
            "SELECT * FROM payment_methods WHERE tenant_id = $1 ORDER BY name ASC",
        )
        .bind(tenant_id)
        .fetch_all(executor)
        .await?;

        Ok(methods)
    }

    pub async fn create_payment_method<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        input: &PaymentMethodPayload,
    ) -> Result<PaymentMethod, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let method = sqlx::query_as::<_, PaymentMethod>(
            r#"
            INSERT INTO payment_methods (tenant_id, name, description)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(input.name.trim())
        .bind(non_blank(&input.description))
        .fetch_one(executor)
        .await?;

        Ok(method)
    }

    pub async fn update_payment_method<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        id: Uuid,
        input: &PaymentMethodPayload,
    ) -> Result<PaymentMethod, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, PaymentMethod>(
            r#"
            UPDATE payment_methods
            SET name = $3, description = $4
            WHERE tenant_id = $1 AND id = $2
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(id)
        .bind(input.name.trim())
        .bind(non_blank(&input.description))
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::ResourceNotFound("Forma de pagamento"))
    }

    pub async fn delete_payment_method<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM payment_methods WHERE tenant_id = $1 AND id = $2")
            .bind(tenant_id)
            .bind(id)
            .execute(executor)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    return AppError::ResourceInUse("Forma de pagamento");
                }
                AppError::from(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound("Forma de pagamento"));
        }
        Ok(())
    }
}
