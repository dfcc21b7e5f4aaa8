// src/db/tenancy_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::is_unique_violation, error::AppError},
    models::tenancy::{MyTenant, Tenant, TenantMember, TenantMembership, TenantRole},
};

#[derive(Clone)]
pub struct TenantRepository {
    pool: PgPool,
}

impl TenantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Resolve a associação do usuário. Com `tenant_id`, verifica aquele
    /// inquilino; sem ele, usa a associação mais antiga do usuário.
    /// Esta é a verificação de autorização mais importante do sistema.
    pub async fn find_membership(
        &self,
        user_id: Uuid,
        tenant_id: Option<Uuid>,
    ) -> Result<Option<TenantMembership>, AppError> {
        let membership = match tenant_id {
            Some(tenant_id) => {
                sqlx::query_as::<_, TenantMembership>(
                    r#"
                    SELECT user_id, tenant_id, role, created_at
                    FROM tenant_users
                    WHERE user_id = $1 AND tenant_id = $2
                    "#,
                )
                .bind(user_id)
                .bind(tenant_id)
                .fetch_optional(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, TenantMembership>(
                    r#"
                    SELECT user_id, tenant_id, role, created_at
                    FROM tenant_users
                    WHERE user_id = $1
                    ORDER BY created_at ASC
                    LIMIT 1
                    "#,
                )
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?
            }
        };

        Ok(membership)
    }

    /// Cria um novo inquilino. Slug duplicado vira um erro específico.
    pub async fn create_tenant<'e, E>(
        &self,
        executor: E,
        name: &str,
        slug: &str,
    ) -> Result<Tenant, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Tenant>(
            r#"
            INSERT INTO tenants (name, slug)
            VALUES ($1, $2)
            RETURNING id, name, slug, created_at
            "#,
        )
        .bind(name)
        .bind(slug)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return AppError::TenantSlugAlreadyExists(slug.to_string());
            }
            e.into()
        })
    }

    /// Atribui um utilizador a um tenant (na tabela-ponte).
    pub async fn add_member<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        user_id: Uuid,
        role: TenantRole,
    ) -> Result<TenantMembership, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let membership = sqlx::query_as::<_, TenantMembership>(
            r#"
            INSERT INTO tenant_users (user_id, tenant_id, role)
            VALUES ($1, $2, $3)
            RETURNING user_id, tenant_id, role, created_at
            "#,
        )
        .bind(user_id)
        .bind(tenant_id)
        .bind(role)
        .fetch_one(executor)
        .await?;

        Ok(membership)
    }

    pub async fn list_tenants_for_user(&self, user_id: Uuid) -> Result<Vec<MyTenant>, AppError> {
        let tenants = sqlx::query_as::<_, MyTenant>(
            r#"
            SELECT t.id, t.name, t.slug, tu.role, t.created_at
            FROM tenants t
            JOIN tenant_users tu ON tu.tenant_id = t.id
            WHERE tu.user_id = $1
            ORDER BY t.name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tenants)
    }

    pub async fn list_members(&self, tenant_id: Uuid) -> Result<Vec<TenantMember>, AppError> {
        let members = sqlx::query_as::<_, TenantMember>(
            r#"
            SELECT u.id, u.email, tu.role, t.id AS tenant_id, t.name AS tenant_name
            FROM tenant_users tu
            JOIN users u ON u.id = tu.user_id
            JOIN tenants t ON t.id = tu.tenant_id
            WHERE tu.tenant_id = $1
            ORDER BY u.email ASC
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }
}
