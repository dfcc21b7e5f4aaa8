// src/services/tenancy_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{TenantRepository, UserRepository},
    models::tenancy::{MyTenant, Tenant, TenantMember, TenantMembership, TenantRole},
    services::auth::hash_password,
};

#[derive(Clone)]
pub struct TenantService {
    tenant_repo: TenantRepository,
    user_repo: UserRepository,
    pool: PgPool, // Usamos a pool para iniciar transações
}

impl TenantService {
    pub fn new(tenant_repo: TenantRepository, user_repo: UserRepository, pool: PgPool) -> Self {
        Self { tenant_repo, user_repo, pool }
    }

    /// Associação do usuário com o inquilino pedido (ou a mais antiga).
    pub async fn resolve_membership(
        &self,
        user_id: Uuid,
        requested: Option<Uuid>,
    ) -> Result<Option<TenantMembership>, AppError> {
        self.tenant_repo.find_membership(user_id, requested).await
    }

    /// Cria o inquilino e, atomicamente, associa o criador como `admin`.
    pub async fn create_tenant_with_admin(
        &self,
        name: &str,
        slug: &str,
        creator_id: Uuid,
    ) -> Result<Tenant, AppError> {
        let mut tx = self.pool.begin().await?;

        let tenant = self
            .tenant_repo
            .create_tenant(&mut *tx, name.trim(), slug)
            .await?;

        self.tenant_repo
            .add_member(&mut *tx, tenant.id, creator_id, TenantRole::Admin)
            .await?;

        tx.commit().await?;

        tracing::info!("Inquilino '{}' criado por {}", tenant.slug, creator_id);
        Ok(tenant)
    }

    pub async fn list_user_tenants(&self, user_id: Uuid) -> Result<Vec<MyTenant>, AppError> {
        self.tenant_repo.list_tenants_for_user(user_id).await
    }

    /// Cria a conta e a associação numa única transação.
    /// Só um administrador do inquilino de destino pode fazer isso.
    pub async fn create_member(
        &self,
        caller_id: Uuid,
        tenant_id: Uuid,
        email: &str,
        password: &str,
        role: TenantRole,
    ) -> Result<TenantMembership, AppError> {
        let caller = self
            .tenant_repo
            .find_membership(caller_id, Some(tenant_id))
            .await?
            .ok_or(AppError::NoTenantAccess)?;

        if caller.role != TenantRole::Admin {
            return Err(AppError::AdminRequired);
        }

        let hashed_password = hash_password(password).await?;

        let mut tx = self.pool.begin().await?;

        let user = self
            .user_repo
            .create_user(&mut *tx, email.trim(), &hashed_password)
            .await?;

        let membership = self
            .tenant_repo
            .add_member(&mut *tx, tenant_id, user.id, role)
            .await?;

        tx.commit().await?;

        Ok(membership)
    }

    pub async fn list_members(&self, tenant_id: Uuid) -> Result<Vec<TenantMember>, AppError> {
        self.tenant_repo.list_members(tenant_id).await
    }
}
