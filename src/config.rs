// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{CatalogRepository, SettingsRepository, TenantRepository, TransactionRepository, UserRepository},
    services::{
        auth::AuthService,
        catalog_service::CatalogService,
        dashboard_service::DashboardService,
        notification_service::NotificationService,
        settings_service::SettingsService,
        telegram::{TelegramClient, TelegramRelay},
        tenancy_service::TenantService,
        transaction_service::TransactionService,
    },
};

const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

// Variáveis de ambiente (ou .env)
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub telegram_api_base: String,
    pub max_connections: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(value) => value
                .parse()
                .context("DATABASE_MAX_CONNECTIONS deve ser um número")?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?,
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| DEFAULT_SERVER_ADDR.to_string()),
            telegram_api_base: env::var("TELEGRAM_API_BASE")
                .unwrap_or_else(|_| DEFAULT_TELEGRAM_API_BASE.to_string()),
            max_connections,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub tenant_service: TenantService,
    pub transaction_service: TransactionService,
    pub catalog_service: CatalogService,
    pub settings_service: SettingsService,
    pub dashboard_service: DashboardService,
    pub notification_service: NotificationService,
    pub telegram_client: TelegramClient,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let tenant_repo = TenantRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo.clone(), config.jwt_secret.clone());
        let tenant_service = TenantService::new(tenant_repo, user_repo, db_pool.clone());
        let transaction_service =
            TransactionService::new(TransactionRepository::new(), db_pool.clone());
        let catalog_service = CatalogService::new(CatalogRepository::new(), db_pool.clone());
        let settings_service = SettingsService::new(SettingsRepository::new(), db_pool.clone());
        let dashboard_service = DashboardService::new(transaction_service.clone());

        let telegram_client = TelegramClient::new(config.telegram_api_base.clone());
        let notification_service = NotificationService::new(
            settings_service.clone(),
            transaction_service.clone(),
            Arc::new(TelegramRelay::new(telegram_client.clone())),
        );

        Ok(Self {
            db_pool,
            auth_service,
            tenant_service,
            transaction_service,
            catalog_service,
            settings_service,
            dashboard_service,
            notification_service,
            telegram_client,
        })
    }
}
