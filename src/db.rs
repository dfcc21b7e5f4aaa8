pub mod catalog_repo;
pub use catalog_repo::CatalogRepository;
pub mod settings_repo;
pub use settings_repo::SettingsRepository;
pub mod tenancy_repo;
pub use tenancy_repo::TenantRepository;
pub mod transaction_repo;
pub use transaction_repo::TransactionRepository;
pub mod user_repo;
pub use user_repo::UserRepository;
