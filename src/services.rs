pub mod auth;
pub mod catalog_service;
pub mod dashboard_service;
pub mod notification_service;
pub mod settings_service;
pub mod telegram;
pub mod template;
pub mod tenancy_service;
pub mod transaction_service;
