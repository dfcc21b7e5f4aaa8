pub mod auth;
pub mod catalog;
pub mod dashboard;
pub mod notifications;
pub mod relay;
pub mod settings;
pub mod tenancy;
pub mod transactions;
pub mod users;
