pub mod auth;
pub mod catalog;
pub mod dashboard;
pub mod notification;
pub mod settings;
pub mod tenancy;
pub mod transaction;
