// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Tenancy ---
        handlers::tenancy::create_tenant,
        handlers::tenancy::list_my_tenants,

        // --- Users ---
        handlers::users::create_user,
        handlers::users::list_users,

        // --- Lançamentos ---
        handlers::transactions::list_transactions,
        handlers::transactions::get_transaction,
        handlers::transactions::create_transaction,
        handlers::transactions::update_transaction,
        handlers::transactions::delete_transaction,

        // --- Cadastros ---
        handlers::catalog::list_categories,
        handlers::catalog::create_category,
        handlers::catalog::update_category,
        handlers::catalog::delete_category,
        handlers::catalog::list_payment_methods,
        handlers::catalog::create_payment_method,
        handlers::catalog::update_payment_method,
        handlers::catalog::delete_payment_method,

        // --- Settings ---
        handlers::settings::get_settings,
        handlers::settings::update_settings,

        // --- Dashboard ---
        handlers::dashboard::get_dashboard,

        // --- Notificações ---
        handlers::notifications::send_test_notification,
        handlers::notifications::list_variables,

        // --- Relay ---
        handlers::relay::telegram_test,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Tenancy ---
            models::tenancy::TenantRole,
            models::tenancy::Tenant,
            models::tenancy::TenantMembership,
            models::tenancy::MyTenant,
            models::tenancy::TenantMember,
            models::tenancy::CreateTenantPayload,
            models::tenancy::CreateUserPayload,

            // --- Lançamentos ---
            models::transaction::TransactionType,
            models::transaction::TransactionStatus,
            models::transaction::TransactionDetail,
            models::transaction::TransactionPayload,
            models::transaction::TransactionListResponse,

            // --- Cadastros ---
            models::catalog::Category,
            models::catalog::CategoryPayload,
            models::catalog::PaymentMethod,
            models::catalog::PaymentMethodPayload,

            // --- Settings ---
            models::settings::SettingsView,
            models::settings::UpdateSettingsRequest,

            // --- Dashboard ---
            models::dashboard::DashboardSummary,
            models::dashboard::CategoryEntry,
            models::dashboard::MonthlyEntry,
            models::dashboard::DashboardReport,

            // --- Notificações ---
            models::notification::NotificationTestRequest,
            models::notification::NotificationTestResponse,
            services::template::VariableInfo,
            handlers::relay::RelayRequest,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Tenancy", description = "Empresas e acesso"),
        (name = "Users", description = "Usuários da empresa"),
        (name = "Transactions", description = "Lançamentos (contas a pagar e a receber)"),
        (name = "Categories", description = "Plano de contas"),
        (name = "Payment Methods", description = "Formas de pagamento"),
        (name = "Settings", description = "Configurações da empresa"),
        (name = "Dashboard", description = "Indicadores e gráficos"),
        (name = "Notifications", description = "Modelos de mensagem e teste do Telegram"),
        (name = "Relay", description = "Função de envio ao Telegram")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/transactions",
            "/api/transactions/{id}",
            "/api/dashboard",
            "/api/notifications/test",
            "/functions/telegram-test",
        ] {
            assert!(doc.paths.paths.contains_key(path), "faltou {}", path);
        }
    }
}
