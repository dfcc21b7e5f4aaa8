// src/models/settings.rs

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::models::tenancy::TenantRole;

// Chaves conhecidas da tabela `settings`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    BackendUrl,
    BackendApiKey,
    TelegramBotToken,
    TelegramChatId,
    TelegramMessageTemplate,
    NotificationSchedule,
    NotificationStatus,
    NotificationDays,
}

impl SettingKey {
    pub const TELEGRAM: [SettingKey; 3] = [
        SettingKey::TelegramBotToken,
        SettingKey::TelegramChatId,
        SettingKey::TelegramMessageTemplate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::BackendUrl => "backend_url",
            SettingKey::BackendApiKey => "backend_api_key",
            SettingKey::TelegramBotToken => "telegram_bot_token",
            SettingKey::TelegramChatId => "telegram_chat_id",
            SettingKey::TelegramMessageTemplate => "telegram_message_template",
            SettingKey::NotificationSchedule => "notification_schedule",
            SettingKey::NotificationStatus => "notification_status",
            SettingKey::NotificationDays => "notification_days",
        }
    }
}

// Linha crua da tabela
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Setting {
    pub key: String,
    pub value: String,
}

/// Busca o valor de uma chave, ignorando valores vazios.
pub fn setting_value<'a>(settings: &'a [Setting], key: SettingKey) -> Option<&'a str> {
    settings
        .iter()
        .find(|s| s.key == key.as_str())
        .map(|s| s.value.as_str())
        .filter(|v| !v.trim().is_empty())
}

// Status que disparam a notificação agendada
const NOTIFICATION_STATUSES: [&str; 3] = ["pendente", "atrasado", "todos"];

fn validate_schedule(value: &str) -> Result<(), ValidationError> {
    if NaiveTime::parse_from_str(value, "%H:%M").is_err() {
        let mut err = ValidationError::new("schedule");
        err.message = Some("Horário deve estar no formato HH:MM".into());
        return Err(err);
    }
    Ok(())
}

fn validate_notification_status(value: &str) -> Result<(), ValidationError> {
    if !NOTIFICATION_STATUSES.contains(&value) {
        let mut err = ValidationError::new("notification_status");
        err.message = Some("Status deve ser pendente, atrasado ou todos".into());
        return Err(err);
    }
    Ok(())
}

fn validate_days(days: &Vec<u8>) -> Result<(), ValidationError> {
    if days.iter().any(|d| *d > 6) {
        let mut err = ValidationError::new("days");
        err.message = Some("Dias da semana vão de 0 (domingo) a 6 (sábado)".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    #[validate(url(message = "URL inválida"))]
    #[schema(example = "https://meu-projeto.exemplo.com")]
    pub backend_url: Option<String>,
    pub backend_api_key: Option<String>,

    pub telegram_bot_token: Option<String>,
    #[schema(example = "-1001234567890")]
    pub telegram_chat_id: Option<String>,
    #[schema(example = "{description} - {supplier}: {amount} vence em {dueDate}")]
    pub telegram_message_template: Option<String>,

    #[validate(custom(function = "validate_schedule"))]
    #[schema(example = "08:30")]
    pub notification_schedule: Option<String>,
    #[validate(custom(function = "validate_notification_status"))]
    #[schema(example = "pendente")]
    pub notification_status: Option<String>,
    #[validate(custom(function = "validate_days"))]
    #[schema(example = json!([1, 3, 5]))]
    pub notification_days: Option<Vec<u8>>,
}

impl UpdateSettingsRequest {
    /// Pares chave/valor efetivamente enviados (campos ausentes não mudam).
    pub fn into_entries(self) -> Vec<(SettingKey, String)> {
        let days = self.notification_days.map(|mut days| {
            days.sort_unstable();
            days.dedup();
            days.iter().map(u8::to_string).collect::<Vec<_>>().join(",")
        });

        [
            (SettingKey::BackendUrl, self.backend_url),
            (SettingKey::BackendApiKey, self.backend_api_key),
            (SettingKey::TelegramBotToken, self.telegram_bot_token),
            (SettingKey::TelegramChatId, self.telegram_chat_id),
            (SettingKey::TelegramMessageTemplate, self.telegram_message_template),
            (SettingKey::NotificationSchedule, self.notification_schedule),
            (SettingKey::NotificationStatus, self.notification_status),
            (SettingKey::NotificationDays, days),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
        .collect()
    }
}

// O painel de configurações como o front enxerga
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettingsView {
    pub backend_url: Option<String>,
    pub backend_api_key: Option<String>,
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub telegram_message_template: Option<String>,
    pub notification_schedule: Option<String>,
    pub notification_status: Option<String>,
    pub notification_days: Vec<u8>,
}

impl From<&[Setting]> for SettingsView {
    fn from(settings: &[Setting]) -> Self {
        let get = |key: SettingKey| setting_value(settings, key).map(str::to_string);

        SettingsView {
            backend_url: get(SettingKey::BackendUrl),
            backend_api_key: get(SettingKey::BackendApiKey),
            telegram_bot_token: get(SettingKey::TelegramBotToken),
            telegram_chat_id: get(SettingKey::TelegramChatId),
            telegram_message_template: get(SettingKey::TelegramMessageTemplate),
            notification_schedule: get(SettingKey::NotificationSchedule),
            notification_status: get(SettingKey::NotificationStatus),
            notification_days: setting_value(settings, SettingKey::NotificationDays)
                .map(|days| days.split(',').filter_map(|d| d.trim().parse().ok()).collect())
                .unwrap_or_default(),
        }
    }
}

// Segredos aparecem só como "definido" para quem não é admin
pub const SECRET_MASK: &str = "********";

impl SettingsView {
    /// Esconde token do bot e chave da API de quem não pode alterá-los.
    pub fn for_role(mut self, role: TenantRole) -> Self {
        if role != TenantRole::Admin {
            let mask = |secret: Option<String>| secret.map(|_| SECRET_MASK.to_string());
            self.telegram_bot_token = mask(self.telegram_bot_token);
            self.backend_api_key = mask(self.backend_api_key);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(key: SettingKey, value: &str) -> Setting {
        Setting { key: key.as_str().into(), value: value.into() }
    }

    #[test]
    fn only_provided_fields_become_entries() {
        let request = UpdateSettingsRequest {
            telegram_chat_id: Some("123".into()),
            notification_days: Some(vec![5, 1, 3, 1]),
            ..Default::default()
        };
        let entries = request.into_entries();
        assert_eq!(
            entries,
            vec![
                (SettingKey::TelegramChatId, "123".to_string()),
                (SettingKey::NotificationDays, "1,3,5".to_string()),
            ]
        );
    }

    #[test]
    fn schedule_fields_are_validated() {
        let request = UpdateSettingsRequest {
            notification_schedule: Some("25:00".into()),
            notification_status: Some("pago".into()),
            notification_days: Some(vec![7]),
            ..Default::default()
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("notification_schedule"));
        assert!(fields.contains_key("notification_status"));
        assert!(fields.contains_key("notification_days"));

        let ok = UpdateSettingsRequest {
            notification_schedule: Some("08:30".into()),
            notification_status: Some("todos".into()),
            notification_days: Some(vec![0, 6]),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn view_is_built_from_rows_and_skips_blank_values() {
        let rows = vec![
            row(SettingKey::TelegramBotToken, "abc"),
            row(SettingKey::TelegramChatId, "  "),
            row(SettingKey::NotificationDays, "1,3,5"),
        ];
        let view = SettingsView::from(rows.as_slice());
        assert_eq!(view.telegram_bot_token.as_deref(), Some("abc"));
        assert_eq!(view.telegram_chat_id, None);
        assert_eq!(view.notification_days, vec![1, 3, 5]);
        assert_eq!(setting_value(&rows, SettingKey::TelegramMessageTemplate), None);
    }

    #[test]
    fn secrets_are_masked_for_members_but_not_admins() {
        let rows = vec![
            row(SettingKey::TelegramBotToken, "123:abc"),
            row(SettingKey::BackendApiKey, "chave"),
            row(SettingKey::TelegramChatId, "-100"),
        ];
        let view = SettingsView::from(rows.as_slice());

        let member = view.clone().for_role(TenantRole::User);
        assert_eq!(member.telegram_bot_token.as_deref(), Some(SECRET_MASK));
        assert_eq!(member.backend_api_key.as_deref(), Some(SECRET_MASK));
        assert_eq!(member.telegram_chat_id.as_deref(), Some("-100"));

        let admin = view.clone().for_role(TenantRole::Admin);
        assert_eq!(admin, view);

        let unset = SettingsView::default().for_role(TenantRole::User);
        assert_eq!(unset.telegram_bot_token, None);
    }
}
