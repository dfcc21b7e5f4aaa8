// src/services/notification_service.rs

use std::sync::Arc;

use crate::{
    common::error::AppError,
    middleware::tenancy::TenantContext,
    models::{
        settings::{setting_value, Setting, SettingKey},
        transaction::{TransactionDetail, TransactionFilter},
    },
    services::{
        settings_service::SettingsService,
        telegram::MessageRelay,
        template::render_batch,
        transaction_service::TransactionService,
    },
};

// Quantos lançamentos recentes entram no teste
const TEST_SAMPLE_SIZE: i64 = 3;
const FALLBACK_TEMPLATE: &str = "Teste de notificação";

/// Mensagens prontas para envio, com o destino já resolvido.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestBatch {
    pub bot_token: String,
    pub chat_id: String,
    pub messages: Vec<String>,
}

/// Monta o lote de teste. Nenhuma chamada de rede acontece aqui.
///
/// Modelo usado: o da requisição, senão o salvo, senão um texto fixo.
pub fn prepare_test_batch(
    settings: &[Setting],
    transactions: &[TransactionDetail],
    template_override: Option<&str>,
) -> Result<TestBatch, AppError> {
    if settings.is_empty() || transactions.is_empty() {
        return Err(AppError::NothingToTest);
    }

    let (bot_token, chat_id) = match (
        setting_value(settings, SettingKey::TelegramBotToken),
        setting_value(settings, SettingKey::TelegramChatId),
    ) {
        (Some(token), Some(chat)) => (token.to_string(), chat.to_string()),
        _ => return Err(AppError::TelegramNotConfigured),
    };

    let template = template_override
        .filter(|t| !t.trim().is_empty())
        .or_else(|| setting_value(settings, SettingKey::TelegramMessageTemplate))
        .unwrap_or(FALLBACK_TEMPLATE);

    Ok(TestBatch {
        bot_token,
        chat_id,
        messages: render_batch(template, transactions),
    })
}

/// Envia em sequência, um por vez. A primeira falha interrompe o resto;
/// o que já foi enviado fica enviado.
pub async fn deliver(relay: &dyn MessageRelay, batch: &TestBatch) -> Result<usize, AppError> {
    for (sent, message) in batch.messages.iter().enumerate() {
        if let Err(e) = relay.send(&batch.bot_token, &batch.chat_id, message).await {
            tracing::warn!("Envio interrompido após {} mensagens", sent);
            return Err(e);
        }
    }
    Ok(batch.messages.len())
}

#[derive(Clone)]
pub struct NotificationService {
    settings: SettingsService,
    transactions: TransactionService,
    relay: Arc<dyn MessageRelay>,
}

impl NotificationService {
    pub fn new(
        settings: SettingsService,
        transactions: TransactionService,
        relay: Arc<dyn MessageRelay>,
    ) -> Self {
        Self { settings, transactions, relay }
    }

    /// Dispara o teste com os lançamentos mais recentes do inquilino.
    pub async fn send_test(
        &self,
        ctx: &TenantContext,
        template_override: Option<&str>,
    ) -> Result<usize, AppError> {
        let settings = self.settings.telegram_settings(ctx).await?;
        if settings.is_empty() {
            return Err(AppError::NothingToTest);
        }

        let recent = TransactionFilter { limit: Some(TEST_SAMPLE_SIZE), ..Default::default() };
        let transactions = self.transactions.fetch(ctx, &recent).await?;

        let batch = prepare_test_batch(&settings, &transactions, template_override)?;
        let sent = deliver(self.relay.as_ref(), &batch).await?;

        tracing::info!("{} mensagens de teste enviadas para o inquilino {}", sent, ctx.tenant_id);
        Ok(sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::template::tests::transaction;
    use async_trait::async_trait;
    use std::sync::Mutex;

    // Guarda as mensagens; falha a partir da chamada `fail_at`, se houver
    #[derive(Default)]
    struct RecordingRelay {
        sent: Mutex<Vec<(String, String, String)>>,
        fail_at: Option<usize>,
    }

    #[async_trait]
    impl MessageRelay for RecordingRelay {
        async fn send(&self, bot_token: &str, chat_id: &str, text: &str) -> Result<(), AppError> {
            let mut sent = self.sent.lock().unwrap();
            if self.fail_at == Some(sent.len()) {
                return Err(AppError::RelayError("chat not found".into()));
            }
            sent.push((bot_token.into(), chat_id.into(), text.into()));
            Ok(())
        }
    }

    fn setting(key: SettingKey, value: &str) -> Setting {
        Setting { key: key.as_str().into(), value: value.into() }
    }

    fn configured() -> Vec<Setting> {
        vec![
            setting(SettingKey::TelegramBotToken, "123:abc"),
            setting(SettingKey::TelegramChatId, "-100"),
            setting(SettingKey::TelegramMessageTemplate, "Salvo: {supplier}"),
        ]
    }

    #[test]
    fn nothing_to_test_without_settings_or_transactions() {
        let txs = [transaction("Acme", "10")];
        assert!(matches!(prepare_test_batch(&[], &txs, None), Err(AppError::NothingToTest)));
        assert!(matches!(prepare_test_batch(&configured(), &[], None), Err(AppError::NothingToTest)));
    }

    #[test]
    fn missing_token_or_chat_is_reported_before_sending() {
        let txs = [transaction("Acme", "10")];
        let only_token = vec![setting(SettingKey::TelegramBotToken, "123:abc")];
        assert!(matches!(
            prepare_test_batch(&only_token, &txs, None),
            Err(AppError::TelegramNotConfigured)
        ));

        let blank_chat = vec![
            setting(SettingKey::TelegramBotToken, "123:abc"),
            setting(SettingKey::TelegramChatId, " "),
        ];
        assert!(matches!(
            prepare_test_batch(&blank_chat, &txs, None),
            Err(AppError::TelegramNotConfigured)
        ));
    }

    #[test]
    fn template_precedence_is_request_then_stored_then_fallback() {
        let txs = [transaction("Acme", "10")];

        let batch = prepare_test_batch(&configured(), &txs, Some("Pedido: {supplier}")).unwrap();
        assert_eq!(batch.messages, vec!["Pedido: Acme"]);

        let batch = prepare_test_batch(&configured(), &txs, Some("   ")).unwrap();
        assert_eq!(batch.messages, vec!["Salvo: Acme"]);

        let without_template = configured()[..2].to_vec();
        let batch = prepare_test_batch(&without_template, &txs, None).unwrap();
        assert_eq!(batch.messages, vec!["Teste de notificação"]);
        assert_eq!(batch.bot_token, "123:abc");
        assert_eq!(batch.chat_id, "-100");
    }

    #[tokio::test]
    async fn messages_are_sent_in_order() {
        let relay = RecordingRelay::default();
        let batch = TestBatch {
            bot_token: "t".into(),
            chat_id: "c".into(),
            messages: vec!["um".into(), "dois".into(), "três".into()],
        };

        assert_eq!(deliver(&relay, &batch).await.unwrap(), 3);
        let texts: Vec<String> = relay.sent.lock().unwrap().iter().map(|(_, _, t)| t.clone()).collect();
        assert_eq!(texts, vec!["um", "dois", "três"]);
    }

    #[tokio::test]
    async fn first_failure_aborts_the_rest() {
        let relay = RecordingRelay { fail_at: Some(1), ..Default::default() };
        let batch = TestBatch {
            bot_token: "t".into(),
            chat_id: "c".into(),
            messages: vec!["um".into(), "dois".into(), "três".into()],
        };

        assert!(matches!(deliver(&relay, &batch).await, Err(AppError::RelayError(_))));
        assert_eq!(relay.sent.lock().unwrap().len(), 1);
    }
}
