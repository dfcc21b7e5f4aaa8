// src/services/telegram.rs
//
// Cliente da Bot API do Telegram e o relay usado pelas notificações.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use crate::common::error::AppError;

pub const DEFAULT_TEST_MESSAGE: &str = "Test notification from your app!";

#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    api_base: String,
}

impl TelegramClient {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Envia `sendMessage` e devolve o corpo JSON do Telegram como veio.
    /// `chat_id` pode ser texto ou número, do jeito que o chamador mandou.
    pub async fn send_message(
        &self,
        bot_token: &str,
        chat_id: &Value,
        text: Option<&str>,
    ) -> Result<Value, AppError> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, bot_token);
        let body = json!({
            "chat_id": chat_id,
            "text": text.filter(|t| !t.is_empty()).unwrap_or(DEFAULT_TEST_MESSAGE),
            "parse_mode": "HTML",
        });

        let response = self.client.post(&url).json(&body).send().await?;
        let result = response.json::<Value>().await?;
        Ok(result)
    }
}

/// Canal de saída das mensagens. Nos testes é trocado por um fake.
#[async_trait]
pub trait MessageRelay: Send + Sync {
    async fn send(&self, bot_token: &str, chat_id: &str, text: &str) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct TelegramRelay {
    client: TelegramClient,
}

impl TelegramRelay {
    pub fn new(client: TelegramClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MessageRelay for TelegramRelay {
    async fn send(&self, bot_token: &str, chat_id: &str, text: &str) -> Result<(), AppError> {
        let result = self
            .client
            .send_message(bot_token, &Value::String(chat_id.to_string()), Some(text))
            .await
            .map_err(|e| AppError::RelayError(e.to_string()))?;

        if result.get("ok").and_then(Value::as_bool) != Some(true) {
            let description = result
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or("resposta sem 'ok'");
            return Err(AppError::RelayError(description.to_string()));
        }

        Ok(())
    }
}
