// src/models/notification.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationTestRequest {
    /// Modelo a testar. Vazio usa o modelo salvo.
    #[schema(example = "{supplier} - {amount} vence em {dueDate}")]
    pub message_template: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationTestResponse {
    pub sent: usize,
    #[schema(example = "3 mensagens de teste enviadas.")]
    pub message: String,
}
