use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::error::RelayError;
use crate::telegram::TelegramClient;

/// Forwards caller text to the one configured chat.
pub struct Relay {
    client: Arc<TelegramClient>,
    chat_id: String,
}

impl Relay {
    pub fn new(client: Arc<TelegramClient>, chat_id: impl Into<String>) -> Self {
        Self {
            client,
            chat_id: chat_id.into(),
        }
    }

    /// Send `message` and return Telegram's decoded reply verbatim.
    pub async fn send(&self, message: Option<&str>) -> Result<Value, RelayError> {
        let text = match message {
            Some(m) if !m.is_empty() => m,
            _ => return Err(RelayError::InvalidInput("No message provided".to_string())),
        };

        let reply = self.client.send_message(&self.chat_id, text).await?;

        // sendMessage reports failures inside a JSON envelope, often with a 4xx status
        if reply.get("ok").and_then(Value::as_bool) == Some(false) {
            let description = reply
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or("Telegram API returned an error");
            return Err(RelayError::Upstream(description.to_string()));
        }

        info!("Relayed {} chars to chat {}", text.chars().count(), self.chat_id);
        Ok(reply)
    }
}
