//! Minimal Telegram Bot API client: `sendMessage` and `getUpdates`.
//! Docs: <https://core.telegram.org/bots/api>

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::TelegramConfig;
use crate::error::RelayError;

/// The `{ok, result, description}` envelope every Bot API method answers with.
#[derive(Debug, Deserialize)]
pub struct TgResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

pub struct TelegramClient {
    client: reqwest::Client,
    base_url: String,
    poll_timeout: Duration,
}

impl TelegramClient {
    pub fn new(config: &TelegramConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        let base_url = format!(
            "{}/bot{}",
            config.api_base_url.trim_end_matches('/'),
            config.bot_token
        );

        Ok(Self {
            client,
            base_url,
            poll_timeout: Duration::from_secs(config.poll_timeout_secs),
        })
    }

    /// POST `sendMessage` and hand back the decoded body untouched.
    pub async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
    ) -> Result<serde_json::Value, RelayError> {
        let url = format!("{}/sendMessage", self.base_url);
        debug!("Sending message to chat {}", chat_id);

        let response = self
            .client
            .post(&url)
            .json(&SendMessageRequest { chat_id, text })
            .send()
            .await?;

        Ok(response.json().await?)
    }

    /// GET `getUpdates`, returning only updates with `update_id >= offset`.
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, RelayError> {
        let url = format!("{}/getUpdates", self.base_url);
        debug!("Fetching updates with offset {}", offset);

        let response = self
            .client
            .get(&url)
            .query(&[("offset", offset)])
            .timeout(self.poll_timeout)
            .send()
            .await?;

        let body: TgResponse<Vec<Update>> = response.json().await?;
        if !body.ok {
            return Err(RelayError::Upstream(
                body.description
                    .unwrap_or_else(|| "Telegram API returned an error".to_string()),
            ));
        }

        Ok(body.result.unwrap_or_default())
    }
}
