use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::{Result, TidingsError};
use crate::delivery::{Deliverer, Outgoing};

pub const TELEGRAM_API_URL: &str = "https://api.telegram.org";

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Delivers messages through the Telegram Bot API using HTML parse mode.
pub struct TelegramDeliverer {
    client: Client,
    token: String,
    chat_id: String,
    base_url: String,
}

impl TelegramDeliverer {
    pub fn new(client: Client, token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            client,
            token: token.into(),
            chat_id: chat_id.into(),
            base_url: TELEGRAM_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn call(&self, method: &str, body: Value) -> Result<()> {
        let url = format!("{}/bot{}/{}", self.base_url, self.token, method);

        // Request URLs carry the bot token; keep them out of error messages.
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| TidingsError::Http(e.without_url()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| TidingsError::Http(e.without_url()))?;

        match serde_json::from_str::<ApiResponse>(&text) {
            Ok(api) if api.ok && status.is_success() => Ok(()),
            Ok(api) => Err(TidingsError::Delivery(format!(
                "{} returned {}: {}",
                method,
                status,
                api.description.unwrap_or_default()
            ))),
            Err(_) => Err(TidingsError::Delivery(format!(
                "{} returned {}: {}",
                method, status, text
            ))),
        }
    }
}

#[async_trait]
impl Deliverer for TelegramDeliverer {
    async fn deliver(&self, message: &Outgoing) -> Result<()> {
        match message {
            Outgoing::Photo { url, caption } => {
                self.call(
                    "sendPhoto",
                    json!({
                        "chat_id": self.chat_id,
                        "photo": url,
                        "caption": caption,
                        "parse_mode": "HTML",
                    }),
                )
                .await
            }
            Outgoing::Text { text } => {
                self.call(
                    "sendMessage",
                    json!({
                        "chat_id": self.chat_id,
                        "text": text,
                        "parse_mode": "HTML",
                        "disable_web_page_preview": false,
                    }),
                )
                .await
            }
        }
    }
}
