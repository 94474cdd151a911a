use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::app::{Result, TidingsError};
use crate::domain::Entry;
use crate::enrich::Enricher;
use crate::normalizer::strip_html;
use crate::normalizer::text::truncate_chars;

pub const OPENAI_API_URL: &str = "https://api.openai.com";

/// Characters of article snippet sent with each request.
const MAX_INPUT_CHARS: usize = 4000;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Summaries from an OpenAI-compatible chat-completions endpoint.
pub struct OpenAiEnricher {
    client: Client,
    api_key: String,
    model: String,
    language: String,
    base_url: String,
    max_tokens: u32,
}

impl OpenAiEnricher {
    pub fn new(
        client: Client,
        api_key: impl Into<String>,
        model: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            language: language.into(),
            base_url: OPENAI_API_URL.to_string(),
            max_tokens: 180,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn system_prompt(&self) -> String {
        format!(
            "You summarize news articles for a chat channel. Answer in {} with at most \
             two short sentences of plain text. Do not add a preamble, opinions or links.",
            self.language
        )
    }

    fn user_prompt(entry: &Entry) -> String {
        let snippet = entry.summary.as_deref().map(strip_html).unwrap_or_default();
        format!(
            "Title: {}\nSource: {}\n\n{}",
            entry.display_title(),
            entry.display_link(),
            truncate_chars(&snippet, MAX_INPUT_CHARS)
        )
    }
}

#[async_trait]
impl Enricher for OpenAiEnricher {
    async fn summarize(&self, entry: &Entry) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system".into(),
                    content: self.system_prompt(),
                },
                ChatMessage {
                    role: "user".into(),
                    content: Self::user_prompt(entry),
                },
            ],
            max_tokens: self.max_tokens,
            temperature: 0.3,
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TidingsError::Enrichment(format!("{}: {}", status, body)));
        }

        let body: ChatResponse = response.json().await?;
        let summary = body
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| TidingsError::Enrichment("empty completion".into()))?;

        Ok(summary)
    }
}
