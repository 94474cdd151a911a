use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;

use crate::app::{Result, TidingsError};
use crate::domain::SeenState;
use crate::store::{SaveOutcome, StateStore, STATE_FILE_NAME};

pub const GITHUB_API_URL: &str = "https://api.github.com";

const GIST_DESCRIPTION: &str = "tidings dedup state";

#[derive(Debug, Deserialize)]
struct Gist {
    id: String,
    #[serde(default)]
    files: HashMap<String, GistFile>,
}

#[derive(Debug, Deserialize)]
struct GistFile {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    truncated: bool,
    #[serde(default)]
    raw_url: Option<String>,
}

/// [`SeenState`] kept as a JSON file inside a private GitHub gist.
///
/// Without a gist id the store is ephemeral on load and creates a new gist on
/// save.
pub struct GistStore {
    client: Client,
    token: String,
    gist_id: Option<String>,
    base_url: String,
}

impl GistStore {
    pub fn new(client: Client, token: impl Into<String>, gist_id: Option<String>) -> Self {
        Self {
            client,
            token: token.into(),
            gist_id: gist_id.filter(|id| !id.trim().is_empty()),
            base_url: GITHUB_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, concat!("tidings/", env!("CARGO_PKG_VERSION")))
            .header("X-GitHub-Api-Version", "2022-11-28")
    }

    async fn fetch_raw(&self, raw_url: &str) -> Result<String> {
        let response = self.authorized(self.client.get(raw_url)).send().await?;
        let response = ensure_success(response).await?;
        Ok(response.text().await?)
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(TidingsError::StateStore { status, body })
}

#[async_trait]
impl StateStore for GistStore {
    async fn load(&self) -> Result<SeenState> {
        let Some(gist_id) = &self.gist_id else {
            tracing::info!("No gist configured, starting with empty state");
            return Ok(SeenState::new());
        };

        let url = format!("{}/gists/{}", self.base_url, gist_id);
        let response = self.authorized(self.client.get(&url)).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::warn!(gist = %gist_id, "State gist not found, starting with empty state");
            return Ok(SeenState::new());
        }

        let gist: Gist = ensure_success(response).await?.json().await?;

        let Some(file) = gist.files.get(STATE_FILE_NAME) else {
            tracing::warn!(
                gist = %gist.id,
                file = STATE_FILE_NAME,
                "State file missing from gist, starting with empty state"
            );
            return Ok(SeenState::new());
        };

        let content = match (&file.content, &file.raw_url) {
            (_, Some(raw_url)) if file.truncated => self.fetch_raw(raw_url).await?,
            (Some(content), _) => content.clone(),
            (None, _) => String::new(),
        };

        if content.trim().is_empty() {
            return Ok(SeenState::new());
        }

        let state = SeenState::from_json(&content)?;
        tracing::info!(
            ids = state.ids.len(),
            links = state.links.len(),
            titles = state.titles.len(),
            "Loaded state from gist"
        );
        Ok(state)
    }

    async fn save(&self, state: &SeenState) -> Result<SaveOutcome> {
        let content = state.to_json()?;
        let mut files = serde_json::Map::new();
        files.insert(STATE_FILE_NAME.to_string(), json!({ "content": content }));

        match &self.gist_id {
            Some(gist_id) => {
                let url = format!("{}/gists/{}", self.base_url, gist_id);
                let body = json!({ "files": files });
                let response = self
                    .authorized(self.client.patch(&url))
                    .json(&body)
                    .send()
                    .await?;
                ensure_success(response).await?;
                tracing::info!(gist = %gist_id, entries = state.len(), "Updated state gist");
                Ok(SaveOutcome::Updated)
            }
            None => {
                let url = format!("{}/gists", self.base_url);
                let body = json!({
                    "description": GIST_DESCRIPTION,
                    "public": false,
                    "files": files,
                });
                let response = self
                    .authorized(self.client.post(&url))
                    .json(&body)
                    .send()
                    .await?;
                let gist: Gist = ensure_success(response).await?.json().await?;
                tracing::info!(gist = %gist.id, "Created state gist");
                Ok(SaveOutcome::Created { id: gist.id })
            }
        }
    }
}
