use std::sync::Arc;

use reqwest::Client;

use crate::app::error::{Result, TidingsError};
use crate::config::{Settings, StateBackend};
use crate::delivery::{Deliverer, TelegramDeliverer};
use crate::enrich::{Enricher, OpenAiEnricher};
use crate::fetcher::{Fetcher, HttpFetcher};
use crate::pipeline::Pipeline;
use crate::store::{FileStore, GistStore, StateStore};

/// Production collaborators wired from [`Settings`].
pub struct AppContext {
    pub fetcher: Arc<dyn Fetcher + Send + Sync>,
    pub deliverer: Arc<dyn Deliverer + Send + Sync>,
    pub enricher: Option<Arc<dyn Enricher + Send + Sync>>,
    pub store: Box<dyn StateStore + Send + Sync>,
}

impl AppContext {
    /// Fails when delivery or state store credentials are missing.
    pub fn new(settings: &Settings) -> Result<Self> {
        let telegram = settings.telegram()?;

        let client = Client::builder()
            .timeout(settings.http_timeout)
            .user_agent(concat!("tidings/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let store: Box<dyn StateStore + Send + Sync> = match &settings.state {
            StateBackend::File { path } => Box::new(FileStore::new(path)),
            StateBackend::Gist {
                token: Some(token),
                gist_id,
            } => Box::new(GistStore::new(client.clone(), token.clone(), gist_id.clone())),
            StateBackend::Gist { token: None, .. } => {
                return Err(TidingsError::Config(
                    "GITHUB_TOKEN is required unless STATE_FILE is set".into(),
                ))
            }
        };

        let fetcher: Arc<dyn Fetcher + Send + Sync> =
            Arc::new(HttpFetcher::new(settings.http_timeout)?);
        let deliverer: Arc<dyn Deliverer + Send + Sync> = Arc::new(TelegramDeliverer::new(
            client.clone(),
            telegram.token,
            telegram.chat_id,
        ));

        let enrichment = &settings.enrichment;
        let enricher: Option<Arc<dyn Enricher + Send + Sync>> =
            match (enrichment.enabled, &enrichment.api_key) {
                (true, Some(api_key)) => Some(Arc::new(
                    OpenAiEnricher::new(
                        client,
                        api_key.clone(),
                        enrichment.model.clone(),
                        enrichment.language.clone(),
                    )
                    .with_base_url(enrichment.base_url.clone()),
                )),
                (true, None) => {
                    tracing::warn!("AI summaries enabled but OPENAI_API_KEY is not set; continuing without them");
                    None
                }
                (false, _) => None,
            };

        Ok(Self {
            fetcher,
            deliverer,
            enricher,
            store,
        })
    }

    pub fn pipeline(&self, settings: &Settings) -> Pipeline {
        let pipeline = Pipeline::new(
            self.fetcher.clone(),
            self.deliverer.clone(),
            settings.keyword_rules(),
            settings.pipeline.clone(),
        );
        match &self.enricher {
            Some(enricher) => pipeline.with_enricher(enricher.clone()),
            None => pipeline,
        }
    }
}
