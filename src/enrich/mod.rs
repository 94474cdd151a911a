//! Optional AI summaries attached to delivered messages.

pub mod openai;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::Entry;

pub use openai::OpenAiEnricher;

#[async_trait]
pub trait Enricher {
    /// A short summary of `entry` to show in place of the feed snippet.
    async fn summarize(&self, entry: &Entry) -> Result<String>;
}
