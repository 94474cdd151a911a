//! One polling pass over all feeds.
//!
//! Feeds and entries are processed strictly one at a time, with a fixed pause
//! after every delivery. An entry is recorded as seen only after the chat
//! channel accepted it, so a crash between sending and persisting the state
//! re-sends that entry on the next run (at-least-once), while a failed send
//! is simply retried next run.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::delivery::{representative_image, Deliverer, MessageFormatter, Outgoing};
use crate::domain::{Entry, Fingerprint, SeenState};
use crate::enrich::Enricher;
use crate::fetcher::Fetcher;
use crate::matcher::{KeywordRules, MatchResult};
use crate::normalizer::parse_entries;

/// Tunables for a run.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Most recent entries considered per feed (default: 10)
    pub max_items_per_feed: usize,

    /// Pause after each successful delivery (default: 500ms)
    pub send_delay: Duration,

    /// Enrichment calls allowed per run (default: 5)
    pub max_enrichments: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_items_per_feed: 10,
            send_delay: Duration::from_millis(500),
            max_enrichments: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub sent: usize,
    /// Entries dropped by an exclude term.
    pub excluded: usize,
    /// Entries that matched no include term.
    pub filtered: usize,
    /// Already-delivered entries skipped. Logged at debug level only; the
    /// summary line leaves it out.
    pub duplicates: usize,
    /// Deliveries the channel rejected; retried next run.
    pub failed: usize,
    pub feed_errors: usize,
    pub enriched: usize,
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sent={} excluded={} filtered={} failed={} feed_errors={} enriched={}",
            self.sent,
            self.excluded,
            self.filtered,
            self.failed,
            self.feed_errors,
            self.enriched
        )
    }
}

pub struct Pipeline {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    deliverer: Arc<dyn Deliverer + Send + Sync>,
    enricher: Option<Arc<dyn Enricher + Send + Sync>>,
    rules: KeywordRules,
    formatter: MessageFormatter,
    settings: PipelineSettings,
    enrichments_used: usize,
}

impl Pipeline {
    pub fn new(
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        deliverer: Arc<dyn Deliverer + Send + Sync>,
        rules: KeywordRules,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            fetcher,
            deliverer,
            enricher: None,
            rules,
            formatter: MessageFormatter::default(),
            settings,
            enrichments_used: 0,
        }
    }

    pub fn with_enricher(mut self, enricher: Arc<dyn Enricher + Send + Sync>) -> Self {
        self.enricher = Some(enricher);
        self
    }

    /// Process every feed in order, recording delivered entries in `seen`.
    ///
    /// Feed and delivery failures are logged and counted; they never abort
    /// the run. Persisting `seen` afterwards is the caller's job.
    pub async fn run(&mut self, feeds: &[String], seen: &mut SeenState) -> RunStats {
        let mut stats = RunStats::default();
        self.enrichments_used = 0;

        for feed in feeds {
            let entries = match self.load_feed(feed).await {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(feed = %feed, error = %e, "Skipping feed");
                    stats.feed_errors += 1;
                    continue;
                }
            };

            tracing::debug!(feed = %feed, entries = entries.len(), "Processing feed");

            for entry in entries.iter().take(self.settings.max_items_per_feed).rev() {
                self.process_entry(entry, seen, &mut stats).await;
            }
        }

        tracing::debug!(duplicates = stats.duplicates, "Skipped already-delivered entries");

        stats
    }

    async fn load_feed(&self, url: &str) -> crate::app::Result<Vec<Entry>> {
        let body = self.fetcher.fetch(url).await?;
        parse_entries(&body)
    }

    async fn process_entry(&mut self, entry: &Entry, seen: &mut SeenState, stats: &mut RunStats) {
        let fingerprint = Fingerprint::of(entry);

        if let Some(signal) = seen.duplicate_of(&fingerprint) {
            tracing::debug!(link = entry.display_link(), signal = %signal, "Already delivered");
            stats.duplicates += 1;
            return;
        }

        let terms = match self.rules.evaluate(entry) {
            MatchResult::Excluded { term } => {
                tracing::debug!(link = entry.display_link(), term = %term, "Excluded");
                stats.excluded += 1;
                return;
            }
            MatchResult::Missed => {
                tracing::debug!(link = entry.display_link(), "No keyword match");
                stats.filtered += 1;
                return;
            }
            MatchResult::Matched { terms } => terms,
        };

        let enrichment = self.enrich(entry).await;
        if enrichment.is_some() {
            stats.enriched += 1;
        }

        let text = self.formatter.render(entry, &terms, enrichment.as_deref());
        let message = Outgoing::compose(text, representative_image(entry));

        match self.deliverer.deliver(&message).await {
            Ok(()) => {
                seen.record(&fingerprint);
                stats.sent += 1;
                tracing::info!(title = entry.display_title(), link = entry.display_link(), "Delivered");
                if !self.settings.send_delay.is_zero() {
                    tokio::time::sleep(self.settings.send_delay).await;
                }
            }
            Err(e) => {
                stats.failed += 1;
                tracing::warn!(link = entry.display_link(), error = %e, "Delivery failed");
            }
        }
    }

    /// Summary text while the per-run budget lasts; failures yield `None`.
    async fn enrich(&mut self, entry: &Entry) -> Option<String> {
        let enricher = self.enricher.as_ref()?;
        if self.enrichments_used >= self.settings.max_enrichments {
            return None;
        }
        self.enrichments_used += 1;

        match enricher.summarize(entry).await {
            Ok(summary) => Some(summary),
            Err(e) => {
                tracing::warn!(link = entry.display_link(), error = %e, "Enrichment failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_line_leaves_out_duplicates() {
        let stats = RunStats {
            sent: 2,
            excluded: 1,
            duplicates: 7,
            ..Default::default()
        };
        assert_eq!(
            stats.to_string(),
            "sent=2 excluded=1 filtered=0 failed=0 feed_errors=0 enriched=0"
        );
    }
}
