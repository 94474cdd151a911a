//! # Tidings
//!
//! Polls RSS/Atom feeds, keeps the entries that match a keyword list, and
//! relays each new one to a Telegram chat exactly once per fingerprint.
//!
//! ## Architecture
//!
//! ```text
//! Sources → Fetcher → Normalizer → Fingerprint/Matcher → Enricher → Delivery
//!                                         ↕
//!                                    SeenState ↔ Store
//! ```
//!
//! - [`sources`]: static feed list plus generated Google News search feeds
//! - [`fetcher`]: HTTP download with bounded timeouts
//! - [`normalizer`]: feed parsing, diacritic folding, URL canonicalization
//! - [`domain`]: entries, fingerprints and the seen-state sets
//! - [`matcher`]: include/exclude keyword rules
//! - [`enrich`]: optional AI summaries
//! - [`delivery`]: message rendering and the Telegram client
//! - [`store`]: gist or file persistence of the seen-state
//! - [`pipeline`]: the sequential run loop tying it together
//!
//! ## Quick Start
//!
//! ```bash
//! export TELEGRAM_BOT_TOKEN=... TELEGRAM_CHAT_ID=... GITHUB_TOKEN=...
//! echo "https://blog.rust-lang.org/feed.xml" > feeds.txt
//! echo "release" > keywords.txt
//!
//! # Show which feeds would be polled
//! tidings feeds
//!
//! # Poll once
//! tidings run
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires the production
/// collaborators: fetcher, deliverer, enricher and state store.
pub mod app;

/// Command-line interface using clap.
///
/// Every flag has an environment variable fallback:
/// - `run` - Poll all feeds once (default)
/// - `feeds` - Print the resolved feed list
pub mod cli;

/// Settings resolved from flags, environment and list files.
pub mod config;

/// Message rendering and delivery.
///
/// - [`Deliverer`](delivery::Deliverer): Async trait for chat delivery
/// - [`TelegramDeliverer`](delivery::TelegramDeliverer): Bot API implementation
/// - [`MessageFormatter`](delivery::MessageFormatter): HTML message layout
pub mod delivery;

/// Core domain models.
///
/// - [`Entry`](domain::Entry): One parsed feed item
/// - [`Fingerprint`](domain::Fingerprint): The three dedup keys of an entry
/// - [`SeenState`](domain::SeenState): Fingerprints delivered so far
pub mod domain;

/// Optional AI summaries.
pub mod enrich;

/// HTTP fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for feed fetching
/// - [`HttpFetcher`](fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;

/// Keyword include/exclude rules.
pub mod matcher;

/// Feed parsing and text normalization.
///
/// Converts RSS 0.9x/1.0/2.0, Atom 0.3/1.0, and JSON Feed 1.0
/// into [`Entry`](domain::Entry) values.
pub mod normalizer;

/// The sequential polling run.
pub mod pipeline;

/// Feed list assembly and Google News search feeds.
pub mod sources;

/// Seen-state persistence.
///
/// - [`StateStore`](store::StateStore): Trait for load/save
/// - [`GistStore`](store::GistStore): GitHub gist implementation
/// - [`FileStore`](store::FileStore): Local JSON file implementation
pub mod store;
