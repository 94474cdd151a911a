pub mod commands;

use std::path::PathBuf;

use clap::builder::BoolishValueParser;
use clap::{Parser, Subcommand};

use crate::enrich::openai::OPENAI_API_URL;

/// Every option can also be set through the environment variable shown in
/// `--help`; a `.env` file in the working directory is read first.
#[derive(Parser, Debug)]
#[command(name = "tidings")]
#[command(about = "Relay keyword-matched RSS/Atom entries to a Telegram chat", long_about = None)]
pub struct Cli {
    /// Telegram bot token
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    pub telegram_token: Option<String>,

    /// Telegram chat or channel id
    #[arg(long, env = "TELEGRAM_CHAT_ID")]
    pub telegram_chat_id: Option<String>,

    /// GitHub token used for the state gist
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Existing state gist; a new one is created when absent
    #[arg(long, env = "GIST_ID")]
    pub gist_id: Option<String>,

    /// Keep state in a local JSON file instead of a gist
    #[arg(long, env = "STATE_FILE")]
    pub state_file: Option<PathBuf>,

    /// Most recent entries considered per feed
    #[arg(long, env = "MAX_ITEMS_PER_FEED", default_value_t = 10)]
    pub max_items: usize,

    /// Pause between deliveries in milliseconds
    #[arg(long, env = "SEND_DELAY_MS", default_value_t = 500)]
    pub send_delay_ms: u64,

    /// Verbose diagnostic logging
    #[arg(long, env = "DEBUG", value_parser = BoolishValueParser::new())]
    pub debug: bool,

    /// Static feed list, one URL per line
    #[arg(long, env = "FEEDS_FILE", default_value = "feeds.txt")]
    pub feeds_file: PathBuf,

    /// Include keywords, one per line
    #[arg(long, env = "KEYWORDS_FILE", default_value = "keywords.txt")]
    pub keywords_file: PathBuf,

    /// Include keywords, comma or newline separated; used when the file is missing
    #[arg(long, env = "KEYWORDS")]
    pub keywords: Option<String>,

    /// Exclude keywords, one per line
    #[arg(long, env = "EXCLUDE_FILE", default_value = "exclude.txt")]
    pub exclude_file: PathBuf,

    /// Exclude keywords, comma or newline separated; used when the file is missing
    #[arg(long, env = "EXCLUDE_KEYWORDS")]
    pub exclude: Option<String>,

    /// Require keywords to match whole words
    #[arg(long, env = "MATCH_WORD_BOUNDARY", value_parser = BoolishValueParser::new())]
    pub word_boundary: bool,

    /// Generate a Google News search feed for every include keyword
    #[arg(long, env = "GOOGLE_NEWS_ENABLED", value_parser = BoolishValueParser::new())]
    pub google_news: bool,

    /// Google News interface language (hl)
    #[arg(long, env = "GOOGLE_NEWS_LANGUAGE", default_value = "en-US")]
    pub google_news_language: String,

    /// Google News region (gl)
    #[arg(long, env = "GOOGLE_NEWS_REGION", default_value = "US")]
    pub google_news_region: String,

    /// Google News edition (ceid)
    #[arg(long, env = "GOOGLE_NEWS_EDITION", default_value = "US:en")]
    pub google_news_edition: String,

    /// Google News recency window, e.g. 1d or 12h
    #[arg(long, env = "GOOGLE_NEWS_WHEN")]
    pub google_news_when: Option<String>,

    /// Extra terms appended to every Google News query
    #[arg(long, env = "GOOGLE_NEWS_EXTRA")]
    pub google_news_extra: Option<String>,

    /// Attach AI summaries to messages
    #[arg(long, env = "AI_SUMMARY_ENABLED", value_parser = BoolishValueParser::new())]
    pub enrich: bool,

    /// API key for the summary model
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Summary model
    #[arg(long, env = "AI_MODEL", default_value = "gpt-4o-mini")]
    pub ai_model: String,

    /// Language summaries are written in
    #[arg(long, env = "AI_LANGUAGE", default_value = "English")]
    pub ai_language: String,

    /// Summaries requested per run at most
    #[arg(long, env = "AI_MAX_SUMMARIES", default_value_t = 5)]
    pub ai_max_summaries: usize,

    /// Chat-completions API base URL
    #[arg(long, env = "OPENAI_BASE_URL", default_value = OPENAI_API_URL)]
    pub openai_base_url: String,

    /// Timeout for every network call, in seconds
    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value_t = 20)]
    pub http_timeout_secs: u64,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Poll all feeds once and deliver new matching entries (default)
    Run,
    /// Print the resolved feed list without fetching anything
    Feeds,
}
