//! Run configuration resolved from the command line, the environment and the
//! keyword/feed list files.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app::{Result, TidingsError};
use crate::cli::Cli;
use crate::matcher::{KeywordRules, MatchMode};
use crate::pipeline::PipelineSettings;
use crate::sources::{build_feed_list, parse_feed_list, GoogleNewsConfig};

/// Where seen fingerprints are persisted between runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateBackend {
    Gist {
        token: Option<String>,
        gist_id: Option<String>,
    },
    File {
        path: PathBuf,
    },
}

#[derive(Debug, Clone)]
pub struct TelegramSettings {
    pub token: String,
    pub chat_id: String,
}

#[derive(Debug, Clone)]
pub struct EnrichmentSettings {
    pub enabled: bool,
    pub api_key: Option<String>,
    pub model: String,
    pub language: String,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub telegram_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub state: StateBackend,
    pub feeds_file: PathBuf,
    pub keywords: Vec<String>,
    pub exclude: Vec<String>,
    pub match_mode: MatchMode,
    pub google_news: GoogleNewsConfig,
    pub pipeline: PipelineSettings,
    pub enrichment: EnrichmentSettings,
    pub http_timeout: Duration,
    pub debug: bool,
}

impl Settings {
    /// Resolve settings, reading the keyword files. Credentials are only
    /// checked by the commands that need them.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let state = match &cli.state_file {
            Some(path) => StateBackend::File { path: path.clone() },
            None => StateBackend::Gist {
                token: non_empty(&cli.github_token),
                gist_id: non_empty(&cli.gist_id),
            },
        };

        Ok(Self {
            telegram_token: non_empty(&cli.telegram_token),
            telegram_chat_id: non_empty(&cli.telegram_chat_id),
            state,
            feeds_file: cli.feeds_file.clone(),
            keywords: load_terms(&cli.keywords_file, cli.keywords.as_deref())?,
            exclude: load_terms(&cli.exclude_file, cli.exclude.as_deref())?,
            match_mode: if cli.word_boundary {
                MatchMode::WordBoundary
            } else {
                MatchMode::Substring
            },
            google_news: GoogleNewsConfig {
                enabled: cli.google_news,
                language: cli.google_news_language.clone(),
                region: cli.google_news_region.clone(),
                edition: cli.google_news_edition.clone(),
                when: non_empty(&cli.google_news_when),
                extra: non_empty(&cli.google_news_extra),
            },
            pipeline: PipelineSettings {
                max_items_per_feed: cli.max_items,
                send_delay: Duration::from_millis(cli.send_delay_ms),
                max_enrichments: cli.ai_max_summaries,
            },
            enrichment: EnrichmentSettings {
                enabled: cli.enrich,
                api_key: non_empty(&cli.openai_api_key),
                model: cli.ai_model.clone(),
                language: cli.ai_language.clone(),
                base_url: cli.openai_base_url.clone(),
            },
            http_timeout: Duration::from_secs(cli.http_timeout_secs.max(1)),
            debug: cli.debug,
        })
    }

    pub fn telegram(&self) -> Result<TelegramSettings> {
        match (&self.telegram_token, &self.telegram_chat_id) {
            (Some(token), Some(chat_id)) => Ok(TelegramSettings {
                token: token.clone(),
                chat_id: chat_id.clone(),
            }),
            _ => Err(TidingsError::Config(
                "TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID are required".into(),
            )),
        }
    }

    pub fn keyword_rules(&self) -> KeywordRules {
        KeywordRules::new(&self.keywords, &self.exclude).with_mode(self.match_mode)
    }

    /// Generated search feeds followed by the static feed list.
    pub fn feed_list(&self) -> Result<Vec<String>> {
        let static_feeds = load_feed_list(&self.feeds_file)?;
        Ok(build_feed_list(&self.keywords, &static_feeds, &self.google_news))
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// Split an inline term list on commas and newlines.
pub fn split_terms(raw: &str) -> Vec<String> {
    raw.split([',', '\n'])
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Terms from `path`, one per line, or from `fallback` when the file does not exist.
pub fn load_terms(path: &Path, fallback: Option<&str>) -> Result<Vec<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect()),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Ok(fallback.map(split_terms).unwrap_or_default())
        }
        Err(e) => Err(e.into()),
    }
}

/// Static feeds from the list file; a missing file is an empty list.
pub fn load_feed_list(path: &Path) -> Result<Vec<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(parse_feed_list(&content)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "Feed list not found");
            Ok(Vec::new())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;
    use std::io::Write;

    use clap::Parser;
    use tempfile::{tempdir, NamedTempFile};

    use super::*;

    #[test]
    fn test_split_terms() {
        assert_eq!(
            split_terms("storm, flood\nheat wave,,  "),
            vec!["storm", "flood", "heat wave"]
        );
    }

    #[test]
    fn test_load_terms_prefers_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Lluvia\n\n  Cambio Climático  \n").unwrap();

        let terms = load_terms(file.path(), Some("ignored")).unwrap();
        assert_eq!(terms, vec!["Lluvia", "Cambio Climático"]);
    }

    #[test]
    fn test_load_terms_falls_back_to_env_value() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("keywords.txt");

        assert_eq!(load_terms(&missing, Some("a, b")).unwrap(), vec!["a", "b"]);
        assert!(load_terms(&missing, None).unwrap().is_empty());
    }

    #[test]
    fn test_load_feed_list_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        assert!(load_feed_list(&dir.path().join("feeds.txt")).unwrap().is_empty());
    }

    #[test]
    fn test_settings_from_cli() {
        let dir = tempdir().unwrap();
        let feeds = dir.path().join("feeds.txt");
        fs::write(&feeds, "https://example.com/a.xml # main\n").unwrap();
        let missing = dir.path().join("missing.txt");

        let args: Vec<OsString> = vec![
            "tidings".into(),
            "--feeds-file".into(),
            feeds.into_os_string(),
            "--keywords-file".into(),
            missing.clone().into_os_string(),
            "--exclude-file".into(),
            missing.into_os_string(),
            "--keywords".into(),
            "storm".into(),
            "--exclude".into(),
            "sport".into(),
            "--google-news".into(),
            "--state-file".into(),
            dir.path().join("state.json").into_os_string(),
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        let settings = Settings::from_cli(&cli).unwrap();
        assert_eq!(settings.keywords, vec!["storm"]);
        assert_eq!(settings.exclude, vec!["sport"]);
        assert!(matches!(settings.state, StateBackend::File { .. }));

        let feeds = settings.feed_list().unwrap();
        assert_eq!(feeds.len(), 2);
        assert!(feeds[0].starts_with("https://news.google.com/rss/search?q=storm"));
        assert_eq!(feeds[1], "https://example.com/a.xml");
    }

    #[test]
    fn test_telegram_settings_required() {
        let cli = Cli::try_parse_from(["tidings", "--telegram-token", "t"]).unwrap();
        let mut settings = Settings::from_cli(&cli).unwrap();
        settings.telegram_chat_id = None;
        assert!(matches!(settings.telegram(), Err(TidingsError::Config(_))));

        settings.telegram_chat_id = Some("42".into());
        assert_eq!(settings.telegram().unwrap().chat_id, "42");
    }
}
