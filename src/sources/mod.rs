//! Feed list assembly: static feeds from a list file plus Google News search
//! feeds generated from the include keywords.

use serde::{Deserialize, Serialize};
use url::Url;

pub const GOOGLE_NEWS_SEARCH_URL: &str = "https://news.google.com/rss/search";

/// Options for generated Google News search feeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleNewsConfig {
    /// Generate one search feed per include keyword (default: false)
    pub enabled: bool,

    /// Interface language, the `hl` parameter (default: "en-US")
    pub language: String,

    /// Region, the `gl` parameter (default: "US")
    pub region: String,

    /// Edition, the `ceid` parameter (default: "US:en")
    pub edition: String,

    /// Recency window such as "1d" or "7d", appended as `when:<window>`
    pub when: Option<String>,

    /// Extra query terms appended verbatim, e.g. "-site:example.com"
    pub extra: Option<String>,
}

impl Default for GoogleNewsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            language: "en-US".to_string(),
            region: "US".to_string(),
            edition: "US:en".to_string(),
            when: None,
            extra: None,
        }
    }
}

impl GoogleNewsConfig {
    /// Search query for a keyword: quoted when it has spaces, plus the
    /// recency window and extra terms.
    pub fn query(&self, keyword: &str) -> String {
        let keyword = keyword.trim();
        let mut query = if keyword.contains(char::is_whitespace) {
            format!("\"{}\"", keyword)
        } else {
            keyword.to_string()
        };
        if let Some(when) = self.when.as_deref().map(str::trim).filter(|w| !w.is_empty()) {
            query.push_str(" when:");
            query.push_str(when);
        }
        if let Some(extra) = self.extra.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
            query.push(' ');
            query.push_str(extra);
        }
        query
    }

    pub fn search_feed_url(&self, keyword: &str) -> String {
        format!(
            "{}?q={}&hl={}&gl={}&ceid={}",
            GOOGLE_NEWS_SEARCH_URL,
            urlencoding::encode(&self.query(keyword)),
            urlencoding::encode(&self.language),
            urlencoding::encode(&self.region),
            urlencoding::encode(&self.edition),
        )
    }
}

/// Whether `url` is a Google News search feed.
pub fn is_search_feed(url: &str) -> bool {
    Url::parse(url).is_ok_and(|u| {
        u.host_str() == Some("news.google.com") && u.path().starts_with("/rss/search")
    })
}

/// Generated search feeds first, then static feeds.
///
/// With generation enabled, static search feeds are dropped since the keyword
/// list already produces them. Exact duplicates keep their first position.
pub fn build_feed_list<S: AsRef<str>>(
    keywords: &[S],
    static_feeds: &[String],
    config: &GoogleNewsConfig,
) -> Vec<String> {
    let mut feeds: Vec<String> = Vec::new();

    if config.enabled {
        feeds.extend(
            keywords
                .iter()
                .map(|k| k.as_ref().trim())
                .filter(|k| !k.is_empty())
                .map(|k| config.search_feed_url(k)),
        );
    }

    feeds.extend(
        static_feeds
            .iter()
            .filter(|url| !(config.enabled && is_search_feed(url)))
            .cloned(),
    );

    let mut unique: Vec<String> = Vec::with_capacity(feeds.len());
    for feed in feeds {
        if !unique.contains(&feed) {
            unique.push(feed);
        }
    }
    unique
}

/// Parse a feed list file: one URL per line, `#` comments and blank lines ignored.
///
/// A `#` only starts a trailing comment after whitespace, so URL fragments survive.
pub fn parse_feed_list(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| {
            let line = line.trim();
            match line.find(" #").or_else(|| line.find("\t#")) {
                Some(pos) => line[..pos].trim(),
                None => line,
            }
        })
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled() -> GoogleNewsConfig {
        GoogleNewsConfig {
            enabled: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_query_quotes_phrases_and_appends_options() {
        let config = GoogleNewsConfig {
            when: Some("7d".into()),
            extra: Some("-site:example.com".into()),
            ..enabled()
        };
        assert_eq!(config.query("storm"), "storm when:7d -site:example.com");
        assert_eq!(config.query(" climate change "), "\"climate change\" when:7d -site:example.com");
    }

    #[test]
    fn test_search_feed_url() {
        let config = GoogleNewsConfig {
            language: "es-419".into(),
            region: "PE".into(),
            edition: "PE:es-419".into(),
            when: Some("1d".into()),
            ..enabled()
        };
        assert_eq!(
            config.search_feed_url("lluvias"),
            "https://news.google.com/rss/search?q=lluvias%20when%3A1d&hl=es-419&gl=PE&ceid=PE%3Aes-419"
        );
        assert!(is_search_feed(&config.search_feed_url("lluvias")));
    }

    #[test]
    fn test_build_feed_list_prepends_generated_and_drops_static_search_feeds() {
        let static_feeds = vec![
            "https://example.com/feed.xml".to_string(),
            "https://news.google.com/rss/search?q=old&hl=en-US".to_string(),
            "https://example.com/feed.xml".to_string(),
        ];
        let feeds = build_feed_list(&["storm", "  ", "flood"], &static_feeds, &enabled());

        assert_eq!(feeds.len(), 3);
        assert!(feeds[0].contains("q=storm"));
        assert!(feeds[1].contains("q=flood"));
        assert_eq!(feeds[2], "https://example.com/feed.xml");
    }

    #[test]
    fn test_build_feed_list_disabled_keeps_static_list() {
        let static_feeds = vec![
            "https://news.google.com/rss/search?q=old".to_string(),
            "https://example.com/feed.xml".to_string(),
        ];
        let feeds = build_feed_list(&["storm"], &static_feeds, &GoogleNewsConfig::default());
        assert_eq!(feeds, static_feeds);
    }

    #[test]
    fn test_is_search_feed() {
        assert!(is_search_feed("https://news.google.com/rss/search?q=x"));
        assert!(!is_search_feed("https://news.google.com/rss/topics/abc"));
        assert!(!is_search_feed("https://example.com/rss/search"));
        assert!(!is_search_feed("not a url"));
    }

    #[test]
    fn test_parse_feed_list() {
        let text = "\
# World news
https://example.com/world.xml
   
https://example.com/tech.xml   # tech desk
https://example.com/page#section
\t# indented comment
";
        assert_eq!(
            parse_feed_list(text),
            vec![
                "https://example.com/world.xml",
                "https://example.com/tech.xml",
                "https://example.com/page#section",
            ]
        );
    }
}
