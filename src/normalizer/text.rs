//! Pure text and URL transforms shared by fingerprinting and matching.
//!
//! Nothing in here fails: malformed input produces an empty string, which
//! callers treat as "no signal".

use html_escape::decode_html_entities;
use unicode_normalization::UnicodeNormalization;
use url::Url;

/// Query parameters that only carry campaign tracking and never identify content.
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "utm_id",
    "gclid",
    "fbclid",
    "mc_cid",
    "mc_eid",
    "ref",
];

fn is_combining_diacritic(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

/// Fold text for matching: NFD, drop combining diacritics, lowercase.
///
/// `"Árbol Ñandú"` becomes `"arbol nandu"`. Only Unicode tables are involved,
/// so the result does not depend on the host locale.
pub fn normalize_for_match(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_diacritic(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Canonicalize a URL for link-based deduplication.
///
/// Drops the fragment, known tracking parameters and trailing path slashes,
/// and lowercases the host. Remaining query parameters keep their order and
/// raw encoding. Returns an empty string when the URL does not parse or has
/// no host.
pub fn normalize_url(raw: &str) -> String {
    let Ok(url) = Url::parse(raw.trim()) else {
        return String::new();
    };
    let Some(host) = url.host_str() else {
        return String::new();
    };

    let mut out = format!("{}://{}", url.scheme(), host.to_lowercase());
    if let Some(port) = url.port() {
        out.push(':');
        out.push_str(&port.to_string());
    }
    out.push_str(url.path().trim_end_matches('/'));

    if let Some(query) = url.query() {
        let kept: Vec<&str> = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .filter(|pair| {
                let name = pair.split('=').next().unwrap_or_default();
                !TRACKING_PARAMS
                    .iter()
                    .any(|tracked| tracked.eq_ignore_ascii_case(name))
            })
            .collect();
        if !kept.is_empty() {
            out.push('?');
            out.push_str(&kept.join("&"));
        }
    }

    out
}

/// Hostname without a leading `www.`; empty when the URL does not parse.
pub fn host_from_url(raw: &str) -> String {
    Url::parse(raw.trim())
        .ok()
        .and_then(|url| url.host_str().map(|h| h.to_lowercase()))
        .map(|host| host.strip_prefix("www.").unwrap_or(&host).to_string())
        .unwrap_or_default()
}

/// Derive a hashtag from a keyword: `"Cambio Climático"` → `#cambioclimatico`.
pub fn hashtag(term: &str) -> Option<String> {
    let body: String = normalize_for_match(term)
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect();
    if body.is_empty() {
        None
    } else {
        Some(format!("#{}", body))
    }
}

/// Reduce an HTML fragment to plain text with collapsed whitespace.
pub fn strip_html(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => {
                in_tag = true;
                text.push(' ');
            }
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    decode_html_entities(&text)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Truncate to at most `max` characters, ending with an ellipsis when cut.
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_for_match_strips_diacritics() {
        assert_eq!(normalize_for_match("Árbol Ñandú São"), "arbol nandu sao");
        assert_eq!(normalize_for_match("CAFÉ"), "cafe");
    }

    #[test]
    fn test_normalize_for_match_keeps_non_latin() {
        assert_eq!(normalize_for_match("Москва"), "москва");
    }

    #[test]
    fn test_normalize_url_drops_tracking_and_fragment() {
        assert_eq!(
            normalize_url("https://Example.COM/news/story/?utm_source=x&id=7&fbclid=abc#top"),
            "https://example.com/news/story?id=7"
        );
    }

    #[test]
    fn test_normalize_url_tracking_names_case_insensitive() {
        assert_eq!(
            normalize_url("https://example.com/a?UTM_Campaign=spring&Ref=home"),
            "https://example.com/a"
        );
    }

    #[test]
    fn test_normalize_url_keeps_param_order() {
        assert_eq!(
            normalize_url("https://example.com/a?z=1&utm_term=q&a=2"),
            "https://example.com/a?z=1&a=2"
        );
    }

    #[test]
    fn test_normalize_url_equivalent_forms() {
        let variants = [
            "http://x.com/a?utm_source=t",
            "http://x.com/a",
            "http://X.com/a/",
            "http://x.com/a#comments",
            "http://x.com/a//?gclid=1#frag",
        ];
        let expected = normalize_url(variants[0]);
        assert_eq!(expected, "http://x.com/a");
        for variant in variants {
            assert_eq!(normalize_url(variant), expected, "{variant}");
        }
    }

    #[test]
    fn test_normalize_url_idempotent() {
        let urls = [
            "https://example.com/",
            "https://example.com:8443/path/?q=hello%20world&ref=x",
            "http://news.site/a/b/c///?b=2&a=1#x",
            "https://example.com/search?q=a+b&empty=",
        ];
        for url in urls {
            let once = normalize_url(url);
            assert!(!once.is_empty());
            assert_eq!(normalize_url(&once), once, "{url}");
        }
    }

    #[test]
    fn test_normalize_url_root_path() {
        assert_eq!(normalize_url("https://example.com/"), "https://example.com");
    }

    #[test]
    fn test_normalize_url_fails_closed() {
        assert_eq!(normalize_url("not a url"), "");
        assert_eq!(normalize_url(""), "");
        assert_eq!(normalize_url("mailto:someone@example.com"), "");
    }

    #[test]
    fn test_host_from_url() {
        assert_eq!(host_from_url("https://www.Example.com/a"), "example.com");
        assert_eq!(host_from_url("https://news.example.com"), "news.example.com");
        assert_eq!(host_from_url("garbage"), "");
    }

    #[test]
    fn test_hashtag() {
        assert_eq!(hashtag("Cambio Climático").as_deref(), Some("#cambioclimatico"));
        assert_eq!(hashtag("COVID-19").as_deref(), Some("#covid19"));
        assert_eq!(hashtag(" -- "), None);
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(
            strip_html("<p>Hello&nbsp;<b>world</b></p>\n<br/>again &amp; again"),
            "Hello world again & again"
        );
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("abcdefghij", 5), "abcd…");
        assert_eq!(truncate_chars("ñañañaña", 4).chars().count(), 4);
    }
}
