use sha2::{Digest, Sha256};

use crate::domain::Entry;
use crate::normalizer::{normalize_for_match, normalize_url};

/// Number of significant title tokens that make up a title signature.
pub const TITLE_SIGNATURE_TOKENS: usize = 12;

/// English and Spanish function words ignored by title signatures.
const STOP_WORDS: &[&str] = &[
    // English
    "the", "and", "for", "are", "but", "not", "you", "all", "any", "can", "had", "her", "was",
    "one", "our", "out", "has", "have", "his", "how", "its", "who", "did", "get", "him", "may",
    "new", "now", "old", "see", "two", "way", "with", "from", "this", "that", "they", "will",
    "into", "over", "after", "about", "than", "then", "them", "what", "when", "where", "which",
    "while", "your", "says", "said",
    // Spanish
    "los", "las", "del", "una", "uno", "unos", "unas", "con", "por", "para", "que", "como",
    "mas", "pero", "sus", "entre", "sobre", "desde", "hasta", "tras", "ante", "sin", "este",
    "esta", "estos", "estas", "ese", "esa", "eso", "son", "fue", "ser", "hay", "muy", "tambien",
    "segun", "cuando", "donde", "dice",
];

/// The three independent dedup keys of an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint {
    pub content_id: String,
    /// Absent when the entry has no link or the link does not parse.
    pub normalized_link: Option<String>,
    /// Absent when the title has no significant tokens.
    pub title_signature: Option<String>,
}

impl Fingerprint {
    pub fn of(entry: &Entry) -> Self {
        Self {
            content_id: content_id(entry),
            normalized_link: entry
                .link
                .as_deref()
                .map(normalize_url)
                .filter(|link| !link.is_empty()),
            title_signature: entry.title.as_deref().and_then(title_signature),
        }
    }
}

fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Stable content hash: the entry id, else its guid, else `link|title|date`.
pub fn content_id(entry: &Entry) -> String {
    match non_blank(&entry.id).or_else(|| non_blank(&entry.guid)) {
        Some(id) => sha256_hex(id),
        None => {
            let date = entry
                .published
                .map(|dt| dt.to_rfc3339())
                .unwrap_or_default();
            sha256_hex(&format!(
                "{}|{}|{}",
                entry.link.as_deref().unwrap_or_default(),
                entry.title.as_deref().unwrap_or_default(),
                date
            ))
        }
    }
}

/// Significant tokens of a title, in their original order.
pub fn title_tokens(title: &str) -> Vec<String> {
    let cleaned: String = normalize_for_match(title)
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|token| token.chars().count() > 2)
        .filter(|token| !STOP_WORDS.contains(token))
        .take(TITLE_SIGNATURE_TOKENS)
        .map(String::from)
        .collect()
}

/// Order-independent hash of the first significant title tokens.
///
/// Reordered clauses ("Big Storm Hits City" / "City Hits Big Storm") collapse
/// to the same signature. Titles made only of short or stop words have no
/// signature.
pub fn title_signature(title: &str) -> Option<String> {
    let mut tokens = title_tokens(title);
    if tokens.is_empty() {
        return None;
    }
    tokens.sort();
    Some(sha256_hex(&tokens.join(" ")))
}
