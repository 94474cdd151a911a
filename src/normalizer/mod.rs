//! Feed parsing and the text/URL transforms used for matching and dedup.
//!
//! - [`feed`]: feed bytes into [`Entry`](crate::domain::Entry) values
//! - [`text`]: diacritic folding, URL canonicalization, hashtags

pub mod feed;
pub mod text;

pub use feed::parse_entries;
pub use text::{hashtag, host_from_url, normalize_for_match, normalize_url, strip_html};
