use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::Fingerprint;

/// Fingerprints of everything delivered so far.
///
/// Sets only ever grow. `BTreeSet` keeps the serialized arrays sorted, so the
/// persisted document diffs cleanly between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeenState {
    #[serde(rename = "seen", default)]
    pub ids: BTreeSet<String>,
    #[serde(rename = "seen_links", default)]
    pub links: BTreeSet<String>,
    #[serde(rename = "seen_titles", default)]
    pub titles: BTreeSet<String>,
}

/// Which dedup key matched a previously seen entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateSignal {
    ContentId,
    Link,
    Title,
}

impl fmt::Display for DuplicateSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicateSignal::ContentId => write!(f, "id"),
            DuplicateSignal::Link => write!(f, "link"),
            DuplicateSignal::Title => write!(f, "title"),
        }
    }
}

impl SeenState {
    pub fn new() -> Self {
        Self::default()
    }

    /// First signal that marks `fp` as already delivered, if any.
    ///
    /// Any single hit suppresses delivery, including a matching title on a
    /// different link (syndicated copies of the same story).
    pub fn duplicate_of(&self, fp: &Fingerprint) -> Option<DuplicateSignal> {
        if self.ids.contains(&fp.content_id) {
            return Some(DuplicateSignal::ContentId);
        }
        if fp
            .normalized_link
            .as_ref()
            .is_some_and(|link| self.links.contains(link))
        {
            return Some(DuplicateSignal::Link);
        }
        if fp
            .title_signature
            .as_ref()
            .is_some_and(|title| self.titles.contains(title))
        {
            return Some(DuplicateSignal::Title);
        }
        None
    }

    /// Record every present key of `fp`.
    pub fn record(&mut self, fp: &Fingerprint) {
        self.ids.insert(fp.content_id.clone());
        if let Some(link) = &fp.normalized_link {
            self.links.insert(link.clone());
        }
        if let Some(title) = &fp.title_signature {
            self.titles.insert(title.clone());
        }
    }

    /// Union with another state, e.g. one written by a concurrent run.
    pub fn merge(&mut self, other: SeenState) {
        self.ids.extend(other.ids);
        self.links.extend(other.links);
        self.titles.extend(other.titles);
    }

    pub fn len(&self) -> usize {
        self.ids.len() + self.links.len() + self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
