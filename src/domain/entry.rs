use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One item read from a feed. Never mutated after parsing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: Option<String>,
    pub guid: Option<String>,
    pub link: Option<String>,
    pub title: Option<String>,
    pub summary: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    pub published: Option<DateTime<Utc>>,
    /// Representative image advertised by the feed itself (media or enclosure).
    pub image: Option<String>,
}

impl Entry {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("(Untitled)")
    }

    pub fn display_link(&self) -> &str {
        self.link.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_title_with_title() {
        let entry = Entry {
            title: Some("My Article".into()),
            ..Default::default()
        };
        assert_eq!(entry.display_title(), "My Article");
    }

    #[test]
    fn test_display_title_without_title() {
        let entry = Entry::default();
        assert_eq!(entry.display_title(), "(Untitled)");
        assert_eq!(entry.display_link(), "");
    }
}
