//! Message rendering and delivery to the chat channel.

pub mod message;
pub mod telegram;

use async_trait::async_trait;

use crate::app::Result;

pub use message::{representative_image, MessageFormatter};
pub use telegram::TelegramDeliverer;

/// Longest caption accepted with a photo.
pub const CAPTION_LIMIT: usize = 1024;

/// Longest text message accepted.
pub const MESSAGE_LIMIT: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outgoing {
    Photo { url: String, caption: String },
    Text { text: String },
}

impl Outgoing {
    /// Photo with caption when an image exists and the text fits a caption,
    /// otherwise a text message. The text is expected to be within
    /// [`MESSAGE_LIMIT`] already; see [`MessageFormatter`].
    pub fn compose(text: String, image: Option<String>) -> Self {
        match image {
            Some(url) if text.chars().count() <= CAPTION_LIMIT => Outgoing::Photo { url, caption: text },
            _ => Outgoing::Text { text },
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Outgoing::Photo { caption, .. } => caption,
            Outgoing::Text { text } => text,
        }
    }
}

#[async_trait]
pub trait Deliverer {
    async fn deliver(&self, message: &Outgoing) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_photo_when_caption_fits() {
        let out = Outgoing::compose("hello".into(), Some("https://x.com/a.jpg".into()));
        assert_eq!(
            out,
            Outgoing::Photo {
                url: "https://x.com/a.jpg".into(),
                caption: "hello".into()
            }
        );
    }

    #[test]
    fn test_compose_text_when_caption_too_long() {
        let long = "é".repeat(CAPTION_LIMIT + 1);
        let out = Outgoing::compose(long.clone(), Some("https://x.com/a.jpg".into()));
        assert_eq!(out, Outgoing::Text { text: long });
    }

    #[test]
    fn test_compose_text_without_image() {
        let out = Outgoing::compose("hello".into(), None);
        assert_eq!(out.text(), "hello");
        assert!(matches!(out, Outgoing::Text { .. }));
    }
}
