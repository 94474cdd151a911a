use chrono::Utc;
use feed_rs::model;
use feed_rs::parser;
use html_escape::decode_html_entities;

use crate::app::{Result, TidingsError};
use crate::domain::Entry;

/// Parse RSS 0.9x/1.0/2.0, Atom or JSON Feed bytes into entries, in document order.
///
/// Entries without an id or guid keep both empty; feed-rs would otherwise
/// invent one, randomly when the entry has no link.
pub fn parse_entries(body: &[u8]) -> Result<Vec<Entry>> {
    let feed = parser::Builder::new()
        .id_generator(|_, _, _| String::new())
        .build()
        .parse(body)
        .map_err(|e| TidingsError::FeedParse(e.to_string()))?;

    let is_rss = matches!(
        feed.feed_type,
        model::FeedType::RSS0 | model::FeedType::RSS1 | model::FeedType::RSS2
    );
    Ok(feed
        .entries
        .into_iter()
        .map(|entry| to_entry(entry, is_rss))
        .collect())
}

/// feed-rs reports an RSS `<guid>` as the entry id.
fn to_entry(entry: model::Entry, is_rss: bool) -> Entry {
    let image = image_of(&entry);
    let link = primary_link(&entry.links);
    let id = Some(entry.id).filter(|id| !id.trim().is_empty());
    let (id, guid) = if is_rss { (None, id) } else { (id, None) };

    Entry {
        id,
        guid,
        link,
        title: entry
            .title
            .map(|t| decode_html_entities(&t.content).trim().to_string()),
        summary: entry
            .summary
            .map(|s| decode_html_entities(&s.content).to_string())
            .or_else(|| {
                entry
                    .content
                    .and_then(|c| c.body)
                    .map(|b| decode_html_entities(&b).to_string())
            }),
        categories: entry
            .categories
            .into_iter()
            .map(|c| c.label.unwrap_or(c.term))
            .filter(|c| !c.trim().is_empty())
            .collect(),
        published: entry
            .published
            .or(entry.updated)
            .map(|dt| dt.with_timezone(&Utc)),
        image,
    }
}

/// Prefer the alternate link; Atom entries may also carry self/enclosure links.
fn primary_link(links: &[model::Link]) -> Option<String> {
    links
        .iter()
        .find(|l| l.rel.as_deref().map_or(true, |rel| rel == "alternate"))
        .or_else(|| links.first())
        .map(|l| l.href.trim().to_string())
        .filter(|href| !href.is_empty())
}

fn image_of(entry: &model::Entry) -> Option<String> {
    let from_media = entry.media.iter().find_map(|media| {
        media
            .content
            .iter()
            .find(|c| {
                c.content_type
                    .as_ref()
                    .map_or(false, |mime| mime.to_string().starts_with("image/"))
            })
            .and_then(|c| c.url.as_ref().map(|u| u.to_string()))
            .or_else(|| media.thumbnails.first().map(|t| t.image.uri.clone()))
    });

    from_media.or_else(|| {
        entry
            .links
            .iter()
            .find(|l| {
                l.rel.as_deref() == Some("enclosure")
                    && l.media_type
                        .as_deref()
                        .map_or(false, |t| t.starts_with("image/"))
            })
            .map(|l| l.href.clone())
    })
}
