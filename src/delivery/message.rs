use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::delivery::MESSAGE_LIMIT;
use crate::domain::Entry;
use crate::normalizer::text::truncate_chars;
use crate::normalizer::{hashtag, host_from_url, strip_html};

const SECTION_SEPARATOR: &str = "\n\n";

const MAX_LABEL_CHARS: usize = 64;

/// Renders entries as Telegram HTML messages.
///
/// Every section is bounded before assembly, so the finished markup always
/// fits [`MESSAGE_LIMIT`] and never needs cutting.
#[derive(Debug, Clone)]
pub struct MessageFormatter {
    pub max_title_chars: usize,
    pub max_body_chars: usize,
    /// Longer links, measured after attribute escaping, are left out.
    pub max_link_chars: usize,
}

impl Default for MessageFormatter {
    fn default() -> Self {
        Self {
            max_title_chars: 300,
            max_body_chars: 700,
            max_link_chars: 1024,
        }
    }
}

impl MessageFormatter {
    /// Title, then the enrichment text (or the feed snippet when there is
    /// none), the source link and one hashtag per matched keyword.
    ///
    /// When space runs out the body is shortened first, then trailing
    /// hashtags are dropped.
    pub fn render(&self, entry: &Entry, matched: &[String], enrichment: Option<&str>) -> String {
        let title = truncate_chars(entry.display_title(), self.max_title_chars);
        let head = format!("<b>{}</b>", encode_text(&title));
        let link = entry
            .link
            .as_deref()
            .filter(|l| !l.is_empty())
            .and_then(|l| self.link_section(l));

        let mut used = char_len(&head) + link.as_deref().map_or(0, separated_len);

        let body = match enrichment.map(str::trim).filter(|e| !e.is_empty()) {
            Some(summary) => {
                let budget = MESSAGE_LIMIT.saturating_sub(used + separated_len("<i></i>"));
                fit_encoded(summary, self.max_body_chars, budget).map(|s| format!("<i>{}</i>", s))
            }
            None => {
                let snippet = entry.summary.as_deref().map(strip_html).unwrap_or_default();
                if snippet.is_empty() || snippet == title {
                    None
                } else {
                    let budget = MESSAGE_LIMIT.saturating_sub(used + SECTION_SEPARATOR.len());
                    fit_encoded(&snippet, self.max_body_chars, budget)
                }
            }
        };
        used += body.as_deref().map_or(0, separated_len);

        let mut tags = String::new();
        for tag in matched.iter().filter_map(|term| hashtag(term)) {
            if tags.split(' ').any(|t| t == tag) {
                continue;
            }
            let extra = if tags.is_empty() {
                separated_len(&tag)
            } else {
                1 + char_len(&tag)
            };
            if used + extra > MESSAGE_LIMIT {
                break;
            }
            used += extra;
            if !tags.is_empty() {
                tags.push(' ');
            }
            tags.push_str(&tag);
        }

        let mut sections = vec![head];
        sections.extend(body);
        sections.extend(link);
        if !tags.is_empty() {
            sections.push(tags);
        }
        sections.join(SECTION_SEPARATOR)
    }

    fn link_section(&self, link: &str) -> Option<String> {
        let href = encode_double_quoted_attribute(link);
        if char_len(&href) > self.max_link_chars {
            tracing::debug!(link = %truncate_chars(link, 80), "Link too long, leaving it out");
            return None;
        }
        let host = host_from_url(link);
        let label = if host.is_empty() {
            "Read more".to_string()
        } else {
            truncate_chars(&host, MAX_LABEL_CHARS)
        };
        Some(format!("<a href=\"{}\">{}</a>", href, encode_text(&label)))
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Length of a section including the separator before it.
fn separated_len(section: &str) -> usize {
    SECTION_SEPARATOR.len() + char_len(section)
}

/// Escaped `text`, cut to at most `max_chars` before escaping and to at most
/// `budget` characters after.
fn fit_encoded(text: &str, max_chars: usize, budget: usize) -> Option<String> {
    let mut max_chars = max_chars.min(char_len(text));
    while max_chars > 0 {
        let encoded = encode_text(&truncate_chars(text, max_chars)).into_owned();
        let len = char_len(&encoded);
        if len <= budget {
            return Some(encoded);
        }
        // Escaping may expand text several times over; shrink proportionally.
        max_chars = (max_chars * budget / len).min(max_chars - 1);
    }
    None
}

/// Image to attach: the feed's own media, else the first `<img>` of the snippet.
pub fn representative_image(entry: &Entry) -> Option<String> {
    entry
        .image
        .clone()
        .filter(|url| is_http_url(url))
        .or_else(|| entry.summary.as_deref().and_then(first_img_src))
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

fn first_img_src(html: &str) -> Option<String> {
    let lower = html.to_ascii_lowercase();
    let mut offset = 0;
    while let Some(pos) = lower[offset..].find("<img") {
        let tag_start = offset + pos;
        let tag_end = lower[tag_start..]
            .find('>')
            .map_or(lower.len(), |end| tag_start + end);
        let tag = &html[tag_start..tag_end];
        let tag_lower = &lower[tag_start..tag_end];

        if let Some(attr) = tag_lower.find("src=") {
            let value = &tag[attr + 4..];
            let src = match value.chars().next() {
                Some(quote @ ('"' | '\'')) => value[1..].split(quote).next(),
                _ => value.split(|c: char| c.is_whitespace() || c == '>').next(),
            };
            if let Some(src) = src.map(str::trim).filter(|s| is_http_url(s)) {
                return Some(html_escape::decode_html_entities(src).into_owned());
            }
        }
        offset = tag_end;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> Entry {
        Entry {
            title: Some("Storm <hits> city".into()),
            summary: Some("<p>Heavy rain &amp; wind.</p>".into()),
            link: Some("https://www.example.com/a?x=1&y=2".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_render_with_snippet_and_hashtags() {
        let text = MessageFormatter::default().render(
            &entry(),
            &["Tormenta Tropical".into(), "storm".into()],
            None,
        );
        assert_eq!(
            text,
            "<b>Storm &lt;hits&gt; city</b>\n\n\
             Heavy rain &amp; wind.\n\n\
             <a href=\"https://www.example.com/a?x=1&amp;y=2\">example.com</a>\n\n\
             #tormentatropical #storm"
        );
    }

    #[test]
    fn test_render_prefers_enrichment_over_snippet() {
        let text = MessageFormatter::default().render(&entry(), &[], Some("A short summary."));
        assert!(text.contains("<i>A short summary.</i>"));
        assert!(!text.contains("Heavy rain"));
        assert!(!text.contains('#'));
    }

    #[test]
    fn test_render_truncates_long_snippets() {
        let mut e = entry();
        e.summary = Some("word ".repeat(500));
        let formatter = MessageFormatter {
            max_body_chars: 50,
            ..Default::default()
        };
        let text = formatter.render(&e, &[], None);
        assert!(text.contains('…'));
        assert!(text.chars().count() < 200);
    }

    #[test]
    fn test_render_leaves_out_oversized_link() {
        let mut e = entry();
        e.link = Some(format!("https://example.com/{}", "a".repeat(3000)));
        let text = MessageFormatter::default().render(&e, &["storm".into()], None);

        assert!(!text.contains("<a href"));
        assert!(text.starts_with("<b>Storm &lt;hits&gt; city</b>"));
        assert!(text.ends_with("#storm"));
    }

    #[test]
    fn test_render_shortens_escaped_body_to_fit() {
        let e = Entry {
            title: Some("<".repeat(1000)),
            summary: Some("&".repeat(1000)),
            ..Default::default()
        };

        let text = MessageFormatter::default().render(&e, &[], None);

        assert!(text.chars().count() <= MESSAGE_LIMIT);
        assert!(text.ends_with("&amp;…"));
    }

    #[test]
    fn test_render_drops_hashtags_that_do_not_fit() {
        let terms: Vec<String> = (0..1000).map(|i| format!("term{}", i)).collect();

        let text = MessageFormatter::default().render(&entry(), &terms, None);

        assert!(text.chars().count() <= MESSAGE_LIMIT);
        assert!(text.contains("</a>\n\n#term0 #term1 "));
        assert!(!text.contains("#term999"));
    }

    #[test]
    fn test_render_without_link_or_title() {
        let e = Entry::default();
        assert_eq!(MessageFormatter::default().render(&e, &[], None), "<b>(Untitled)</b>");
    }

    #[test]
    fn test_representative_image_prefers_feed_media() {
        let mut e = entry();
        e.image = Some("https://cdn.example.com/a.jpg".into());
        e.summary = Some(r#"<img src="https://cdn.example.com/b.jpg">"#.into());
        assert_eq!(representative_image(&e).as_deref(), Some("https://cdn.example.com/a.jpg"));
    }

    #[test]
    fn test_representative_image_from_snippet() {
        let mut e = entry();
        e.summary = Some(
            r#"<p>Intro</p><IMG alt="x" src='data:image/png;base64,AAA'><img class="lead" src="https://cdn.example.com/b.jpg?w=1&amp;h=2" />"#
                .into(),
        );
        assert_eq!(
            representative_image(&e).as_deref(),
            Some("https://cdn.example.com/b.jpg?w=1&h=2")
        );
    }

    #[test]
    fn test_representative_image_none() {
        assert_eq!(representative_image(&entry()), None);
    }
}
