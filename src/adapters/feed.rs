use feed_rs::model::Entry;
use feed_rs::parser;
use html_escape::decode_html_entities;

use crate::app::{DriftError, Result};
use crate::config::SourceDefinition;
use crate::domain::ExtractedItem;

/// RSS/Atom adapter. Item identity is the entry GUID/id, falling back to
/// the link. Entries without a title are skipped.
pub fn extract(body: &str, source: &SourceDefinition) -> Result<Vec<ExtractedItem>> {
    let feed = parser::parse(body.as_bytes())
        .map_err(|e| DriftError::Parse(format!("[{}] feed parse failed: {}", source.id, e)))?;

    let items = feed
        .entries
        .into_iter()
        .filter_map(entry_to_item)
        .take(source.max_items)
        .collect();

    Ok(items)
}

pub(crate) fn entry_to_item(entry: Entry) -> Option<ExtractedItem> {
    let title = entry
        .title
        .map(|t| decode_html_entities(&t.content).trim().to_string())
        .unwrap_or_default();
    if title.is_empty() {
        return None;
    }

    let link = preferred_link(&entry.links);
    let id = if entry.id.is_empty() {
        link.clone()?
    } else {
        entry.id
    };

    let mut item = ExtractedItem::new(id, title);
    item.date = entry
        .published
        .or(entry.updated)
        .map(|dt| dt.to_rfc3339());
    item.link = link;
    Some(item)
}

/// Atom entries may carry several links; prefer rel="alternate".
pub(crate) fn preferred_link(links: &[feed_rs::model::Link]) -> Option<String> {
    links
        .iter()
        .find(|l| l.rel.as_deref() == Some("alternate"))
        .or_else(|| links.first())
        .map(|l| l.href.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdapterKind;

    fn feed_source() -> SourceDefinition {
        SourceDefinition {
            id: "test_feed".into(),
            org: "Test".into(),
            name: "Test Feed".into(),
            adapter: AdapterKind::Feed,
            url: "https://example.com/feed.xml".into(),
            selectors: None,
            max_items: 10,
            ignore_patterns: Vec::new(),
            headers: Default::default(),
        }
    }

    const RSS_SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Test Feed</title>
    <item>
      <title>Release 43 &amp; notes</title>
      <link>https://example.com/r43</link>
      <guid>r43</guid>
      <pubDate>Tue, 02 Jan 2024 00:00:00 GMT</pubDate>
    </item>
    <item>
      <title>Release 42</title>
      <link>https://example.com/r42</link>
      <guid>r42</guid>
    </item>
  </channel>
</rss>"#;

    const ATOM_SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom Test Feed</title>
  <entry>
    <title>Atom Entry 1</title>
    <link rel="alternate" href="https://example.com/atom1"/>
    <link rel="enclosure" href="https://example.com/atom1.mp3"/>
    <id>atom-entry-1</id>
    <updated>2024-01-01T00:00:00Z</updated>
  </entry>
</feed>"#;

    #[test]
    fn test_extract_rss_preserves_order() {
        let items = extract(RSS_SAMPLE, &feed_source()).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "r43");
        assert_eq!(items[0].title, "Release 43 & notes");
        assert_eq!(items[0].link.as_deref(), Some("https://example.com/r43"));
        assert!(items[0].date.is_some());
        assert_eq!(items[1].id, "r42");
    }

    #[test]
    fn test_extract_atom_prefers_alternate_link() {
        let items = extract(ATOM_SAMPLE, &feed_source()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "atom-entry-1");
        assert_eq!(items[0].link.as_deref(), Some("https://example.com/atom1"));
    }

    #[test]
    fn test_extract_respects_max_items() {
        let mut source = feed_source();
        source.max_items = 1;
        let items = extract(RSS_SAMPLE, &source).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "r43");
    }

    #[test]
    fn test_malformed_body_is_parse_error() {
        let err = extract("this is not a feed", &feed_source()).unwrap_err();
        assert!(matches!(err, DriftError::Parse(_)));
    }
}
