use feed_rs::parser;
use regex::Regex;

use crate::adapters::feed::entry_to_item;
use crate::app::{DriftError, Result};
use crate::config::SourceDefinition;
use crate::domain::ExtractedItem;

/// Releases-feed adapter. Same parse as the feed adapter, but item identity
/// is the release tag: the trailing path segment of the entry id (GitHub
/// tag URIs look like `tag:github.com,2008:Repository/123/v1.2.0`), falling
/// back to a version pattern in the title.
pub fn extract(body: &str, source: &SourceDefinition) -> Result<Vec<ExtractedItem>> {
    let feed = parser::parse(body.as_bytes())
        .map_err(|e| DriftError::Parse(format!("[{}] releases feed parse failed: {}", source.id, e)))?;

    let version_re =
        Regex::new(r"v?\d+\.\d+(?:\.\d+)?(?:-[A-Za-z0-9.]+)?").expect("version pattern");

    let items = feed
        .entries
        .into_iter()
        .filter_map(|entry| {
            let mut item = entry_to_item(entry)?;
            if let Some(tag) = extract_tag(&item.id, &item.title, &version_re) {
                item.id = tag.clone();
                item.tag = Some(tag);
            }
            Some(item)
        })
        .take(source.max_items)
        .collect();

    Ok(items)
}

fn extract_tag(id: &str, title: &str, version_re: &Regex) -> Option<String> {
    if let Some((_, segment)) = id.rsplit_once('/') {
        if !segment.is_empty() {
            return Some(segment.to_string());
        }
    }
    version_re.find(title).map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdapterKind;

    fn release_source() -> SourceDefinition {
        SourceDefinition {
            id: "acme_releases".into(),
            org: "Acme".into(),
            name: "acme/widget releases".into(),
            adapter: AdapterKind::Release,
            url: "https://github.example/acme/widget/releases.atom".into(),
            selectors: None,
            max_items: 10,
            ignore_patterns: Vec::new(),
            headers: Default::default(),
        }
    }

    const RELEASES_ATOM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Release notes from widget</title>
  <entry>
    <id>tag:github.com,2008:Repository/123456/v2.1.0</id>
    <title>v2.1.0</title>
    <link rel="alternate" href="https://github.example/acme/widget/releases/tag/v2.1.0"/>
    <updated>2024-02-01T00:00:00Z</updated>
  </entry>
  <entry>
    <id>tag:github.com,2008:Repository/123456/v2.0.0</id>
    <title>Widget 2.0</title>
    <link rel="alternate" href="https://github.example/acme/widget/releases/tag/v2.0.0"/>
    <updated>2024-01-01T00:00:00Z</updated>
  </entry>
</feed>"#;

    #[test]
    fn test_release_identity_is_the_tag() {
        let items = extract(RELEASES_ATOM, &release_source()).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "v2.1.0");
        assert_eq!(items[0].tag.as_deref(), Some("v2.1.0"));
        assert_eq!(items[1].id, "v2.0.0");
    }

    #[test]
    fn test_tag_falls_back_to_title_version() {
        let re = Regex::new(r"v?\d+\.\d+(?:\.\d+)?(?:-[A-Za-z0-9.]+)?").unwrap();
        assert_eq!(
            extract_tag("no-slash-id", "Widget 3.2.1 is out", &re).as_deref(),
            Some("3.2.1")
        );
        assert_eq!(extract_tag("no-slash-id", "no version here", &re), None);
    }
}
