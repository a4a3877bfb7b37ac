use scraper::{Html, Selector};

use crate::adapters::html_articles::{
    element_text, find_date, optional_selector, required_selector,
};
use crate::app::{DriftError, Result};
use crate::config::SourceDefinition;
use crate::domain::ExtractedItem;

/// HTML changelog adapter. `container`, `entry`, and `version` selectors are
/// required; entries are grouped under version headings. An entry element's
/// anchor id becomes a fragment link back into the page.
pub fn extract(body: &str, source: &SourceDefinition) -> Result<Vec<ExtractedItem>> {
    let selectors = source
        .selectors
        .as_ref()
        .ok_or_else(|| DriftError::Parse(format!("[{}] missing required selectors", source.id)))?;

    let container_sel = required_selector(source, selectors.container.as_deref(), "container")?;
    let entry_sel = required_selector(source, selectors.entry.as_deref(), "entry")?;
    let version_sel = required_selector(source, selectors.version.as_deref(), "version")?;
    let date_sel = optional_selector(source, selectors.date.as_deref())?;

    let doc = Html::parse_document(body);
    let container = doc.select(&container_sel).next().ok_or_else(|| {
        DriftError::Parse(format!(
            "[{}] container selector {:?} matched nothing",
            source.id,
            selectors.container.as_deref().unwrap_or_default()
        ))
    })?;

    let time_sel = Selector::parse("time").expect("time selector");

    let mut items = Vec::new();
    for entry in container.select(&entry_sel) {
        if items.len() >= source.max_items {
            break;
        }

        let version = match entry.select(&version_sel).next() {
            Some(el) => element_text(el),
            // The entry element may itself be the version heading.
            None if is_heading(entry.value().name()) => element_text(entry),
            None => continue,
        };
        if version.is_empty() {
            continue;
        }

        let anchor = entry.value().attr("id").map(String::from);
        let link = anchor
            .as_deref()
            .map(|id| format!("{}#{}", source.url, id));
        let id = anchor.unwrap_or_else(|| format!("version:{}", version.to_lowercase()));

        let mut item = ExtractedItem::new(id, version.clone());
        item.tag = Some(version);
        item.link = link;
        item.date = find_date(entry, date_sel.as_ref(), &time_sel);
        items.push(item);
    }

    Ok(items)
}

fn is_heading(name: &str) -> bool {
    matches!(name, "h1" | "h2" | "h3" | "h4")
}
