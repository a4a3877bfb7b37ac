use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::app::{DriftError, Result};
use crate::config::SourceDefinition;
use crate::domain::ExtractedItem;

/// HTML article-list adapter. `container`, `item`, and `title` selectors are
/// required (enforced at config load). A container miss is a parse error; a
/// miss on an individual sub-field yields a partially filled item.
pub fn extract(body: &str, source: &SourceDefinition) -> Result<Vec<ExtractedItem>> {
    let selectors = source
        .selectors
        .as_ref()
        .ok_or_else(|| missing(source, "selectors"))?;

    let container_sel = required_selector(source, selectors.container.as_deref(), "container")?;
    let item_sel = required_selector(source, selectors.item.as_deref(), "item")?;
    let title_sel = required_selector(source, selectors.title.as_deref(), "title")?;
    let link_sel = optional_selector(source, selectors.link.as_deref())?;
    let date_sel = optional_selector(source, selectors.date.as_deref())?;

    let doc = Html::parse_document(body);
    let container = doc.select(&container_sel).next().ok_or_else(|| {
        DriftError::Parse(format!(
            "[{}] container selector {:?} matched nothing",
            source.id,
            selectors.container.as_deref().unwrap_or_default()
        ))
    })?;

    let base = Url::parse(&source.url).ok();
    let time_sel = Selector::parse("time").expect("time selector");

    let mut items = Vec::new();
    for element in container.select(&item_sel) {
        if items.len() >= source.max_items {
            break;
        }

        let Some(title_el) = element.select(&title_sel).next() else {
            continue;
        };
        let title = element_text(title_el);
        if title.is_empty() {
            continue;
        }

        let link = find_link(element, title_el, link_sel.as_ref())
            .map(|href| absolutize(base.as_ref(), &href));

        let date = find_date(element, date_sel.as_ref(), &time_sel);

        let id = link
            .clone()
            .unwrap_or_else(|| format!("title:{}", title.to_lowercase()));

        let mut item = ExtractedItem::new(id, title);
        item.link = link;
        item.date = date;
        items.push(item);
    }

    Ok(items)
}

fn find_link(
    element: ElementRef,
    title_el: ElementRef,
    link_sel: Option<&Selector>,
) -> Option<String> {
    if let Some(sel) = link_sel {
        if let Some(href) = element.select(sel).next().and_then(|el| el.value().attr("href")) {
            return Some(href.to_string());
        }
    }

    if title_el.value().name() == "a" {
        if let Some(href) = title_el.value().attr("href") {
            return Some(href.to_string());
        }
    }

    let anchor_sel = Selector::parse("a[href]").expect("anchor selector");
    element
        .select(&anchor_sel)
        .next()
        .and_then(|el| el.value().attr("href"))
        .map(String::from)
}

pub(crate) fn find_date(
    element: ElementRef,
    date_sel: Option<&Selector>,
    time_sel: &Selector,
) -> Option<String> {
    if let Some(sel) = date_sel {
        if let Some(el) = element.select(sel).next() {
            let date = el
                .value()
                .attr("datetime")
                .map(String::from)
                .unwrap_or_else(|| element_text(el));
            if !date.is_empty() {
                return Some(date);
            }
        }
    }

    element.select(time_sel).next().and_then(|el| {
        let date = el
            .value()
            .attr("datetime")
            .map(String::from)
            .unwrap_or_else(|| element_text(el));
        (!date.is_empty()).then_some(date)
    })
}

fn absolutize(base: Option<&Url>, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    match base.and_then(|b| b.join(href).ok()) {
        Some(url) => url.to_string(),
        None => href.to_string(),
    }
}

pub(crate) fn element_text(element: ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn required_selector(
    source: &SourceDefinition,
    value: Option<&str>,
    field: &str,
) -> Result<Selector> {
    let value = value.ok_or_else(|| missing(source, field))?;
    Selector::parse(value).map_err(|e| {
        DriftError::Parse(format!(
            "[{}] invalid selector {:?} for {}: {}",
            source.id, value, field, e
        ))
    })
}

pub(crate) fn optional_selector(
    source: &SourceDefinition,
    value: Option<&str>,
) -> Result<Option<Selector>> {
    match value {
        None => Ok(None),
        Some(v) => Selector::parse(v)
            .map(Some)
            .map_err(|e| DriftError::Parse(format!("[{}] invalid selector {:?}: {}", source.id, v, e))),
    }
}

fn missing(source: &SourceDefinition, field: &str) -> DriftError {
    DriftError::Parse(format!("[{}] missing required {}", source.id, field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AdapterKind, Selectors};

    fn articles_source() -> SourceDefinition {
        SourceDefinition {
            id: "acme_blog".into(),
            org: "Acme".into(),
            name: "Acme Blog".into(),
            adapter: AdapterKind::HtmlArticles,
            url: "https://acme.example/blog".into(),
            selectors: Some(Selectors {
                container: Some(".posts".into()),
                item: Some("article".into()),
                title: Some("h2".into()),
                link: Some("h2 a".into()),
                date: Some(".meta time".into()),
                ..Default::default()
            }),
            max_items: 10,
            ignore_patterns: Vec::new(),
            headers: Default::default(),
        }
    }

    const PAGE: &str = r#"<html><body>
<div class="posts">
  <article>
    <h2><a href="/blog/second-post">Second Post</a></h2>
    <div class="meta"><time datetime="2024-02-01">Feb 1, 2024</time></div>
  </article>
  <article>
    <h2><a href="https://acme.example/blog/first-post">First Post</a></h2>
  </article>
  <article>
    <h2>No Link Here</h2>
  </article>
</div>
</body></html>"#;

    #[test]
    fn test_extract_articles() {
        let items = extract(PAGE, &articles_source()).unwrap();
        assert_eq!(items.len(), 3);

        assert_eq!(items[0].title, "Second Post");
        assert_eq!(
            items[0].link.as_deref(),
            Some("https://acme.example/blog/second-post")
        );
        assert_eq!(items[0].date.as_deref(), Some("2024-02-01"));

        assert_eq!(
            items[1].link.as_deref(),
            Some("https://acme.example/blog/first-post")
        );
    }

    #[test]
    fn test_subfield_miss_gives_partial_item() {
        let items = extract(PAGE, &articles_source()).unwrap();
        let partial = &items[2];
        assert_eq!(partial.title, "No Link Here");
        assert!(partial.link.is_none());
        assert!(partial.date.is_none());
        assert_eq!(partial.id, "title:no link here");
    }

    #[test]
    fn test_container_miss_is_parse_error() {
        let mut source = articles_source();
        if let Some(sel) = source.selectors.as_mut() {
            sel.container = Some("#does-not-exist".into());
        }
        let err = extract(PAGE, &source).unwrap_err();
        assert!(matches!(err, DriftError::Parse(_)));
    }

    #[test]
    fn test_max_items_cap() {
        let mut source = articles_source();
        source.max_items = 1;
        let items = extract(PAGE, &source).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Second Post");
    }
}
