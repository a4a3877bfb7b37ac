//! Content adapters: one extraction strategy per source shape.
//!
//! The registry is a closed enum dispatch: adding a variant means adding
//! one arm here plus its module; callers are untouched. No adapter reads
//! another's selector schema.

pub mod feed;
pub mod html_articles;
pub mod html_changelog;
pub mod release;
pub mod structured;

use crate::app::Result;
use crate::config::{AdapterKind, SourceDefinition};
use crate::domain::ExtractedItem;

/// Extracts the ordered top-N items from a fetched body. Order is as the
/// source presents it; the cap is `source.max_items`.
pub fn extract(body: &str, source: &SourceDefinition) -> Result<Vec<ExtractedItem>> {
    match source.adapter {
        AdapterKind::Feed => feed::extract(body, source),
        AdapterKind::Release => release::extract(body, source),
        AdapterKind::HtmlArticles => html_articles::extract(body, source),
        AdapterKind::HtmlChangelog => html_changelog::extract(body, source),
        AdapterKind::StructuredEndpoint => structured::extract(body, source),
    }
}
