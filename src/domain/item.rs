use serde::{Deserialize, Serialize};

/// A single item extracted from a source, in the order the source
/// presents it (newest first by convention).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedItem {
    /// Stable identity: entry GUID, release tag, link, or a title-derived key.
    pub id: String,
    pub title: String,
    pub link: Option<String>,
    /// Publication timestamp as presented by the source, when available.
    pub date: Option<String>,
    /// Version or release tag, for release-style sources.
    pub tag: Option<String>,
}

impl ExtractedItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            link: None,
            date: None,
            tag: None,
        }
    }
}
