use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted per-source record. Written only by the change detector after a
/// confirmed content check; never deleted by the pipeline itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceState {
    pub fingerprint: String,
    pub etag: Option<String>,
    pub last_modified: Option<String>,
    pub last_seen_utc: DateTime<Utc>,
    /// Key of the newest item at the last confirmed check (GUID, tag, link).
    pub last_item_key: Option<String>,
}

impl SourceState {
    pub fn new(fingerprint: impl Into<String>) -> Self {
        Self {
            fingerprint: fingerprint.into(),
            etag: None,
            last_modified: None,
            last_seen_utc: Utc::now(),
            last_item_key: None,
        }
    }
}
