use crate::config::SourceDefinition;
use crate::domain::ExtractedItem;

/// Error reasons in reports are bounded; no raw payload dumps.
const MAX_ERROR_REASON_CHARS: usize = 200;

/// Per-source classification for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Conditional GET short-circuited (HTTP 304).
    NotModified,
    /// First successful check of this source; state persisted, not notified.
    FirstSeen,
    /// Fresh content with an identical fingerprint.
    Unchanged,
    /// Fresh content with a new fingerprint; contributes to the digest.
    Changed,
    /// Fetch, extraction, fingerprint, or store failure for this source.
    Error,
}

/// What one source produced in one run.
#[derive(Debug, Clone)]
pub struct SourceReport {
    pub source_id: String,
    pub org: String,
    pub name: String,
    pub url: String,
    pub outcome: Outcome,
    /// Newest items for display; populated only for `Changed`.
    pub items: Vec<ExtractedItem>,
    pub error: Option<String>,
}

impl SourceReport {
    pub fn of(source: &SourceDefinition, outcome: Outcome) -> Self {
        Self {
            source_id: source.id.clone(),
            org: source.org.clone(),
            name: source.name.clone(),
            url: source.url.clone(),
            outcome,
            items: Vec::new(),
            error: None,
        }
    }

    pub fn changed(source: &SourceDefinition, items: Vec<ExtractedItem>) -> Self {
        let mut report = Self::of(source, Outcome::Changed);
        report.items = items;
        report
    }

    pub fn error(source: &SourceDefinition, reason: &str) -> Self {
        let mut report = Self::of(source, Outcome::Error);
        report.error = Some(truncate_reason(reason));
        report
    }
}

fn truncate_reason(reason: &str) -> String {
    reason.chars().take(MAX_ERROR_REASON_CHARS).collect()
}

/// Run-level counts reported by `run_once`.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub checked: usize,
    pub changed: usize,
    pub first_seen: usize,
    pub errored: usize,
    /// True when a digest was built but its dispatch failed.
    pub notify_failed: bool,
    pub duration_ms: u64,
}

impl RunSummary {
    pub fn from_reports(reports: &[SourceReport], duration_ms: u64) -> Self {
        let count = |outcome: Outcome| reports.iter().filter(|r| r.outcome == outcome).count();
        Self {
            checked: reports.len(),
            changed: count(Outcome::Changed),
            first_seen: count(Outcome::FirstSeen),
            errored: count(Outcome::Error),
            notify_failed: false,
            duration_ms,
        }
    }
}
