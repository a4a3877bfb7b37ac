use regex::Regex;

use crate::domain::ExtractedItem;

/// Strips volatile substrings and whitespace noise from extracted items so
/// unrelated churn does not trigger false changes. Pure and deterministic;
/// item order is preserved.
#[derive(Clone, Default)]
pub struct Normalizer;

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Applies the source's compiled ignore patterns to the title, link,
    /// and date fields, collapses whitespace runs, and drops items whose
    /// title normalizes to empty. Links are scrubbed too since they feed
    /// the fingerprint (tracking tokens would otherwise register as churn).
    pub fn normalize(&self, items: Vec<ExtractedItem>, patterns: &[Regex]) -> Vec<ExtractedItem> {
        items
            .into_iter()
            .filter_map(|mut item| {
                item.title = scrub(&item.title, patterns);
                if item.title.is_empty() {
                    return None;
                }
                item.link = item
                    .link
                    .as_deref()
                    .map(|l| scrub(l, patterns))
                    .filter(|l| !l.is_empty());
                item.date = item
                    .date
                    .as_deref()
                    .map(|d| scrub(d, patterns))
                    .filter(|d| !d.is_empty());
                Some(item)
            })
            .collect()
    }
}

fn scrub(text: &str, patterns: &[Regex]) -> String {
    let mut out = text.to_string();
    for pattern in patterns {
        out = pattern.replace_all(&out, "").into_owned();
    }
    collapse_whitespace(&out)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
