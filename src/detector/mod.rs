//! Change detection: the only place `SourceState` is written.
//!
//! Per source, per run:
//! - 304 short-circuit refreshes `last_seen_utc` only.
//! - First successful check persists state but is excluded from the digest,
//!   so a fresh deployment does not alert on everything at once.
//! - An equal fingerprint refreshes validators and last-seen only.
//! - A differing fingerprint persists the new record and marks the source
//!   changed. At most one notification per distinct fingerprint per source.

use chrono::Utc;

use crate::app::Result;
use crate::domain::{ExtractedItem, Outcome, SourceState};
use crate::store::StateStore;

/// Classifies a fresh-content check against the stored state and persists
/// the resulting record.
pub fn on_content<S: StateStore + ?Sized>(
    store: &S,
    source_id: &str,
    prev: Option<&SourceState>,
    new_fingerprint: &str,
    etag: Option<String>,
    last_modified: Option<String>,
    items: &[ExtractedItem],
) -> Result<Outcome> {
    let newest_key = items.first().map(|item| item.id.clone());

    match prev {
        None => {
            let state = SourceState {
                fingerprint: new_fingerprint.to_string(),
                etag,
                last_modified,
                last_seen_utc: Utc::now(),
                last_item_key: newest_key,
            };
            store.put(source_id, &state)?;
            tracing::info!(source = source_id, "first seen, state persisted");
            Ok(Outcome::FirstSeen)
        }
        Some(prev) if prev.fingerprint == new_fingerprint => {
            let state = SourceState {
                fingerprint: prev.fingerprint.clone(),
                etag,
                last_modified,
                last_seen_utc: Utc::now(),
                last_item_key: prev.last_item_key.clone(),
            };
            store.put(source_id, &state)?;
            tracing::debug!(source = source_id, "unchanged");
            Ok(Outcome::Unchanged)
        }
        Some(prev) => {
            let old_prefix = &prev.fingerprint[..8.min(prev.fingerprint.len())];
            let new_prefix = &new_fingerprint[..8.min(new_fingerprint.len())];
            tracing::info!(
                source = source_id,
                old = old_prefix,
                new = new_prefix,
                "content changed"
            );
            let state = SourceState {
                fingerprint: new_fingerprint.to_string(),
                etag,
                last_modified,
                last_seen_utc: Utc::now(),
                last_item_key: newest_key,
            };
            store.put(source_id, &state)?;
            Ok(Outcome::Changed)
        }
    }
}

/// Handles an HTTP 304: never touches the fingerprint, refreshes last-seen.
pub fn on_not_modified<S: StateStore + ?Sized>(
    store: &S,
    source_id: &str,
    prev: Option<&SourceState>,
) -> Result<Outcome> {
    if let Some(prev) = prev {
        let mut state = prev.clone();
        state.last_seen_utc = Utc::now();
        store.put(source_id, &state)?;
    }
    tracing::debug!(source = source_id, "not modified (304)");
    Ok(Outcome::NotModified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;

    fn items(ids: &[&str]) -> Vec<ExtractedItem> {
        ids.iter()
            .map(|id| ExtractedItem::new(*id, format!("Item {}", id)))
            .collect()
    }

    #[test]
    fn test_first_seen_persists_state() {
        let store = SqliteStore::in_memory().unwrap();
        let outcome =
            on_content(&store, "src", None, "fp1", Some("\"e1\"".into()), None, &items(&["r42"]))
                .unwrap();

        assert_eq!(outcome, Outcome::FirstSeen);
        let state = store.get("src").unwrap().unwrap();
        assert_eq!(state.fingerprint, "fp1");
        assert_eq!(state.etag.as_deref(), Some("\"e1\""));
        assert_eq!(state.last_item_key.as_deref(), Some("r42"));
    }

    #[test]
    fn test_unchanged_refreshes_validators_only() {
        let store = SqliteStore::in_memory().unwrap();
        on_content(&store, "src", None, "fp1", None, None, &items(&["r42"])).unwrap();
        let prev = store.get("src").unwrap();

        let outcome = on_content(
            &store,
            "src",
            prev.as_ref(),
            "fp1",
            Some("\"e2\"".into()),
            None,
            &items(&["r42"]),
        )
        .unwrap();

        assert_eq!(outcome, Outcome::Unchanged);
        let state = store.get("src").unwrap().unwrap();
        assert_eq!(state.fingerprint, "fp1");
        assert_eq!(state.etag.as_deref(), Some("\"e2\""));
    }

    #[test]
    fn test_changed_persists_new_fingerprint_and_key() {
        let store = SqliteStore::in_memory().unwrap();
        on_content(&store, "src", None, "fp1", None, None, &items(&["r42"])).unwrap();
        let prev = store.get("src").unwrap();

        let outcome = on_content(
            &store,
            "src",
            prev.as_ref(),
            "fp2",
            None,
            None,
            &items(&["r43", "r42"]),
        )
        .unwrap();

        assert_eq!(outcome, Outcome::Changed);
        let state = store.get("src").unwrap().unwrap();
        assert_eq!(state.fingerprint, "fp2");
        assert_eq!(state.last_item_key.as_deref(), Some("r43"));
    }

    #[test]
    fn test_not_modified_keeps_fingerprint() {
        let store = SqliteStore::in_memory().unwrap();
        on_content(&store, "src", None, "fp1", None, None, &items(&["r42"])).unwrap();
        let prev = store.get("src").unwrap();
        let seen_before = prev.as_ref().unwrap().last_seen_utc;

        let outcome = on_not_modified(&store, "src", prev.as_ref()).unwrap();

        assert_eq!(outcome, Outcome::NotModified);
        let state = store.get("src").unwrap().unwrap();
        assert_eq!(state.fingerprint, "fp1");
        assert!(state.last_seen_utc >= seen_before);
    }

    #[test]
    fn test_not_modified_without_prior_state_writes_nothing() {
        let store = SqliteStore::in_memory().unwrap();
        let outcome = on_not_modified(&store, "src", None).unwrap();
        assert_eq!(outcome, Outcome::NotModified);
        assert!(store.get("src").unwrap().is_none());
    }
}
