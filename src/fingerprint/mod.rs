use sha2::{Digest, Sha256};

use crate::domain::ExtractedItem;

// Canonical encoding separators: unit separator between fields, record
// separator between items. Neither survives whitespace normalization, so
// field content cannot collide with the framing.
const FIELD_SEP: &[u8] = b"\x1f";
const ITEM_SEP: &[u8] = b"\x1e";

const EMPTY_SENTINEL: &[u8] = b"driftwatch:empty";

/// Digest over the normalized item sequence, top `max_items` only, in
/// presented order. Identical sequences always hash identically; any change
/// in content, order, or count changes the digest.
pub fn fingerprint(items: &[ExtractedItem], max_items: usize) -> String {
    if items.is_empty() {
        return empty_fingerprint();
    }

    let mut hasher = Sha256::new();
    for item in items.iter().take(max_items) {
        hasher.update(item.id.as_bytes());
        hasher.update(FIELD_SEP);
        hasher.update(item.title.to_lowercase().as_bytes());
        hasher.update(FIELD_SEP);
        hasher.update(item.link.as_deref().unwrap_or("").as_bytes());
        hasher.update(ITEM_SEP);
    }
    hex::encode(hasher.finalize())
}

/// Sentinel digest for an empty extraction. The pipeline treats zero items
/// as a parse failure, so this never reaches the state store; it exists so
/// `fingerprint` is total and the sentinel is distinct from any item hash.
pub fn empty_fingerprint() -> String {
    hex::encode(Sha256::digest(EMPTY_SENTINEL))
}
