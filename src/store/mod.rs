pub mod sqlite;

use crate::app::Result;
use crate::domain::SourceState;

pub use sqlite::SqliteStore;

/// One record per source in the durable key-value state store. `put` is an
/// unconditional whole-record upsert (last-writer-wins); each source key is
/// written by at most one task per run and runs do not overlap.
pub trait StateStore {
    fn get(&self, source_id: &str) -> Result<Option<SourceState>>;
    fn put(&self, source_id: &str, state: &SourceState) -> Result<()>;
}
