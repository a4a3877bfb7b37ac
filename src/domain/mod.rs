pub mod item;
pub mod outcome;
pub mod state;

pub use item::ExtractedItem;
pub use outcome::{Outcome, RunSummary, SourceReport};
pub use state::SourceState;
