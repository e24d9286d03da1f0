//! Domain models for drift
//!
//! Contains the snapshot and diff model without any I/O concerns.

mod span;
mod item;
mod state;

pub use span::{DateSpan, DateSpanChange, SpanError, DATE_FORMAT};
pub use item::{FieldChange, Item, ItemDiff, CREATED_AT_KEY, STATUS_KEY, TITLE_KEY, UPDATED_AT_KEY};
pub use state::{compare_states, FilterError, ProjectDiff, ProjectState};
