//! drift - Track changes in GitHub Projects over time
//!
//! drift periodically snapshots the item-level state of a GitHub Project
//! (v2) to local JSON files and computes structural diffs between two
//! snapshots: added, removed, and changed items, timeline shifts with
//! delay classification, and custom field changes.

pub mod domain;
pub mod storage;
pub mod report;
pub mod github;
pub mod cli;

pub use domain::{compare_states, DateSpan, DateSpanChange, Item, ItemDiff, ProjectDiff, ProjectState};
