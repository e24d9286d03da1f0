//! Project state snapshots and the diff engine
//!
//! A state is a timestamped capture of every item in a GitHub project.
//! States are never merged, only compared; the diff is recomputed fresh on
//! every call and sorted by item ID so the output is deterministic.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::item::{Item, ItemDiff};

#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("invalid filter '{0}': expected attribute=value")]
    MissingEquals(String),
}

/// The state of a project at a specific point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectState {
    /// Path the state was loaded from; empty for freshly captured states
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub filename: String,

    pub timestamp: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub project_number: u32,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub project_id: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub organization: String,

    pub items: Vec<Item>,
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

/// All changes between two project states
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectDiff {
    /// Items present only in the target state
    pub added_items: Vec<Item>,
    /// Items present only in the source state
    pub removed_items: Vec<Item>,
    /// Items present in both states with detected changes
    pub changed_items: Vec<ItemDiff>,
}

impl ProjectState {
    /// Creates an empty state for a project, timestamped now
    pub fn new(project_number: u32) -> Self {
        Self {
            filename: String::new(),
            timestamp: Utc::now(),
            project_number,
            project_id: String::new(),
            organization: String::new(),
            items: Vec::new(),
        }
    }

    /// Compares this state to a later one
    pub fn compare_to(&self, other: &ProjectState) -> ProjectDiff {
        compare_states(self, other)
    }

    /// Returns a state retaining only items matching `attribute=value`
    ///
    /// An empty filter is a no-op. The value is matched against a string
    /// projection of the attribute; items missing the attribute are
    /// excluded. All state metadata is carried over unchanged.
    pub fn filter(&self, filter: &str) -> Result<ProjectState, FilterError> {
        if filter.is_empty() {
            return Ok(self.clone());
        }

        let (attribute, value) = filter
            .split_once('=')
            .ok_or_else(|| FilterError::MissingEquals(filter.to_string()))?;

        let items = self
            .items
            .iter()
            .filter(|item| {
                item.attributes
                    .get(attribute)
                    .map(|v| value_to_string(v) == value)
                    .unwrap_or(false)
            })
            .cloned()
            .collect();

        Ok(ProjectState {
            filename: self.filename.clone(),
            timestamp: self.timestamp,
            project_number: self.project_number,
            project_id: self.project_id.clone(),
            organization: self.organization.clone(),
            items,
        })
    }
}

/// String projection of a dynamic attribute value for filter matching
fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Compares two project states and returns what changed
///
/// Items are matched by ID. The result sequences are sorted by item ID so
/// repeated comparisons of the same inputs produce identical output.
pub fn compare_states(from: &ProjectState, to: &ProjectState) -> ProjectDiff {
    let old_items: HashMap<&str, &Item> =
        from.items.iter().map(|i| (i.id.as_str(), i)).collect();
    let new_items: HashMap<&str, &Item> = to.items.iter().map(|i| (i.id.as_str(), i)).collect();

    let mut diff = ProjectDiff::default();

    for (id, old_item) in &old_items {
        match new_items.get(id) {
            None => diff.removed_items.push((*old_item).clone()),
            Some(new_item) => {
                let item_diff = old_item.compare_to(new_item);
                if item_diff.has_changes() {
                    diff.changed_items.push(item_diff);
                }
            }
        }
    }

    for (id, new_item) in &new_items {
        if !old_items.contains_key(id) {
            diff.added_items.push((*new_item).clone());
        }
    }

    diff.added_items.sort_by(|a, b| a.id.cmp(&b.id));
    diff.removed_items.sort_by(|a, b| a.id.cmp(&b.id));
    diff.changed_items.sort_by(|a, b| a.item_id.cmp(&b.item_id));

    diff
}

impl ProjectDiff {
    /// Returns true if nothing was added, removed, or changed
    pub fn is_empty(&self) -> bool {
        self.added_items.is_empty() && self.removed_items.is_empty() && self.changed_items.is_empty()
    }
}
