//! Project item model
//!
//! An item is one tracked project entity (issue, pull request, or draft)
//! at a point in time: an identifier, an optional planned timeline, and an
//! open-ended bag of custom field values. Items are immutable snapshots;
//! comparison never mutates either side.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::span::{DateSpan, DateSpanChange};

/// Reserved attribute key for the display title
pub const TITLE_KEY: &str = "Title";
/// Attribute key for the item status
pub const STATUS_KEY: &str = "status";
/// Attribute key for the content creation timestamp
pub const CREATED_AT_KEY: &str = "created_at";
/// Attribute key for the content update timestamp
pub const UPDATED_AT_KEY: &str = "updated_at";

/// A single project item at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier within a project state
    pub id: String,

    /// Planned timeline, when both configured date fields were recognized
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<DateSpan>,

    /// Custom field values keyed by field name
    #[serde(default)]
    pub attributes: BTreeMap<String, Value>,
}

/// A single attribute's old/new value pair
///
/// `None` means "no value": the attribute was absent on that side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: String,
    pub old_value: Option<Value>,
    pub new_value: Option<Value>,
}

/// The complete state change of one item between two snapshots
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDiff {
    pub item_id: String,
    pub before: Item,
    pub after: Item,
    /// Present iff the two spans are not equal; absence means "no timeline
    /// change", not "zero change"
    pub date_change: Option<DateSpanChange>,
    /// Attribute changes sorted by field name
    pub field_changes: Vec<FieldChange>,
}

impl Item {
    /// Creates an item with no span and no attributes
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            span: None,
            attributes: BTreeMap::new(),
        }
    }

    /// Sets an attribute value, consuming and returning the item
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Sets the span, consuming and returning the item
    pub fn with_span(mut self, span: DateSpan) -> Self {
        self.span = Some(span);
        self
    }

    /// Display title, or "" when absent or not a string
    pub fn title(&self) -> &str {
        self.str_attribute(TITLE_KEY)
    }

    /// Status field value, or "" when absent or not a string
    pub fn status(&self) -> &str {
        self.str_attribute(STATUS_KEY)
    }

    /// Content creation timestamp, when present and parseable
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.time_attribute(CREATED_AT_KEY)
    }

    /// Content update timestamp, when present and parseable
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.time_attribute(UPDATED_AT_KEY)
    }

    /// String attribute lookup; absence and type mismatch both yield ""
    fn str_attribute(&self, key: &str) -> &str {
        self.attributes.get(key).and_then(Value::as_str).unwrap_or("")
    }

    /// Timestamp attribute lookup; absence, type mismatch, and malformed
    /// values all yield None
    fn time_attribute(&self, key: &str) -> Option<DateTime<Utc>> {
        let raw = self.attributes.get(key)?.as_str()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }

    /// Compares this item to a later snapshot sharing the same ID
    pub fn compare_to(&self, other: &Item) -> ItemDiff {
        let date_change = match (&self.span, &other.span) {
            (Some(a), Some(b)) if a != b => Some(a.compare_to(b)),
            // Span appeared or disappeared outright: flag the timeline as
            // changed with zero deltas, the before/after items carry the
            // dates themselves
            (Some(_), None) | (None, Some(_)) => Some(DateSpanChange::default()),
            _ => None,
        };

        let mut field_changes = Vec::new();

        // Changed and added attributes
        for (key, new_value) in &other.attributes {
            match self.attributes.get(key) {
                Some(old_value) if old_value == new_value => {}
                old_value => field_changes.push(FieldChange {
                    field: key.clone(),
                    old_value: old_value.cloned(),
                    new_value: Some(new_value.clone()),
                }),
            }
        }

        // Deleted attributes
        for (key, old_value) in &self.attributes {
            if !other.attributes.contains_key(key) {
                field_changes.push(FieldChange {
                    field: key.clone(),
                    old_value: Some(old_value.clone()),
                    new_value: None,
                });
            }
        }

        field_changes.sort_by(|a, b| a.field.cmp(&b.field));

        ItemDiff {
            item_id: self.id.clone(),
            before: self.clone(),
            after: other.clone(),
            date_change,
            field_changes,
        }
    }
}

impl ItemDiff {
    /// Returns true if the timeline or any attribute changed
    pub fn has_changes(&self) -> bool {
        self.date_change.is_some() || !self.field_changes.is_empty()
    }

    /// Returns true if the timeline changed
    pub fn has_date_change(&self) -> bool {
        self.date_change.is_some()
    }

    /// Returns the change for a specific attribute if it exists
    pub fn change_for_field(&self, field: &str) -> Option<&FieldChange> {
        self.field_changes.iter().find(|c| c.field == field)
    }

    /// Returns the names of all changed attributes
    pub fn changed_field_names(&self) -> Vec<&str> {
        self.field_changes.iter().map(|c| c.field.as_str()).collect()
    }
}
