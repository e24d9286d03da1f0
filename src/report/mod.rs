//! # Report Layer
//!
//! Turns a [`ProjectDiff`](crate::domain::ProjectDiff) into human-readable
//! output.
//!
//! ## Pipeline
//!
//! 1. [`classify`] buckets each timeline change into a [`DelayLevel`]
//!    using configurable day thresholds
//! 2. [`humanize`] renders durations and dates as short summaries
//! 3. Formatters assemble the diff into the abstract [`Document`] model
//!    and render it:
//!
//! | Formatter | Output |
//! |-----------|--------|
//! | [`TextFormatter`] | Narrative plain text |
//! | [`MarkdownFormatter`] | Markdown with alignment-aware pipe tables |
//! | [`PlainTableFormatter`] | Width-aligned terminal tables |
//!
//! All formatters are pure: same diff and options in, same string out.

mod classify;
mod humanize;
mod document;
mod sections;
mod text;
mod markdown;
mod table;

pub use classify::{delay_level, timeline_delay_level, DelayLevel, Thresholds};
pub use document::{Align, Column, Document, Section, SectionBody, Table, EMPTY_CELL};
pub use humanize::{format_date, human_duration, parse_human_range, RangeError};
pub use markdown::MarkdownFormatter;
pub use sections::build_document;
pub use table::PlainTableFormatter;
pub use text::TextFormatter;

use crate::domain::ProjectDiff;

/// Message printed when a diff is empty
pub const NO_CHANGES_MESSAGE: &str = "No changes found in the project timeline.";

/// Configuration shared by all formatters
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    /// chrono format string for rendered dates
    pub date_format: String,
    /// Delay classification thresholds in days
    pub thresholds: Thresholds,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            date_format: "%b %-d, %Y".to_string(),
            thresholds: Thresholds::default(),
        }
    }
}

/// A diff renderer
pub trait Formatter {
    fn format(&self, diff: &ProjectDiff) -> String;
}
