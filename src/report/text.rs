//! Plain text narrative formatter

use std::fmt::Write;

use crate::domain::{Item, ProjectDiff, CREATED_AT_KEY, TITLE_KEY, UPDATED_AT_KEY};

use super::classify::timeline_delay_level;
use super::humanize::{format_date, human_duration};
use super::sections::display_value;
use super::{Formatter, ReportOptions, NO_CHANGES_MESSAGE};

/// Formats project diffs as narrative plain text
pub struct TextFormatter {
    options: ReportOptions,
}

impl TextFormatter {
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    fn write_item(&self, out: &mut String, item: &Item, status: &str) {
        let _ = writeln!(out, "- {}", item.title());
        let _ = writeln!(out, "  Status: {}", status);

        if let Some(span) = &item.span {
            let _ = writeln!(
                out,
                "  Timeline: {} \u{2192} {} ({})",
                format_date(span.start, &self.options.date_format),
                format_date(span.end, &self.options.date_format),
                human_duration(span.duration_days()),
            );
        }

        for (key, value) in &item.attributes {
            let lowered = key.to_lowercase();
            if lowered == TITLE_KEY.to_lowercase()
                || lowered == CREATED_AT_KEY
                || lowered == UPDATED_AT_KEY
            {
                continue;
            }
            let _ = writeln!(out, "  {}: {}", key, display_value(Some(value)));
        }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, diff: &ProjectDiff) -> String {
        if diff.is_empty() {
            return NO_CHANGES_MESSAGE.to_string();
        }

        let mut out = String::new();

        if !diff.added_items.is_empty() {
            out.push_str("Added Items:\n");
            for item in &diff.added_items {
                self.write_item(&mut out, item, "Added");
                out.push('\n');
            }
        }

        if !diff.removed_items.is_empty() {
            out.push_str("Removed Items:\n");
            for item in &diff.removed_items {
                self.write_item(&mut out, item, "Removed");
                out.push('\n');
            }
        }

        if !diff.changed_items.is_empty() {
            out.push_str("Changed Items:\n");
            for change in &diff.changed_items {
                let _ = writeln!(out, "- {}", change.after.title());

                if let Some(date_change) = &change.date_change {
                    let level = timeline_delay_level(
                        date_change.start_days_delta,
                        date_change.duration_delta,
                        &self.options.thresholds,
                    );
                    let _ = writeln!(
                        out,
                        "  Timeline: {} ({})",
                        level.label(),
                        human_duration(date_change.duration_delta),
                    );
                    if let Some(span) = &change.before.span {
                        let _ = writeln!(
                            out,
                            "  Before: {} \u{2192} {}",
                            format_date(span.start, &self.options.date_format),
                            format_date(span.end, &self.options.date_format),
                        );
                    }
                    if let Some(span) = &change.after.span {
                        let _ = writeln!(
                            out,
                            "  After:  {} \u{2192} {}",
                            format_date(span.start, &self.options.date_format),
                            format_date(span.end, &self.options.date_format),
                        );
                    }
                }

                let reportable: Vec<_> = change
                    .field_changes
                    .iter()
                    .filter(|c| c.field != CREATED_AT_KEY && c.field != UPDATED_AT_KEY)
                    .collect();

                if !reportable.is_empty() {
                    out.push_str("  Changes:\n");
                    for field_change in reportable {
                        let _ = writeln!(
                            out,
                            "    {}: {} \u{2192} {}",
                            field_change.field,
                            display_value(field_change.old_value.as_ref()),
                            display_value(field_change.new_value.as_ref()),
                        );
                    }
                }

                out.push('\n');
            }
        }

        out
    }
}
