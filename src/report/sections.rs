//! Document assembly shared by the table-producing formatters
//!
//! Builds the two-section report: timeline changes (added/removed items
//! plus date-span shifts) and non-timeline field changes. The markdown and
//! plain-table formatters render the same document through different
//! backends.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::domain::{
    DateSpan, DateSpanChange, Item, ItemDiff, ProjectDiff, CREATED_AT_KEY, UPDATED_AT_KEY,
};

use super::classify::timeline_delay_level;
use super::document::{Align, Column, Document, Section, Table, EMPTY_CELL};
use super::humanize::{format_date, human_duration};
use super::ReportOptions;

/// Field names echoing the span fields; excluded from field-change output
const SPAN_ECHO_FIELDS: [&str; 2] = ["start", "end"];

/// Builds the report document for a diff
pub fn build_document(diff: &ProjectDiff, options: &ReportOptions) -> Document {
    let mut doc = Document::new("Project Timeline Analysis");

    let timeline = timeline_table(diff, options);
    if !timeline.is_empty() {
        doc.push_section(Section::table("\u{1F4C5} Timeline Changes", timeline));
    }

    let other = field_change_table(&diff.changed_items);
    if !other.is_empty() {
        doc.push_section(Section::table("\u{1F4CB} Other Changes", other));
    }

    doc
}

fn timeline_table(diff: &ProjectDiff, options: &ReportOptions) -> Table {
    let mut table = Table::new(vec![
        Column::new("Task", Align::Left),
        Column::new("Status", Align::Center),
        Column::new("Details", Align::Left),
        Column::new("Start Date", Align::Right),
        Column::new("End Date", Align::Right),
        Column::new("Duration", Align::Right),
    ]);

    for item in &diff.added_items {
        table.push_row(item_row(item, "Added", "New task", options));
    }
    for item in &diff.removed_items {
        table.push_row(item_row(item, "Removed", "Task removed", options));
    }

    for change in &diff.changed_items {
        let Some(date_change) = &change.date_change else {
            continue;
        };

        let level = timeline_delay_level(
            date_change.start_days_delta,
            date_change.duration_delta,
            &options.thresholds,
        );
        let details = timeline_details(
            date_change,
            change.before.span.as_ref(),
            change.after.span.as_ref(),
        );

        let duration = match change.after.span {
            Some(span) => {
                let base = human_duration(span.duration_days());
                if date_change.duration_delta != 0 {
                    format!("{} ({:+} days)", base, date_change.duration_delta)
                } else {
                    base
                }
            }
            None => EMPTY_CELL.to_string(),
        };

        table.push_row(vec![
            change.after.title().to_string(),
            level.label().to_string(),
            details,
            date_with_change(
                change.after.span.map(|s| s.start),
                change.before.span.map(|s| s.start),
                options,
            ),
            date_with_change(
                change.after.span.map(|s| s.end),
                change.before.span.map(|s| s.end),
                options,
            ),
            duration,
        ]);
    }

    table
}

fn item_row(item: &Item, status: &str, details: &str, options: &ReportOptions) -> Vec<String> {
    let (start, end, duration) = match item.span {
        Some(span) => (
            format_date(span.start, &options.date_format),
            format_date(span.end, &options.date_format),
            human_duration(span.duration_days()),
        ),
        None => (
            EMPTY_CELL.to_string(),
            EMPTY_CELL.to_string(),
            EMPTY_CELL.to_string(),
        ),
    };

    vec![
        item.title().to_string(),
        status.to_string(),
        details.to_string(),
        start,
        end,
        duration,
    ]
}

/// Builds the non-timeline change table with one column per changed field
fn field_change_table(changes: &[ItemDiff]) -> Table {
    let mut field_names = BTreeSet::new();
    for change in changes {
        for field_change in &change.field_changes {
            if is_reportable_field(&field_change.field) {
                field_names.insert(field_change.field.as_str());
            }
        }
    }

    let mut columns = vec![Column::new("Task", Align::Left)];
    let sorted_fields: Vec<&str> = field_names.into_iter().collect();
    for field in &sorted_fields {
        columns.push(Column::new(*field, Align::Center));
    }

    let mut table = Table::new(columns);

    for change in changes {
        let mut row = vec![change.after.title().to_string()];
        row.resize(sorted_fields.len() + 1, EMPTY_CELL.to_string());

        let mut has_reportable = false;
        for field_change in &change.field_changes {
            if !is_reportable_field(&field_change.field) {
                continue;
            }
            has_reportable = true;
            if let Some(col) = sorted_fields.iter().position(|f| *f == field_change.field) {
                row[col + 1] = format!(
                    "{} \u{2192} {}",
                    display_value(field_change.old_value.as_ref()),
                    display_value(field_change.new_value.as_ref()),
                );
            }
        }

        if has_reportable {
            table.push_row(row);
        }
    }

    table
}

/// Returns true unless the field is internal bookkeeping or a span echo
fn is_reportable_field(field: &str) -> bool {
    field != CREATED_AT_KEY && field != UPDATED_AT_KEY && !SPAN_ECHO_FIELDS.contains(&field)
}

/// Display projection of an optional dynamic value
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        None => "(none)".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Natural-language summary of a timeline change
pub fn timeline_details(
    change: &DateSpanChange,
    before: Option<&DateSpan>,
    after: Option<&DateSpan>,
) -> String {
    match (before, after) {
        (None, Some(_)) => return "Timeline added".to_string(),
        (Some(_), None) => return "Timeline removed".to_string(),
        _ => {}
    }

    let mut parts = Vec::new();

    if change.start_days_delta != 0 {
        let verb = if change.start_days_delta < 0 {
            "moved earlier"
        } else {
            "delayed"
        };
        parts.push(format!(
            "start {} by {}",
            verb,
            human_duration(change.start_days_delta.abs())
        ));
    }

    if change.duration_delta != 0 {
        let verb = if change.duration_delta < 0 {
            "decreased"
        } else {
            "increased"
        };
        parts.push(format!(
            "duration {} by {}",
            verb,
            human_duration(change.duration_delta.abs())
        ));
    }

    if parts.is_empty() {
        return "No timeline changes".to_string();
    }

    capitalize(&parts.join(", "))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Renders a date cell, showing "before \u{2192} after" when it moved
fn date_with_change(
    after: Option<chrono::NaiveDate>,
    before: Option<chrono::NaiveDate>,
    options: &ReportOptions,
) -> String {
    match (before, after) {
        (Some(b), Some(a)) if b == a => format_date(a, &options.date_format),
        (Some(b), Some(a)) => format!(
            "{} \u{2192} {}",
            format_date(b, &options.date_format),
            format_date(a, &options.date_format)
        ),
        (None, Some(a)) => format_date(a, &options.date_format),
        (Some(b), None) => format_date(b, &options.date_format),
        (None, None) => EMPTY_CELL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Item, TITLE_KEY};
    use crate::report::SectionBody;

    fn span(start: &str, end: &str) -> DateSpan {
        DateSpan::parse(start, end).unwrap()
    }

    fn options() -> ReportOptions {
        ReportOptions::default()
    }

    #[test]
    fn empty_diff_builds_empty_document() {
        let doc = build_document(&ProjectDiff::default(), &options());
        assert!(doc.sections.is_empty());
    }

    #[test]
    fn added_item_appears_in_timeline_section() {
        let diff = ProjectDiff {
            added_items: vec![Item::new("1")
                .with_attribute(TITLE_KEY, "New work")
                .with_span(span("2024-01-01", "2024-01-07"))],
            ..Default::default()
        };

        let doc = build_document(&diff, &options());
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].title, "\u{1F4C5} Timeline Changes");

        let SectionBody::Table(table) = &doc.sections[0].body else {
            panic!("expected a table section");
        };
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0][0], "New work");
        assert_eq!(table.rows[0][1], "Added");
        assert_eq!(table.rows[0][3], "Jan 1, 2024");
        assert_eq!(table.rows[0][5], "1 week");
    }

    #[test]
    fn added_item_without_span_pads_date_cells() {
        let diff = ProjectDiff {
            added_items: vec![Item::new("1").with_attribute(TITLE_KEY, "Undated")],
            ..Default::default()
        };

        let doc = build_document(&diff, &options());
        let SectionBody::Table(table) = &doc.sections[0].body else {
            panic!("expected a table section");
        };
        assert_eq!(table.rows[0][3], EMPTY_CELL);
        assert_eq!(table.rows[0][4], EMPTY_CELL);
        assert_eq!(table.rows[0][5], EMPTY_CELL);
    }

    #[test]
    fn changed_item_without_date_change_skips_timeline_section() {
        let before = Item::new("1").with_attribute("status", "Todo");
        let after = Item::new("1").with_attribute("status", "Done");
        let diff = ProjectDiff {
            changed_items: vec![before.compare_to(&after)],
            ..Default::default()
        };

        let doc = build_document(&diff, &options());
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].title, "\u{1F4CB} Other Changes");
    }

    #[test]
    fn date_shift_renders_with_arrow_and_delta() {
        let before = Item::new("1")
            .with_attribute(TITLE_KEY, "Slipping")
            .with_span(span("2024-01-01", "2024-01-10"));
        let after = before.clone().with_span(span("2024-01-01", "2024-01-15"));
        let diff = ProjectDiff {
            changed_items: vec![before.compare_to(&after)],
            ..Default::default()
        };

        let doc = build_document(&diff, &options());
        let SectionBody::Table(table) = &doc.sections[0].body else {
            panic!("expected a table section");
        };
        let row = &table.rows[0];
        assert_eq!(row[2], "Duration increased by 5 days");
        // start unchanged, single date
        assert_eq!(row[3], "Jan 1, 2024");
        // end moved, arrow form
        assert_eq!(row[4], "Jan 10, 2024 \u{2192} Jan 15, 2024");
        assert_eq!(row[5], "2 weeks 1 day (+5 days)");
    }

    #[test]
    fn field_change_table_uses_dynamic_columns() {
        let before_1 = Item::new("1")
            .with_attribute(TITLE_KEY, "One")
            .with_attribute("status", "Todo");
        let after_1 = before_1.clone().with_attribute("status", "Done");
        let before_2 = Item::new("2")
            .with_attribute(TITLE_KEY, "Two")
            .with_attribute("priority", "P2");
        let after_2 = before_2.clone().with_attribute("priority", "P1");

        let diff = ProjectDiff {
            changed_items: vec![before_1.compare_to(&after_1), before_2.compare_to(&after_2)],
            ..Default::default()
        };

        let doc = build_document(&diff, &options());
        let SectionBody::Table(table) = &doc.sections[0].body else {
            panic!("expected a table section");
        };

        let headers: Vec<_> = table.columns.iter().map(|c| c.header.as_str()).collect();
        assert_eq!(headers, vec!["Task", "priority", "status"]);

        assert_eq!(table.rows[0], vec!["One", "-", "Todo \u{2192} Done"]);
        assert_eq!(table.rows[1], vec!["Two", "P2 \u{2192} P1", "-"]);
    }

    #[test]
    fn bookkeeping_fields_are_excluded() {
        let before = Item::new("1")
            .with_attribute(TITLE_KEY, "One")
            .with_attribute(UPDATED_AT_KEY, "2024-01-01T00:00:00Z");
        let after = Item::new("1")
            .with_attribute(TITLE_KEY, "One")
            .with_attribute(UPDATED_AT_KEY, "2024-02-01T00:00:00Z");

        let diff = ProjectDiff {
            changed_items: vec![before.compare_to(&after)],
            ..Default::default()
        };

        let doc = build_document(&diff, &options());
        assert!(doc.sections.is_empty());
    }

    #[test]
    fn details_narrate_both_dimensions() {
        let before = span("2024-01-01", "2024-01-10");
        let after = span("2024-01-08", "2024-01-20");
        let change = before.compare_to(&after);

        assert_eq!(
            timeline_details(&change, Some(&before), Some(&after)),
            "Start delayed by 1 week, duration increased by 3 days"
        );
    }

    #[test]
    fn details_narrate_earlier_start() {
        let before = span("2024-01-08", "2024-01-20");
        let after = span("2024-01-01", "2024-01-13");
        let change = before.compare_to(&after);

        assert_eq!(
            timeline_details(&change, Some(&before), Some(&after)),
            "Start moved earlier by 1 week"
        );
    }

    #[test]
    fn details_narrate_span_addition_and_removal() {
        let s = span("2024-01-01", "2024-01-10");
        let change = DateSpanChange::default();
        assert_eq!(timeline_details(&change, None, Some(&s)), "Timeline added");
        assert_eq!(
            timeline_details(&change, Some(&s), None),
            "Timeline removed"
        );
    }

    #[test]
    fn removed_field_value_displays_none() {
        assert_eq!(display_value(None), "(none)");
        assert_eq!(display_value(Some(&serde_json::json!("x"))), "x");
        assert_eq!(display_value(Some(&serde_json::json!(3))), "3");
    }
}
