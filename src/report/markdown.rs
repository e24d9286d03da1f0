//! Markdown formatter
//!
//! Renders the report document as GitHub-flavored markdown with
//! alignment-aware pipe tables.

use crate::domain::ProjectDiff;

use super::document::{Align, Document, Section, SectionBody, Table};
use super::sections::build_document;
use super::{Formatter, ReportOptions, NO_CHANGES_MESSAGE};

/// Formats project diffs as markdown
pub struct MarkdownFormatter {
    options: ReportOptions,
}

impl MarkdownFormatter {
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }
}

impl Formatter for MarkdownFormatter {
    fn format(&self, diff: &ProjectDiff) -> String {
        if diff.is_empty() {
            return NO_CHANGES_MESSAGE.to_string();
        }

        let doc = build_document(diff, &self.options);
        render_document(&doc)
    }
}

/// Renders a document as markdown
pub fn render_document(doc: &Document) -> String {
    let mut out = String::new();

    if !doc.title.is_empty() {
        out.push_str("# ");
        out.push_str(&doc.title);
        out.push_str("\n\n");
    }

    for section in &doc.sections {
        out.push_str(&render_section(section));
        out.push('\n');
    }

    out
}

fn render_section(section: &Section) -> String {
    let mut out = String::new();

    if !section.title.is_empty() {
        out.push_str("## ");
        out.push_str(&section.title);
        out.push_str("\n\n");
    }

    match &section.body {
        SectionBody::Text(text) => {
            out.push_str(text);
            out.push('\n');
        }
        SectionBody::Table(table) => out.push_str(&render_table(table)),
    }

    out
}

fn render_table(table: &Table) -> String {
    if table.columns.is_empty() {
        return String::new();
    }

    let mut out = String::new();

    out.push('|');
    for column in &table.columns {
        out.push(' ');
        out.push_str(&column.header);
        out.push_str(" |");
    }
    out.push('\n');

    out.push('|');
    for column in &table.columns {
        out.push_str(match column.align {
            Align::Left => ":------|",
            Align::Center => ":-----:|",
            Align::Right => "------:|",
        });
    }
    out.push('\n');

    for row in &table.rows {
        out.push('|');
        for col in 0..table.columns.len() {
            out.push(' ');
            out.push_str(table.cell(row, col));
            out.push_str(" |");
        }
        out.push('\n');
    }

    out
}
