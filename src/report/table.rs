//! Plain table formatter
//!
//! Renders the report document as width-aligned terminal tables. Column
//! widths are computed from the widest cell; alignment hints pad the cell
//! text left, right, or centered.

use crate::domain::ProjectDiff;

use super::document::{Align, Document, Section, SectionBody, Table};
use super::sections::build_document;
use super::{Formatter, ReportOptions, NO_CHANGES_MESSAGE};

/// Formats project diffs as aligned plain-text tables
pub struct PlainTableFormatter {
    options: ReportOptions,
}

impl PlainTableFormatter {
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }
}

impl Formatter for PlainTableFormatter {
    fn format(&self, diff: &ProjectDiff) -> String {
        if diff.is_empty() {
            return NO_CHANGES_MESSAGE.to_string();
        }

        let doc = build_document(diff, &self.options);
        render_document(&doc)
    }
}

fn render_document(doc: &Document) -> String {
    let mut out = String::new();

    if !doc.title.is_empty() {
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
        out.push_str(&section.title);
        out.push('\n');
        out.push_str(&"-".repeat(section.title.chars().count()));
        out.push('\n');
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

    // Width of each column: widest of header and cells
    let mut widths: Vec<usize> = table
        .columns
        .iter()
        .map(|c| c.header.chars().count())
        .collect();
    for row in &table.rows {
        for (col, width) in widths.iter_mut().enumerate() {
            *width = (*width).max(table.cell(row, col).chars().count());
        }
    }

    let mut out = String::new();

    let headers: Vec<String> = table
        .columns
        .iter()
        .enumerate()
        .map(|(col, c)| pad(&c.header, widths[col], Align::Left))
        .collect();
    out.push_str(headers.join("  ").trim_end());
    out.push('\n');

    let rules: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rules.join("  "));
    out.push('\n');

    for row in &table.rows {
        let cells: Vec<String> = table
            .columns
            .iter()
            .enumerate()
            .map(|(col, c)| pad(table.cell(row, col), widths[col], c.align))
            .collect();
        out.push_str(cells.join("  ").trim_end());
        out.push('\n');
    }

    out
}

fn pad(text: &str, width: usize, align: Align) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    let fill = width - len;
    match align {
        Align::Left => format!("{}{}", text, " ".repeat(fill)),
        Align::Right => format!("{}{}", " ".repeat(fill), text),
        Align::Center => {
            let left = fill / 2;
            format!("{}{}{}", " ".repeat(left), text, " ".repeat(fill - left))
        }
    }
}
