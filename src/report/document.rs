//! Abstract document model
//!
//! Formatters assemble diff results into this structure; rendering
//! backends (markdown, plain tables) only ever consume it. Rows shorter
//! than the column count are padded with "-" at render time.

/// Placeholder for missing cells
pub const EMPTY_CELL: &str = "-";

/// Text alignment hint for a table column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// A column definition: header plus alignment hint
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub header: String,
    pub align: Align,
}

impl Column {
    pub fn new(header: impl Into<String>, align: Align) -> Self {
        Self {
            header: header.into(),
            align,
        }
    }
}

/// A generic table of aligned columns and display-string rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the cell at (row, col), padded with the placeholder when the
    /// row is shorter than the column count
    pub fn cell<'a>(&'a self, row: &'a [String], col: usize) -> &'a str {
        row.get(col).map(String::as_str).unwrap_or(EMPTY_CELL)
    }
}

/// A titled section holding either free text or a table
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: String,
    pub body: SectionBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SectionBody {
    Text(String),
    Table(Table),
}

impl Section {
    pub fn text(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: SectionBody::Text(text.into()),
        }
    }

    pub fn table(title: impl Into<String>, table: Table) -> Self {
        Self {
            title: title.into(),
            body: SectionBody::Table(table),
        }
    }
}

/// A titled, ordered sequence of sections
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub title: String,
    pub sections: Vec<Section>,
}

impl Document {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sections: Vec::new(),
        }
    }

    pub fn push_section(&mut self, section: Section) {
        self.sections.push(section);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_rows_pad_with_placeholder() {
        let mut table = Table::new(vec![
            Column::new("A", Align::Left),
            Column::new("B", Align::Right),
            Column::new("C", Align::Center),
        ]);
        table.push_row(vec!["x".to_string()]);

        let row = &table.rows[0];
        assert_eq!(table.cell(row, 0), "x");
        assert_eq!(table.cell(row, 1), EMPTY_CELL);
        assert_eq!(table.cell(row, 2), EMPTY_CELL);
    }

    #[test]
    fn document_accumulates_sections() {
        let mut doc = Document::new("Report");
        doc.push_section(Section::text("Notes", "nothing to report"));
        doc.push_section(Section::table("Data", Table::default()));

        assert_eq!(doc.sections.len(), 2);
        assert!(matches!(doc.sections[0].body, SectionBody::Text(_)));
        assert!(matches!(doc.sections[1].body, SectionBody::Table(_)));
    }
}
