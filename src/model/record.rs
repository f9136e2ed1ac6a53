//! Extracted catalog records: table rows and spare-parts entries.

use serde::{Deserialize, Serialize};

/// Number of columns in every parts-table row.
pub const ROW_WIDTH: usize = 5;

/// Column titles of a parts-table row, in order.
pub const COLUMN_HEADERS: [&str; ROW_WIDTH] = ["No.", "Part No.", "Part Name", "Qty", "Remarks"];

/// A parts-table row with exactly five fields.
///
/// Fields are positional: `No.`, `Part No.`, `Part Name`, `Qty`, `Remarks`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row([String; ROW_WIDTH]);

impl Row {
    /// Build a row from split fields.
    ///
    /// Short inputs are right-padded with empty strings; longer inputs keep
    /// their first five fields and drop the rest.
    pub fn from_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row = Row::default();
        for (slot, field) in row.0.iter_mut().zip(fields) {
            *slot = field.into();
        }
        row
    }

    /// All five fields.
    pub fn fields(&self) -> &[String; ROW_WIDTH] {
        &self.0
    }

    /// Item number column.
    pub fn number(&self) -> &str {
        &self.0[0]
    }

    /// Part number column.
    pub fn part_number(&self) -> &str {
        &self.0[1]
    }

    /// Part name column.
    pub fn part_name(&self) -> &str {
        &self.0[2]
    }

    /// Quantity column.
    pub fn quantity(&self) -> &str {
        &self.0[3]
    }

    /// Remarks column.
    pub fn remarks(&self) -> &str {
        &self.0[4]
    }

    /// Fields as owned strings, for tabular writers.
    pub fn to_vec(&self) -> Vec<String> {
        self.0.to_vec()
    }
}

impl From<Row> for Vec<String> {
    fn from(row: Row) -> Self {
        row.0.into()
    }
}

/// A parts table extracted from one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRecord {
    /// 1-based page number
    pub page: u32,
    /// Model identifier of the document
    pub model: String,
    /// Detected page title (may be empty)
    pub title: String,
    /// Rows in page order
    pub rows: Vec<Row>,
}

impl TableRecord {
    /// Create a table record.
    pub fn new(page: u32, model: impl Into<String>, title: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            page,
            model: model.into(),
            title: title.into(),
            rows,
        }
    }

    /// The detected title, or `"Page N"` when none was found.
    pub fn display_title(&self) -> String {
        if self.title.trim().is_empty() {
            format!("Page {}", self.page)
        } else {
            self.title.clone()
        }
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One line of a "suggested spare parts" summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SparePartEntry {
    /// Model identifier of the document
    pub model: String,
    /// Quantity as printed
    pub quantity: String,
    /// Part number as printed
    pub part_number: String,
    /// Description (remaining columns joined by spaces)
    pub description: String,
}

impl SparePartEntry {
    /// Create a spare-parts entry.
    pub fn new(
        model: impl Into<String>,
        quantity: impl Into<String>,
        part_number: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            quantity: quantity.into(),
            part_number: part_number.into(),
            description: description.into(),
        }
    }
}
