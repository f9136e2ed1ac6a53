//! Tabular view of processing results: one sheet per parts table, a
//! spare-parts sheet and a summary sheet.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::model::{ProcessingResult, TableRecord, COLUMN_HEADERS};

/// Longest allowed sheet name, in characters.
pub const MAX_SHEET_NAME: usize = 31;

/// Title characters kept in a sheet name.
const TITLE_CHARS: usize = 20;

pub const SPARE_PARTS_SHEET: &str = "spare_parts";
pub const SUMMARY_SHEET: &str = "processing_summary";

const SPARE_PARTS_HEADERS: [&str; 4] = ["Model", "Quantity", "Part Number", "Description"];
const SUMMARY_HEADERS: [&str; 6] = [
    "Model",
    "Status",
    "Spare_Parts_Count",
    "Tables_Count",
    "Images_Count",
    "Table_Details",
];

fn non_word() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^\w\s]").unwrap())
}

fn whitespace_run() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s+").unwrap())
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Base sheet name for a table, before de-duplication.
///
/// `{model}_P{page}_{title}` with the title stripped of punctuation, spaces
/// turned into `_` and cut to 20 characters; `{model}_Page_{page}` when the
/// table has no title. Capped at 31 characters.
pub fn table_sheet_name(table: &TableRecord) -> String {
    let title = table.title.trim();
    let cleaned = whitespace_run()
        .replace_all(&non_word().replace_all(title, ""), "_")
        .to_string();

    let name = if cleaned.is_empty() {
        format!("{}_Page_{}", table.model, table.page)
    } else {
        format!(
            "{}_P{}_{}",
            table.model,
            table.page,
            truncate_chars(&cleaned, TITLE_CHARS)
        )
    };
    truncate_chars(&name, MAX_SHEET_NAME)
}

/// One named grid of cells with a header row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn new<S: Into<String>>(name: impl Into<String>, headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.into(),
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// All sheets produced from a batch of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workbook {
    /// One sheet per parts table, in result order
    pub tables: Vec<Sheet>,
    pub spare_parts: Sheet,
    pub summary: Sheet,
}

impl Workbook {
    /// Build the workbook for a set of results.
    pub fn from_results(results: &[ProcessingResult]) -> Self {
        let mut used = HashSet::new();
        let mut tables = Vec::new();
        let mut spare_parts = Sheet::new(SPARE_PARTS_SHEET, SPARE_PARTS_HEADERS);
        let mut summary = Sheet::new(SUMMARY_SHEET, SUMMARY_HEADERS);

        for result in results {
            for table in &result.tables {
                let name = unique_name(&table_sheet_name(table), &mut used);
                log::debug!("Sheet '{}' ({} rows)", name, table.row_count());
                let mut sheet = Sheet::new(name, COLUMN_HEADERS);
                for row in &table.rows {
                    sheet.push_row(row.to_vec());
                }
                tables.push(sheet);
            }

            for entry in &result.spare_parts {
                spare_parts.push_row(vec![
                    entry.model.clone(),
                    entry.quantity.clone(),
                    entry.part_number.clone(),
                    entry.description.clone(),
                ]);
            }

            let s = result.summary();
            summary.push_row(vec![
                s.model,
                s.status,
                s.spare_parts_count.to_string(),
                s.tables_count.to_string(),
                s.images_count.to_string(),
                s.table_details,
            ]);
        }

        Self {
            tables,
            spare_parts,
            summary,
        }
    }

    /// Every sheet: tables first, then spare parts and summary.
    pub fn sheets(&self) -> impl Iterator<Item = &Sheet> {
        self.tables
            .iter()
            .chain(std::iter::once(&self.spare_parts))
            .chain(std::iter::once(&self.summary))
    }
}

/// Make `base` unique among `used` by appending `_2`, `_3`, ... while
/// staying within the name length limit.
fn unique_name(base: &str, used: &mut HashSet<String>) -> String {
    if used.insert(base.to_string()) {
        return base.to_string();
    }
    let mut n = 2;
    loop {
        let suffix = format!("_{}", n);
        let keep = MAX_SHEET_NAME.saturating_sub(suffix.chars().count());
        let candidate = format!("{}{}", truncate_chars(base, keep), suffix);
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
