//! Spare-parts entries from the anchor page.
//!
//! Each entry is read from a single line. Lines that wrap are not merged.

use regex::Regex;
use std::sync::OnceLock;

use crate::model::SparePartEntry;

use super::columns::split_columns;
use super::ExtractOptions;

fn entry_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d+.*[A-Z0-9\-]{5,}.*[A-Za-z]").unwrap())
}

/// Reads quantity / part number / description lines.
#[derive(Debug, Clone)]
pub struct SparePartsReader {
    min_line_len: usize,
    min_fields: usize,
}

impl SparePartsReader {
    pub fn new(options: &ExtractOptions) -> Self {
        Self {
            min_line_len: options.min_spare_part_line_len,
            min_fields: options.min_spare_part_fields.max(2),
        }
    }

    /// Extract every entry on the page, in line order.
    pub fn read(&self, text: &str, model: &str) -> Vec<SparePartEntry> {
        let entries: Vec<_> = text
            .lines()
            .filter_map(|line| self.read_line(line, model))
            .collect();
        log::debug!("Extracted {} spare parts entries", entries.len());
        entries
    }

    /// Parse a single line, or `None` if it is not an entry.
    pub fn read_line(&self, line: &str, model: &str) -> Option<SparePartEntry> {
        let line = line.trim();
        if line.chars().count() < self.min_line_len || !entry_pattern().is_match(line) {
            return None;
        }

        let mut fields = split_columns(line).into_iter();
        let quantity = fields.next()?;
        let part_number = fields.next()?;
        let rest: Vec<String> = fields.collect();
        if rest.len() + 2 < self.min_fields {
            return None;
        }

        Some(SparePartEntry::new(model, quantity, part_number, rest.join(" ")))
    }
}

impl Default for SparePartsReader {
    fn default() -> Self {
        Self::new(&ExtractOptions::default())
    }
}
