//! Row assembly for parts-table pages.
//!
//! Table text arrives line by line, and a single catalog entry may wrap over
//! several lines. A numbered line opens a new row; unnumbered lines extend
//! the open row. The pending fragments live in a [`RowBuffer`] that is passed
//! into and returned from every [`RowAssembler::step`], so the assembler
//! itself holds no per-page state.

use regex::Regex;
use std::sync::OnceLock;

use crate::model::{Row, TableRecord};

use super::columns::{split_columns, starts_with_digit};
use super::ExtractOptions;

/// Dash-decorated page numbers such as `- 12 -` or `— 7`.
///
/// A bare `12` is not matched: it is an item number whose fields wrapped.
fn page_number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[-–—]+\s*\d+\s*[-–—]*$").unwrap())
}

/// Fragments of the row currently being built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowBuffer {
    fragments: Vec<String>,
}

impl RowBuffer {
    /// An empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no row is open.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Buffered fragments, oldest first.
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    fn start(line: &str) -> Self {
        Self {
            fragments: vec![line.to_string()],
        }
    }

    fn push(&mut self, line: &str) {
        self.fragments.push(line.to_string());
    }

    fn joined(&self) -> String {
        self.fragments.join(" ")
    }
}

/// How a single line was interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRole {
    /// Empty line
    Blank,
    /// Column header line
    Header,
    /// The page title
    Title,
    /// Page number, or a running header/footer seen while no row is open
    Boilerplate,
    /// Numbered line opening a new row
    RowStart,
    /// Line appended to the open row
    Continuation,
    /// Unnumbered line with no open row
    Orphan,
}

/// Per-page facts the line filter needs.
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    /// Model code of the document (lines starting with it are running headers)
    pub model: &'a str,
    /// Detected title of the page (empty when none)
    pub title: &'a str,
}

/// Result of feeding one line to the assembler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Buffer to pass to the next step
    pub buffer: RowBuffer,
    /// Row completed by this line, if any
    pub completed: Option<Row>,
    /// How the line was interpreted
    pub role: LineRole,
}

/// Rows and title assembled from one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssembledPage {
    pub title: String,
    pub rows: Vec<Row>,
}

/// Turns table-page lines into fixed-width rows.
#[derive(Debug, Clone)]
pub struct RowAssembler {
    header_keywords: Vec<String>,
    boilerplate_words: Vec<String>,
    min_row_fields: usize,
    title_scan_lines: usize,
    min_title_len: usize,
}

impl RowAssembler {
    /// Create an assembler from extraction options.
    pub fn new(options: &ExtractOptions) -> Self {
        let mut header_keywords: Vec<String> = options
            .header_keywords
            .iter()
            .map(|k| k.to_uppercase())
            .collect();
        // Longest first, so "PART NO." is consumed before "NO.".
        header_keywords.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        Self {
            header_keywords,
            boilerplate_words: options
                .boilerplate_words
                .iter()
                .map(|w| w.to_uppercase())
                .collect(),
            min_row_fields: options.min_row_fields.max(1),
            title_scan_lines: options.title_scan_lines,
            min_title_len: options.min_title_len,
        }
    }

    /// Assemble a table record for a page.
    pub fn assemble_page(&self, page: u32, model: &str, text: &str) -> TableRecord {
        let assembled = self.assemble_lines(text.lines(), model);
        TableRecord::new(page, model, assembled.title, assembled.rows)
    }

    /// Detect the title and assemble rows from raw lines.
    pub fn assemble_lines<'l, I>(&self, lines: I, model: &str) -> AssembledPage
    where
        I: IntoIterator<Item = &'l str>,
    {
        let lines: Vec<&str> = lines.into_iter().collect();
        let title = self.detect_title(&lines, model).unwrap_or_default();
        let ctx = PageContext {
            model,
            title: &title,
        };

        let mut rows = Vec::new();
        let mut buffer = RowBuffer::new();
        for line in &lines {
            let step = self.step(buffer, line, &ctx);
            log::trace!("{:?}: {}", step.role, line.trim());
            if let Some(row) = step.completed {
                rows.push(row);
            }
            buffer = step.buffer;
        }
        if let Some(row) = self.flush(&buffer) {
            rows.push(row);
        }

        log::debug!("Assembled {} rows (title: {:?})", rows.len(), title);
        AssembledPage { title, rows }
    }

    /// Feed one line to the state machine.
    pub fn step(&self, mut buffer: RowBuffer, line: &str, ctx: &PageContext<'_>) -> Step {
        let role = self.line_role(line, ctx, buffer.is_empty());
        let line = line.trim();

        let completed = match role {
            LineRole::RowStart => {
                let completed = self.flush(&buffer);
                buffer = RowBuffer::start(line);
                completed
            }
            LineRole::Continuation => {
                buffer.push(line);
                None
            }
            _ => None,
        };

        Step {
            buffer,
            completed,
            role,
        }
    }

    /// Turn buffered fragments into a row, or `None` if they lack structure.
    pub fn flush(&self, buffer: &RowBuffer) -> Option<Row> {
        if buffer.is_empty() {
            return None;
        }
        let joined = buffer.joined();
        let fields = split_columns(&joined);
        if fields.len() < self.min_row_fields {
            log::debug!("Discarding row with {} field(s): {}", fields.len(), joined);
            return None;
        }
        Some(Row::from_fields(fields))
    }

    /// Classify a line for the state machine.
    pub fn line_role(&self, line: &str, ctx: &PageContext<'_>, buffer_empty: bool) -> LineRole {
        let line = line.trim();
        if line.is_empty() {
            return LineRole::Blank;
        }
        if self.is_header_line(line) {
            return LineRole::Header;
        }
        if !ctx.title.is_empty() && line.to_uppercase() == ctx.title.to_uppercase() {
            return LineRole::Title;
        }
        if page_number_pattern().is_match(line) {
            return LineRole::Boilerplate;
        }
        if starts_with_digit(line) {
            return LineRole::RowStart;
        }
        if !buffer_empty {
            return LineRole::Continuation;
        }
        if self.is_boilerplate(line, ctx.model) {
            LineRole::Boilerplate
        } else {
            LineRole::Orphan
        }
    }

    /// Pick the page title from the first non-empty lines.
    ///
    /// The title is the first line longer than the minimum length that is
    /// not boilerplate or a header line. Only lines above the first numbered
    /// row are considered.
    pub fn detect_title(&self, lines: &[&str], model: &str) -> Option<String> {
        lines
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .take(self.title_scan_lines)
            .take_while(|l| !starts_with_digit(l))
            .find(|l| {
                l.chars().count() > self.min_title_len
                    && !self.is_header_line(l)
                    && !page_number_pattern().is_match(l)
                    && !self.is_boilerplate(l, model)
            })
            .map(str::to_string)
    }

    /// Whether a line consists only of column header keywords.
    pub fn is_header_line(&self, line: &str) -> bool {
        let mut rest = line.to_uppercase();
        let mut matched = false;
        for keyword in &self.header_keywords {
            if rest.contains(keyword.as_str()) {
                matched = true;
                rest = rest.replace(keyword.as_str(), " ");
            }
        }
        matched && rest.trim_matches(|c: char| c == '.' || c.is_whitespace()).is_empty()
    }

    /// Whether a line is a running header/footer or page label.
    pub fn is_boilerplate(&self, line: &str, model: &str) -> bool {
        let upper = line.to_uppercase();
        if !model.is_empty() && upper.starts_with(&model.to_uppercase()) {
            return true;
        }
        upper
            .split(|c: char| !(c.is_alphanumeric() || c == '.'))
            .map(|token| token.trim_end_matches('.'))
            .filter(|token| !token.is_empty())
            .any(|token| {
                self.boilerplate_words
                    .iter()
                    .any(|w| w.trim_end_matches('.') == token)
            })
    }
}

impl Default for RowAssembler {
    fn default() -> Self {
        Self::new(&ExtractOptions::default())
    }
}
