//! Page classification verdicts.

use serde::{Deserialize, Serialize};

/// What kind of content a page holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    /// A parts table
    Table,
    /// A diagram or illustration
    Diagram,
    /// Blank or transition page
    Skip,
}

impl std::fmt::Display for PageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageKind::Table => write!(f, "table"),
            PageKind::Diagram => write!(f, "diagram"),
            PageKind::Skip => write!(f, "skip"),
        }
    }
}

/// Counts that produced a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Evidence {
    /// Column-header tokens present in the page text
    pub header_hits: usize,
    /// Lines shaped like numbered catalog rows
    pub data_row_hits: usize,
    /// Vector drawing primitives on the page
    pub drawing_count: usize,
    /// Non-whitespace characters in the page text
    pub text_length: usize,
}

/// A classification verdict together with its evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub kind: PageKind,
    pub evidence: Evidence,
}

impl Classification {
    /// Create a classification.
    pub fn new(kind: PageKind, evidence: Evidence) -> Self {
        Self { kind, evidence }
    }

    pub fn is_table(&self) -> bool {
        self.kind == PageKind::Table
    }

    pub fn is_diagram(&self) -> bool {
        self.kind == PageKind::Diagram
    }

    pub fn is_skip(&self) -> bool {
        self.kind == PageKind::Skip
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let e = &self.evidence;
        write!(
            f,
            "{} ({} headers, {} data rows, {} drawings, {} chars)",
            self.kind, e.header_hits, e.data_row_hits, e.drawing_count, e.text_length
        )
    }
}
