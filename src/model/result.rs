//! Per-document processing results.

use serde::{Deserialize, Serialize};

use super::{Classification, ExtractedImageRef, SparePartEntry, TableRecord};

/// Outcome of processing one document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "detail", rename_all = "lowercase")]
pub enum Status {
    /// Processing has not finished
    #[default]
    Pending,
    /// The whole document was walked
    Success,
    /// The document could not be opened or read
    Error(String),
}

impl Status {
    pub fn is_success(&self) -> bool {
        matches!(self, Status::Success)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Status::Error(_))
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Pending => write!(f, "pending"),
            Status::Success => write!(f, "success"),
            Status::Error(detail) => write!(f, "error: {}", detail),
        }
    }
}

/// What happened to a single page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum PageVerdict {
    /// The page holding the spare-parts marker
    Anchor {
        /// Number of spare-parts entries found on it
        entries: usize,
    },
    /// The page was classified and handled accordingly
    Classified { classification: Classification },
    /// The page could not be read and was skipped
    Fault { detail: String },
}

/// Diagnostic record for one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageReport {
    /// 1-based page number
    pub page: u32,
    #[serde(flatten)]
    pub verdict: PageVerdict,
}

/// Everything extracted from one document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProcessingResult {
    /// Model identifier derived from the file name
    pub model: String,
    /// Source file name, if the document came from a file
    pub source: Option<String>,
    /// Entries of the suggested spare-parts list
    pub spare_parts: Vec<SparePartEntry>,
    /// Parts tables, one per table page
    pub tables: Vec<TableRecord>,
    /// Persisted image artifacts
    pub images: Vec<ExtractedImageRef>,
    /// Per-page diagnostics
    pub pages: Vec<PageReport>,
    /// Final status
    pub status: Status,
}

impl ProcessingResult {
    /// Create an empty, pending result for `model`.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Create a result for a document that could not be opened.
    pub fn failed(model: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            status: Status::Error(detail.into()),
            ..Default::default()
        }
    }

    /// Set the source file name.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Number of pages that were skipped because of read faults.
    pub fn fault_count(&self) -> usize {
        self.pages
            .iter()
            .filter(|p| matches!(p.verdict, PageVerdict::Fault { .. }))
            .count()
    }

    /// Aggregate counts for the summary sheet.
    pub fn summary(&self) -> ProcessingSummary {
        ProcessingSummary {
            model: self.model.clone(),
            status: self.status.to_string(),
            spare_parts_count: self.spare_parts.len(),
            tables_count: self.tables.len(),
            images_count: self.images.len(),
            table_details: self
                .tables
                .iter()
                .map(|t| format!("Page {}: {}", t.page, t.display_title()))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Aggregate counts for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingSummary {
    pub model: String,
    pub status: String,
    pub spare_parts_count: usize,
    pub tables_count: usize,
    pub images_count: usize,
    /// `"Page N: title"` for every table, comma separated
    pub table_details: String,
}
