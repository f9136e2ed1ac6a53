//! Extraction thresholds and switches.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Smallest magnification used when rasterizing diagram pages.
pub const MIN_RENDER_SCALE: f32 = 2.0;

/// Tunable heuristics for classification and extraction.
///
/// Every threshold used by the engine lives here. Options can be loaded from
/// a (partial) JSON file; missing keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Marker phrase that opens the spare-parts section
    pub spare_parts_marker: String,

    /// Pages with fewer non-whitespace characters are skipped
    pub min_text_chars: usize,

    /// Column-header tokens used for detection and header filtering
    pub header_keywords: Vec<String>,

    /// Header hits needed to call a page a table
    pub min_header_hits: usize,

    /// Numbered-row hits needed to call a page a table
    pub min_data_row_hits: usize,

    /// Only the first N lines are scanned for numbered rows (`None` = all)
    pub classify_scan_lines: Option<usize>,

    /// Minimum non-empty fields for an assembled table row
    pub min_row_fields: usize,

    /// Non-empty lines searched for a page title
    pub title_scan_lines: usize,

    /// A title must be longer than this many characters
    pub min_title_len: usize,

    /// Words marking running header/footer lines (matched upper-case)
    pub boilerplate_words: Vec<String>,

    /// Spare-parts lines shorter than this are ignored
    pub min_spare_part_line_len: usize,

    /// Minimum non-empty fields for a spare-parts entry
    pub min_spare_part_fields: usize,

    /// Embedded images must exceed this width and height in pixels
    pub min_image_size: u32,

    /// Drawing count above which the whole page is rendered
    pub dense_drawing_threshold: usize,

    /// Drawing count above which a page is reported as a near-miss diagram
    pub diagram_hint_threshold: usize,

    /// Magnification for whole-page renderings (at least 2.0)
    pub render_scale: f32,

    /// Whether image artifacts are persisted at all
    pub extract_images: bool,
}

impl ExtractOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a JSON file, filling gaps with defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&data)
    }

    /// Parse options from JSON text, filling gaps with defaults.
    pub fn from_json_str(data: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(data)
            .map_err(|e| Error::Config(format!("invalid options JSON: {}", e)))?;
        options.validated()
    }

    /// Check cross-field constraints and normalize values.
    pub fn validated(mut self) -> Result<Self> {
        if self.spare_parts_marker.trim().is_empty() {
            return Err(Error::Config("spare_parts_marker must not be empty".to_string()));
        }
        if self.diagram_hint_threshold > self.dense_drawing_threshold {
            return Err(Error::Config(format!(
                "diagram_hint_threshold ({}) exceeds dense_drawing_threshold ({})",
                self.diagram_hint_threshold, self.dense_drawing_threshold
            )));
        }
        if !self.render_scale.is_finite() {
            return Err(Error::Config("render_scale must be a finite number".to_string()));
        }
        self.render_scale = self.render_scale.max(MIN_RENDER_SCALE);
        self.spare_parts_marker = self.spare_parts_marker.to_uppercase();
        self.header_keywords = self
            .header_keywords
            .iter()
            .map(|k| k.to_uppercase())
            .collect();
        self.boilerplate_words = self
            .boilerplate_words
            .iter()
            .map(|k| k.to_uppercase())
            .collect();
        Ok(self)
    }

    /// Set the spare-parts marker phrase.
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.spare_parts_marker = marker.into().to_uppercase();
        self
    }

    /// Set the minimum text length below which pages are skipped.
    pub fn with_min_text_chars(mut self, chars: usize) -> Self {
        self.min_text_chars = chars;
        self
    }

    /// Set the drawing count above which pages are rendered.
    ///
    /// The hint threshold is lowered if it would exceed the new value.
    pub fn with_dense_threshold(mut self, threshold: usize) -> Self {
        self.dense_drawing_threshold = threshold;
        self.diagram_hint_threshold = self.diagram_hint_threshold.min(threshold);
        self
    }

    /// Set the minimum embedded image size.
    pub fn with_min_image_size(mut self, pixels: u32) -> Self {
        self.min_image_size = pixels;
        self
    }

    /// Set the render magnification (clamped to at least 2.0).
    pub fn with_render_scale(mut self, scale: f32) -> Self {
        self.render_scale = if scale.is_finite() {
            scale.max(MIN_RENDER_SCALE)
        } else {
            MIN_RENDER_SCALE
        };
        self
    }

    /// Scan all lines for numbered rows instead of the first few.
    pub fn scan_all_lines(mut self) -> Self {
        self.classify_scan_lines = None;
        self
    }

    /// Enable or disable image persistence.
    pub fn with_images(mut self, extract: bool) -> Self {
        self.extract_images = extract;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            spare_parts_marker: "SUGGESTED SPARE PARTS".to_string(),
            min_text_chars: 100,
            header_keywords: ["NO.", "PART NO.", "PART NAME", "QTY", "REMARKS"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            min_header_hits: 2,
            min_data_row_hits: 3,
            classify_scan_lines: Some(15),
            min_row_fields: 2,
            title_scan_lines: 10,
            min_title_len: 5,
            boilerplate_words: ["PAGE", "MANUAL", "REV."]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            min_spare_part_line_len: 10,
            min_spare_part_fields: 3,
            min_image_size: 50,
            dense_drawing_threshold: 100,
            diagram_hint_threshold: 50,
            render_scale: 3.0,
            extract_images: true,
        }
    }
}
