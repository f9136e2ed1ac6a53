//! # partscan
//!
//! Structured data extraction from equipment parts-manual PDFs.
//!
//! A parts manual opens its catalog with a "SUGGESTED SPARE PARTS" page.
//! partscan finds that page, reads the spare-parts list from it, then walks
//! every later page and decides whether it is a parts table (assembled into
//! fixed five-column rows), an exploded-view diagram (embedded images saved
//! and dense line-art rendered to PNG), or filler to skip.
//!
//! ## Quick Start
//!
//! ```no_run
//! use partscan::Partscan;
//!
//! fn main() -> partscan::Result<()> {
//!     let scan = Partscan::new("output");
//!     let result = scan.process_file("manuals/WM63SLF-parts.pdf");
//!     println!("{}: {} tables", result.model, result.tables.len());
//!
//!     scan.write_outputs(&[result], partscan::JsonFormat::Pretty)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Page classification**: header keywords and numbered-row shapes
//! - **Row assembly**: wrapped catalog entries merged into one row
//! - **Image artifacts**: embedded images and rasterized vector diagrams
//! - **Outputs**: per-table CSV sheets, spare-parts and summary sheets, JSON
//! - **Parallel processing**: Uses Rayon across documents

pub mod detect;
pub mod error;
pub mod extract;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use detect::{collect_inputs, find_manuals, PdfHeader};
pub use error::{Error, Result};
pub use extract::{
    model_code, ArtifactSink, ClassificationReport, ExtractOptions, Extractor, FsSink, MemorySink,
};
pub use model::{
    ArtifactOrigin, Classification, ExtractedImageRef, PageIndex, PageKind, ProcessingResult,
    Row, SparePartEntry, Status, TableRecord,
};
pub use parser::{LopdfBackend, MemoryDocument, MemoryPage, PdfBackend};
pub use render::{JsonFormat, Workbook};

use std::fs;
use std::path::{Path, PathBuf};

/// File receiving the serialized results.
pub const RESULTS_FILE: &str = "results.json";

/// Process a single manual, writing images under `output_dir`.
///
/// # Example
///
/// ```no_run
/// let result = partscan::process_file("WM63SLF.pdf", "output");
/// assert!(result.status.is_success());
/// ```
pub fn process_file<P: AsRef<Path>, O: AsRef<Path>>(path: P, output_dir: O) -> ProcessingResult {
    Partscan::new(output_dir.as_ref()).process_file(path)
}

/// Classify every page of a manual without writing anything.
pub fn classify_file<P: AsRef<Path>>(path: P) -> Result<ClassificationReport> {
    classify_file_with_options(path, ExtractOptions::default())
}

/// Classify every page of a manual with custom options.
pub fn classify_file_with_options<P: AsRef<Path>>(
    path: P,
    options: ExtractOptions,
) -> Result<ClassificationReport> {
    let path = path.as_ref();
    let backend = LopdfBackend::open(path)?;
    let model = extract::model_from_path(path);
    Ok(Extractor::new(options).classify_document(&backend, &model))
}

/// Builder for batch extraction into an output directory.
///
/// # Example
///
/// ```no_run
/// use partscan::Partscan;
/// use std::path::PathBuf;
///
/// let scan = Partscan::new("output")
///     .with_dense_threshold(80)
///     .with_render_scale(4.0);
/// let paths = vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")];
/// let results = scan.process_all(&paths);
/// scan.write_outputs(&results, partscan::JsonFormat::Compact)?;
/// # Ok::<(), partscan::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Partscan {
    options: ExtractOptions,
    output_dir: PathBuf,
}

impl Partscan {
    /// Create a builder writing to `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            options: ExtractOptions::default(),
            output_dir: output_dir.into(),
        }
    }

    /// Replace all extraction options.
    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the spare-parts marker phrase.
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.options = self.options.with_marker(marker);
        self
    }

    /// Set the drawing count above which diagram pages are rendered.
    pub fn with_dense_threshold(mut self, threshold: usize) -> Self {
        self.options = self.options.with_dense_threshold(threshold);
        self
    }

    /// Set the diagram rendering magnification.
    pub fn with_render_scale(mut self, scale: f32) -> Self {
        self.options = self.options.with_render_scale(scale);
        self
    }

    /// Set the minimum embedded image size in pixels.
    pub fn with_min_image_size(mut self, pixels: u32) -> Self {
        self.options = self.options.with_min_image_size(pixels);
        self
    }

    /// Enable or disable image artifacts.
    pub fn with_images(mut self, extract: bool) -> Self {
        self.options = self.options.with_images(extract);
        self
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn sink(&self) -> FsSink {
        FsSink::new(&self.output_dir)
    }

    /// Process one manual.
    pub fn process_file<P: AsRef<Path>>(&self, path: P) -> ProcessingResult {
        extract::process_file(path, &self.sink(), &self.options)
    }

    /// Process many manuals in parallel; results follow input order.
    pub fn process_all(&self, paths: &[PathBuf]) -> Vec<ProcessingResult> {
        extract::process_batch(paths, &self.sink(), &self.options)
    }

    /// Like [`Partscan::process_all`], reporting each finished document.
    pub fn process_all_with<F>(&self, paths: &[PathBuf], on_done: F) -> Vec<ProcessingResult>
    where
        F: Fn(&ProcessingResult) + Sync,
    {
        extract::process_batch_with(paths, &self.sink(), &self.options, on_done)
    }

    /// Write CSV sheets and `results.json` for `results`.
    ///
    /// Returns every file written.
    pub fn write_outputs(&self, results: &[ProcessingResult], format: JsonFormat) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.output_dir)?;

        let book = Workbook::from_results(results);
        let mut written = render::write_workbook(&self.output_dir, &book)?;

        let json_path = self.output_dir.join(RESULTS_FILE);
        fs::write(&json_path, render::to_json(results, format)?)?;
        written.push(json_path);

        Ok(written)
    }
}

impl Default for Partscan {
    fn default() -> Self {
        Self::new("output")
    }
}
