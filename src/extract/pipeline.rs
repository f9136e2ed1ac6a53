//! Per-document extraction pipeline.
//!
//! The pipeline finds the anchor page, reads the spare-parts entries from it,
//! then walks every following page once: classify it, assemble its table or
//! extract its images, and fold the outcome into the result.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::model::{
    Classification, ExtractedImageRef, PageIndex, PageKind, PageReport, PageVerdict,
    ProcessingResult, SparePartEntry, Status, TableRecord,
};
use crate::parser::{LopdfBackend, PdfBackend};

use super::anchor::locate_anchor;
use super::classify::PageClassifier;
use super::diagram::DiagramExtractor;
use super::model_id::model_from_path;
use super::rows::RowAssembler;
use super::sink::ArtifactSink;
use super::spare_parts::SparePartsReader;
use super::ExtractOptions;

/// What happened to one page after the anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// The page was classified as a table or diagram and handled
    Processed {
        classification: Classification,
        /// Assembled table, if the page was a table and yielded rows
        table: Option<TableRecord>,
        /// Persisted artifacts, if the page was a diagram
        images: Vec<ExtractedImageRef>,
    },
    /// The page had too little text to classify
    Skipped { classification: Classification },
    /// The page could not be read
    Fault { detail: String },
}

/// Folds page outcomes into a [`ProcessingResult`].
///
/// Entries are only ever appended.
#[derive(Debug)]
pub struct ResultAggregator {
    result: ProcessingResult,
}

impl ResultAggregator {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            result: ProcessingResult::new(model),
        }
    }

    /// Record the anchor page and its spare-parts entries.
    pub fn absorb_anchor(&mut self, page: PageIndex, entries: Vec<SparePartEntry>) {
        self.result.pages.push(PageReport {
            page: page.number(),
            verdict: PageVerdict::Anchor {
                entries: entries.len(),
            },
        });
        self.result.spare_parts.extend(entries);
    }

    /// Record the outcome of a page after the anchor.
    pub fn absorb(&mut self, page: PageIndex, outcome: PageOutcome) {
        let verdict = match outcome {
            PageOutcome::Processed {
                classification,
                table,
                images,
            } => {
                self.result.tables.extend(table);
                self.result.images.extend(images);
                PageVerdict::Classified { classification }
            }
            PageOutcome::Skipped { classification } => PageVerdict::Classified { classification },
            PageOutcome::Fault { detail } => PageVerdict::Fault { detail },
        };
        self.result.pages.push(PageReport {
            page: page.number(),
            verdict,
        });
    }

    /// Close the document walk with a success status.
    pub fn finish(mut self) -> ProcessingResult {
        self.result.status = Status::Success;
        self.result
    }
}

/// Verdict for every page of a document, without extracting anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub model: String,
    /// 1-based page number of the anchor page, if any
    pub anchor: Option<u32>,
    pub pages: Vec<PageReport>,
}

/// The extraction engine.
///
/// Holds the configured sub-extractors; one instance can process any number
/// of documents, concurrently if needed.
#[derive(Debug, Clone)]
pub struct Extractor {
    options: ExtractOptions,
    classifier: PageClassifier,
    assembler: RowAssembler,
    spare_parts: SparePartsReader,
    diagrams: DiagramExtractor,
}

impl Extractor {
    pub fn new(options: ExtractOptions) -> Self {
        Self {
            classifier: PageClassifier::new(&options),
            assembler: RowAssembler::new(&options),
            spare_parts: SparePartsReader::new(&options),
            diagrams: DiagramExtractor::new(&options),
            options,
        }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Open a PDF file and process it.
    ///
    /// The model code comes from the file name. A file that cannot be opened
    /// yields a result with [`Status::Error`].
    pub fn process_file<P, S>(&self, path: P, sink: &S) -> ProcessingResult
    where
        P: AsRef<Path>,
        S: ArtifactSink + ?Sized,
    {
        let path = path.as_ref();
        let model = model_from_path(path);
        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        log::info!("Processing {} (model {})", path.display(), model);

        let result = match LopdfBackend::open(path) {
            Ok(backend) => {
                log::info!("PDF opened successfully - {} pages", backend.page_count());
                self.process_document(&backend, &model, sink)
            }
            Err(e) => {
                log::warn!("Cannot open {}: {}", path.display(), e);
                ProcessingResult::failed(&model, e.to_string())
            }
        };
        result.with_source(source)
    }

    /// Process an opened document.
    pub fn process_document<B, S>(&self, backend: &B, model: &str, sink: &S) -> ProcessingResult
    where
        B: PdfBackend + ?Sized,
        S: ArtifactSink + ?Sized,
    {
        let mut aggregator = ResultAggregator::new(model);

        let Some(anchor) = locate_anchor(backend, &self.options.spare_parts_marker) else {
            log::info!("{}: no spare-parts section, nothing extracted", model);
            return aggregator.finish();
        };

        let entries = self.spare_parts.read(&anchor.text, model);
        aggregator.absorb_anchor(anchor.page, entries);

        for page in anchor.page.following(backend.page_count()) {
            let outcome = self.process_page(backend, sink, model, page);
            aggregator.absorb(page, outcome);
        }

        let result = aggregator.finish();
        log::info!(
            "{}: {} spare parts, {} tables, {} images, {} faults",
            model,
            result.spare_parts.len(),
            result.tables.len(),
            result.images.len(),
            result.fault_count()
        );
        result
    }

    /// Classify and handle a single page.
    pub fn process_page<B, S>(
        &self,
        backend: &B,
        sink: &S,
        model: &str,
        page: PageIndex,
    ) -> PageOutcome
    where
        B: PdfBackend + ?Sized,
        S: ArtifactSink + ?Sized,
    {
        let (text, classification) = match self.read_and_classify(backend, page) {
            Ok(read) => read,
            Err(detail) => return PageOutcome::Fault { detail },
        };
        log::debug!("{}: {}", page, classification);

        match classification.kind {
            PageKind::Skip => PageOutcome::Skipped { classification },
            PageKind::Table => {
                let record = self.assembler.assemble_page(page.number(), model, &text);
                let table = (!record.is_empty()).then_some(record);
                if table.is_none() {
                    log::debug!("{}: table page produced no rows", page);
                }
                PageOutcome::Processed {
                    classification,
                    table,
                    images: Vec::new(),
                }
            }
            PageKind::Diagram => {
                let images = self.diagrams.extract(
                    backend,
                    sink,
                    model,
                    page,
                    classification.evidence.drawing_count,
                );
                PageOutcome::Processed {
                    classification,
                    table: None,
                    images,
                }
            }
        }
    }

    /// Classify every page of a document without persisting anything.
    pub fn classify_document<B>(&self, backend: &B, model: &str) -> ClassificationReport
    where
        B: PdfBackend + ?Sized,
    {
        let anchor = locate_anchor(backend, &self.options.spare_parts_marker);
        let anchor_page = anchor.as_ref().map(|a| a.page);

        let pages = PageIndex::all(backend.page_count())
            .map(|page| {
                let verdict = if Some(page) == anchor_page {
                    let text = anchor.as_ref().map(|a| a.text.as_str()).unwrap_or_default();
                    PageVerdict::Anchor {
                        entries: self.spare_parts.read(text, model).len(),
                    }
                } else {
                    match self.read_and_classify(backend, page) {
                        Ok((_, classification)) => PageVerdict::Classified { classification },
                        Err(detail) => PageVerdict::Fault { detail },
                    }
                };
                PageReport {
                    page: page.number(),
                    verdict,
                }
            })
            .collect();

        ClassificationReport {
            model: model.to_string(),
            anchor: anchor_page.map(PageIndex::number),
            pages,
        }
    }

    fn read_and_classify<B>(
        &self,
        backend: &B,
        page: PageIndex,
    ) -> std::result::Result<(String, Classification), String>
    where
        B: PdfBackend + ?Sized,
    {
        let text = backend.page_text(page).map_err(|e| {
            log::warn!("{}: skipped, {}", page, e);
            e.to_string()
        })?;

        let drawings = backend.drawing_count(page).map_err(|e| {
            log::warn!("{}: skipped, cannot count drawings: {}", page, e);
            e.to_string()
        })?;

        let classification = self.classifier.classify(&text, drawings);
        Ok((text, classification))
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(ExtractOptions::default())
    }
}

/// Process an opened document with the given options.
pub fn process_document<B, S>(
    backend: &B,
    model: &str,
    sink: &S,
    options: &ExtractOptions,
) -> ProcessingResult
where
    B: PdfBackend + ?Sized,
    S: ArtifactSink + ?Sized,
{
    Extractor::new(options.clone()).process_document(backend, model, sink)
}

/// Open and process a PDF file with the given options.
pub fn process_file<P, S>(path: P, sink: &S, options: &ExtractOptions) -> ProcessingResult
where
    P: AsRef<Path>,
    S: ArtifactSink + ?Sized,
{
    Extractor::new(options.clone()).process_file(path, sink)
}
