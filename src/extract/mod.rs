//! Extraction engine: anchor search, page classification, table assembly,
//! spare-parts reading and image artifacts.

pub mod anchor;
pub mod batch;
pub mod classify;
mod columns;
pub mod diagram;
mod model_id;
mod options;
pub mod pipeline;
pub mod rows;
pub mod sink;
pub mod spare_parts;

pub use anchor::{locate_anchor, normalize_for_match, Anchor};
pub use batch::{process_batch, process_batch_with};
pub use classify::{is_data_row, PageClassifier};
pub use columns::split_columns;
pub use diagram::DiagramExtractor;
pub use model_id::{model_code, model_from_path};
pub use options::{ExtractOptions, MIN_RENDER_SCALE};
pub use pipeline::{
    process_document, process_file, ClassificationReport, Extractor, PageOutcome,
    ResultAggregator,
};
pub use rows::{RowAssembler, RowBuffer};
pub use sink::{ArtifactSink, FsSink, MemorySink};
pub use spare_parts::SparePartsReader;
