//! Data model shared by the extraction engine and the writers.
//!
//! Records produced while walking a manual (tables, spare parts, image
//! artifacts) are immutable once appended to a [`ProcessingResult`].

mod artifact;
mod classification;
mod page;
mod record;
mod result;

pub use artifact::{ArtifactOrigin, ExtractedImageRef, ImageFormat};
pub use classification::{Classification, Evidence, PageKind};
pub use page::{EmbeddedImage, EncodedImage, ImageHandle, PageIndex};
pub use record::{Row, SparePartEntry, TableRecord, COLUMN_HEADERS, ROW_WIDTH};
pub use result::{PageReport, PageVerdict, ProcessingResult, ProcessingSummary, Status};
