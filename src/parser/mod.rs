//! PDF access: the backend trait and its implementations.

mod backend;
mod lopdf_backend;
mod memory;
pub mod raster;

pub use backend::{decode_text_simple, PdfBackend};
pub use lopdf_backend::LopdfBackend;
pub use memory::{MemoryDocument, MemoryPage};
