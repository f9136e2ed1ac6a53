//! Error types for partscan.

use std::io;
use thiserror::Error;

/// Result type alias for partscan operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures while opening manuals, reading pages or writing outputs.
///
/// Only [`Error::Io`], [`Error::UnknownFormat`], [`Error::UnsupportedVersion`],
/// [`Error::PdfParse`] and [`Error::Encrypted`] abort a whole document; the
/// rest are recorded against a single page or artifact.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input lacks the `%PDF-` header.
    #[error("Input is not a valid PDF (missing %PDF- header)")]
    UnknownFormat,

    /// The header version is not of the form `d.d`.
    #[error("Unrecognized PDF version '{0}'")]
    UnsupportedVersion(String),

    /// The object graph or a content stream could not be decoded.
    #[error("Malformed PDF: {0}")]
    PdfParse(String),

    #[error("Encrypted manuals are not supported")]
    Encrypted,

    /// 1-based page number and document page count.
    #[error("Page {0} does not exist (manual has {1} pages)")]
    PageOutOfRange(u32, u32),

    #[error("Cannot read page text: {0}")]
    TextExtract(String),

    /// An embedded image could not be listed, decoded or re-encoded.
    #[error("Cannot extract image: {0}")]
    ImageExtract(String),

    #[error("Cannot render page: {0}")]
    Render(String),

    /// An artifact sink rejected a write.
    #[error("Cannot write artifact {0}")]
    ArtifactWrite(String),

    /// JSON or CSV output failed.
    #[error("Cannot serialize output: {0}")]
    Serialize(String),

    /// Rejected extraction options.
    #[error("Invalid options: {0}")]
    Config(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::ImageExtract(err.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Serialize(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::PageOutOfRange(10, 5).to_string(),
            "Page 10 does not exist (manual has 5 pages)"
        );
        assert!(Error::UnknownFormat.to_string().contains("not a valid PDF"));
        assert_eq!(
            Error::ArtifactWrite("images/WM63SLF/a.png: permission denied".to_string()).to_string(),
            "Cannot write artifact images/WM63SLF/a.png: permission denied"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let err: Error = io::Error::new(io::ErrorKind::NotFound, "WM63SLF.pdf").into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_csv_error_conversion() {
        let err: Error = csv::Error::from(io::Error::new(io::ErrorKind::Other, "disk full")).into();
        assert!(matches!(err, Error::Serialize(_)));
    }
}
