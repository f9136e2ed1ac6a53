//! Persisted raster artifacts (embedded images and rendered diagrams).

use serde::{Deserialize, Serialize};

/// Where an extracted image came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactOrigin {
    /// A raster image embedded in the page
    Embedded,
    /// A rasterization of the whole page
    RenderedDiagram,
}

impl std::fmt::Display for ArtifactOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactOrigin::Embedded => write!(f, "embedded"),
            ArtifactOrigin::RenderedDiagram => write!(f, "rendered-diagram"),
        }
    }
}

/// Reference to a persisted image artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedImageRef {
    /// Path or identifier returned by the artifact sink
    pub path: String,
    /// How the artifact was produced
    pub origin: ArtifactOrigin,
    /// 1-based page number the artifact came from
    pub page: u32,
}

impl ExtractedImageRef {
    /// Create a new reference.
    pub fn new(path: impl Into<String>, origin: ArtifactOrigin, page: u32) -> Self {
        Self {
            path: path.into(),
            origin,
            page,
        }
    }
}

/// Raster container formats the extractor can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
    Jpeg2000,
}

impl ImageFormat {
    /// File extension for the format.
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Jpeg2000 => "jp2",
        }
    }

    /// MIME type for the format.
    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Jpeg2000 => "image/jp2",
        }
    }

    /// Detect the format from magic bytes.
    pub fn sniff(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(ImageFormat::Png);
        }
        if data.starts_with(&[0x00, 0x00, 0x00, 0x0C, 0x6A, 0x50, 0x20, 0x20])
            || data.starts_with(&[0xFF, 0x4F, 0xFF, 0x51])
        {
            return Some(ImageFormat::Jpeg2000);
        }
        None
    }
}
