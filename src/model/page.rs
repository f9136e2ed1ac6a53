//! Page addressing and the graphics primitives a page exposes.

use serde::{Deserialize, Serialize};

use super::ImageFormat;

/// Zero-based position of a page within a document.
///
/// Pages are addressed by index internally; [`PageIndex::number`] is the
/// single place where the 1-based page number shown to users is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageIndex(usize);

impl PageIndex {
    /// Create an index from a 0-based position.
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Create an index from a 1-based page number. Returns `None` for 0.
    pub fn from_number(number: u32) -> Option<Self> {
        (number as usize).checked_sub(1).map(Self)
    }

    /// The 0-based position.
    pub const fn get(self) -> usize {
        self.0
    }

    /// The 1-based page number (index + 1).
    pub const fn number(self) -> u32 {
        self.0 as u32 + 1
    }

    /// The following page.
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Iterate over all indices of a document with `count` pages.
    pub fn all(count: usize) -> impl Iterator<Item = PageIndex> {
        (0..count).map(PageIndex)
    }

    /// Iterate over the indices after `self`, up to `count` pages.
    pub fn following(self, count: usize) -> impl Iterator<Item = PageIndex> {
        (self.0 + 1..count).map(PageIndex)
    }
}

impl std::fmt::Display for PageIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "page {}", self.number())
    }
}

/// Backend-specific handle of an embedded image: (object number, generation).
pub type ImageHandle = (u32, u16);

/// An embedded raster image as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedImage {
    /// Handle used to fetch and encode the image data
    pub handle: ImageHandle,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl EmbeddedImage {
    /// Create a new image descriptor.
    pub fn new(handle: ImageHandle, width: u32, height: u32) -> Self {
        Self {
            handle,
            width,
            height,
        }
    }

    /// Whether both dimensions exceed `min` pixels.
    pub fn exceeds(&self, min: u32) -> bool {
        self.width > min && self.height > min
    }
}

/// Encoded raster bytes ready to be written.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    /// Encoded data
    pub data: Vec<u8>,
    /// Container format of `data`
    pub format: ImageFormat,
}

impl EncodedImage {
    /// Wrap PNG bytes.
    pub fn png(data: Vec<u8>) -> Self {
        Self {
            data,
            format: ImageFormat::Png,
        }
    }

    /// Wrap JPEG bytes.
    pub fn jpeg(data: Vec<u8>) -> Self {
        Self {
            data,
            format: ImageFormat::Jpeg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_number_is_index_plus_one() {
        assert_eq!(PageIndex::new(0).number(), 1);
        assert_eq!(PageIndex::new(11).number(), 12);
        assert_eq!(PageIndex::from_number(12), Some(PageIndex::new(11)));
        assert_eq!(PageIndex::from_number(0), None);
    }

    #[test]
    fn test_following_pages() {
        let after: Vec<_> = PageIndex::new(1).following(4).map(|p| p.get()).collect();
        assert_eq!(after, vec![2, 3]);
        assert_eq!(PageIndex::new(3).following(4).count(), 0);
        assert_eq!(PageIndex::all(3).count(), 3);
    }

    #[test]
    fn test_display_uses_page_number() {
        assert_eq!(PageIndex::new(4).to_string(), "page 5");
    }

    #[test]
    fn test_image_exceeds() {
        assert!(!EmbeddedImage::new((1, 0), 30, 30).exceeds(50));
        assert!(!EmbeddedImage::new((1, 0), 50, 80).exceeds(50));
        assert!(EmbeddedImage::new((1, 0), 60, 80).exceeds(50));
    }
}
