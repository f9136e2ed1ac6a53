//! PDF backend abstraction layer.
//!
//! The extraction engine only sees pages through [`PdfBackend`]: plain text,
//! embedded image descriptors, a drawing primitive count, and a page
//! rasterizer. Concrete PDF libraries stay behind this trait.

use crate::error::Result;
use crate::model::{EmbeddedImage, EncodedImage, PageIndex};

/// Read access to the pages of one document.
///
/// Every per-page method may fail independently; callers treat such
/// failures as recoverable page faults.
pub trait PdfBackend {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Plain text of a page, lines separated by `\n`.
    fn page_text(&self, page: PageIndex) -> Result<String>;

    /// Raster images embedded in a page.
    fn embedded_images(&self, page: PageIndex) -> Result<Vec<EmbeddedImage>>;

    /// Number of vector drawing primitives (painted paths) on a page.
    fn drawing_count(&self, page: PageIndex) -> Result<usize>;

    /// Encode an embedded image into a writable container format.
    fn encode_image(&self, image: &EmbeddedImage) -> Result<EncodedImage>;

    /// Rasterize a whole page at the given magnification.
    fn render_page(&self, page: PageIndex, scale: f32) -> Result<EncodedImage>;
}

impl<B: PdfBackend + ?Sized> PdfBackend for &B {
    fn page_count(&self) -> usize {
        (**self).page_count()
    }

    fn page_text(&self, page: PageIndex) -> Result<String> {
        (**self).page_text(page)
    }

    fn embedded_images(&self, page: PageIndex) -> Result<Vec<EmbeddedImage>> {
        (**self).embedded_images(page)
    }

    fn drawing_count(&self, page: PageIndex) -> Result<usize> {
        (**self).drawing_count(page)
    }

    fn encode_image(&self, image: &EmbeddedImage) -> Result<EncodedImage> {
        (**self).encode_image(image)
    }

    fn render_page(&self, page: PageIndex, scale: f32) -> Result<EncodedImage> {
        (**self).render_page(page, scale)
    }
}

/// Simple text decoding fallback when no font encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_text_simple_utf8() {
        assert_eq!(decode_text_simple(b"V-BELT"), "V-BELT");
    }

    #[test]
    fn test_decode_text_simple_latin1() {
        let bytes = vec![0x48, 0x65, 0x6C, 0x6C, 0xE9];
        assert_eq!(decode_text_simple(&bytes), "Hellé");
    }

    #[test]
    fn test_decode_text_simple_utf16be() {
        let bytes = vec![0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69];
        assert_eq!(decode_text_simple(&bytes), "Hi");
    }
}
