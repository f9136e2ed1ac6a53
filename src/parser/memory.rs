//! In-memory document backend.
//!
//! Useful for callers that already hold extracted page primitives and for
//! exercising the engine without PDF files.

use crate::error::{Error, Result};
use crate::model::{EmbeddedImage, EncodedImage, PageIndex};

use super::PdfBackend;

/// Minimal valid PNG signature used as placeholder image data.
const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// A synthetic page.
#[derive(Debug, Clone, Default)]
pub struct MemoryPage {
    /// Page text
    pub text: String,
    /// Embedded image sizes as (width, height)
    pub images: Vec<(u32, u32)>,
    /// Vector drawing primitive count
    pub drawings: usize,
    /// When set, every read of this page fails with this message
    pub fault: Option<String>,
    /// When set, only counting drawings fails, with this message
    pub drawing_fault: Option<String>,
}

impl MemoryPage {
    /// A page holding only text.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// A page built from lines joined with `\n`.
    pub fn lines<S: AsRef<str>>(lines: &[S]) -> Self {
        Self::text(
            lines
                .iter()
                .map(|l| l.as_ref())
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }

    /// A page that cannot be read.
    pub fn unreadable(detail: impl Into<String>) -> Self {
        Self {
            fault: Some(detail.into()),
            ..Default::default()
        }
    }

    /// Add an embedded image of the given size.
    pub fn with_image(mut self, width: u32, height: u32) -> Self {
        self.images.push((width, height));
        self
    }

    /// Set the drawing primitive count.
    pub fn with_drawings(mut self, count: usize) -> Self {
        self.drawings = count;
        self
    }

    /// Make the page's graphics unreadable while its text stays readable.
    pub fn with_drawing_fault(mut self, detail: impl Into<String>) -> Self {
        self.drawing_fault = Some(detail.into());
        self
    }
}

/// A document made of [`MemoryPage`]s.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    pages: Vec<MemoryPage>,
}

impl MemoryDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from pages.
    pub fn from_pages(pages: Vec<MemoryPage>) -> Self {
        Self { pages }
    }

    /// Append a page.
    pub fn add_page(&mut self, page: MemoryPage) {
        self.pages.push(page);
    }

    /// Append a page, builder style.
    pub fn with_page(mut self, page: MemoryPage) -> Self {
        self.pages.push(page);
        self
    }

    fn page(&self, page: PageIndex) -> Result<&MemoryPage> {
        let found = self
            .pages
            .get(page.get())
            .ok_or(Error::PageOutOfRange(page.number(), self.pages.len() as u32))?;
        match &found.fault {
            Some(detail) => Err(Error::TextExtract(format!("{}: {}", page, detail))),
            None => Ok(found),
        }
    }
}

impl PdfBackend for MemoryDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, page: PageIndex) -> Result<String> {
        Ok(self.page(page)?.text.clone())
    }

    fn embedded_images(&self, page: PageIndex) -> Result<Vec<EmbeddedImage>> {
        // Handles encode (page number, image position) so they stay unique.
        Ok(self
            .page(page)?
            .images
            .iter()
            .enumerate()
            .map(|(i, &(w, h))| EmbeddedImage::new((page.number(), i as u16), w, h))
            .collect())
    }

    fn drawing_count(&self, page: PageIndex) -> Result<usize> {
        let found = self.page(page)?;
        match &found.drawing_fault {
            Some(detail) => Err(Error::PdfParse(format!("{}: {}", page, detail))),
            None => Ok(found.drawings),
        }
    }

    fn encode_image(&self, image: &EmbeddedImage) -> Result<EncodedImage> {
        let (page_number, position) = image.handle;
        let known = PageIndex::from_number(page_number)
            .and_then(|p| self.pages.get(p.get()))
            .map(|p| (position as usize) < p.images.len())
            .unwrap_or(false);
        if !known {
            return Err(Error::ImageExtract(format!(
                "unknown image handle {:?}",
                image.handle
            )));
        }
        Ok(EncodedImage::png(PNG_SIGNATURE.to_vec()))
    }

    fn render_page(&self, page: PageIndex, _scale: f32) -> Result<EncodedImage> {
        self.page(page)?;
        Ok(EncodedImage::png(PNG_SIGNATURE.to_vec()))
    }
}
