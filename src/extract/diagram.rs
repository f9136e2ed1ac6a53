//! Image artifacts from diagram pages.
//!
//! A diagram page yields its embedded raster images (above a minimum size)
//! and, when it carries dense vector line-art, a rasterization of the whole
//! page. Encode and write failures drop the affected artifact only.

use crate::error::Result;
use crate::model::{ArtifactOrigin, EmbeddedImage, ExtractedImageRef, ImageFormat, PageIndex};
use crate::parser::PdfBackend;

use super::sink::ArtifactSink;
use super::ExtractOptions;

/// File name of the `k`-th (1-based) embedded image of a page.
pub fn embedded_file_name(model: &str, page: PageIndex, k: usize, format: ImageFormat) -> String {
    format!(
        "{}_page_{:02}_img_{}.{}",
        model,
        page.number(),
        k,
        format.extension()
    )
}

/// File name of the rendered diagram of a page.
pub fn diagram_file_name(model: &str, page: PageIndex) -> String {
    format!("{}_page_{:02}_diagram.png", model, page.number())
}

/// Extracts and persists image artifacts from a single page.
#[derive(Debug, Clone)]
pub struct DiagramExtractor {
    min_image_size: u32,
    dense_threshold: usize,
    hint_threshold: usize,
    render_scale: f32,
    enabled: bool,
}

impl DiagramExtractor {
    pub fn new(options: &ExtractOptions) -> Self {
        Self {
            min_image_size: options.min_image_size,
            dense_threshold: options.dense_drawing_threshold,
            hint_threshold: options.diagram_hint_threshold,
            render_scale: options.render_scale,
            enabled: options.extract_images,
        }
    }

    /// Whether a drawing count is high enough to render the page.
    pub fn is_dense(&self, drawing_count: usize) -> bool {
        drawing_count > self.dense_threshold
    }

    /// Persist the artifacts of `page` and return references to them.
    ///
    /// Embedded images come first, in page order, followed by the rendered
    /// diagram when the page is dense.
    pub fn extract<B, S>(
        &self,
        backend: &B,
        sink: &S,
        model: &str,
        page: PageIndex,
        drawing_count: usize,
    ) -> Vec<ExtractedImageRef>
    where
        B: PdfBackend + ?Sized,
        S: ArtifactSink + ?Sized,
    {
        if !self.enabled {
            log::debug!("{}: image extraction disabled", page);
            return Vec::new();
        }
        if let Err(e) = sink.ensure_dir(model) {
            log::warn!("{}: cannot prepare image folder: {}", page, e);
            return Vec::new();
        }

        let mut artifacts = self.embedded(backend, sink, model, page);

        if self.is_dense(drawing_count) {
            log::info!("{}: technical diagram with {} drawings", page, drawing_count);
            match self.render(backend, sink, model, page) {
                Ok(path) => artifacts.push(ExtractedImageRef::new(
                    path,
                    ArtifactOrigin::RenderedDiagram,
                    page.number(),
                )),
                Err(e) => log::warn!("{}: failed to save diagram: {}", page, e),
            }
        } else if drawing_count > self.hint_threshold {
            log::debug!(
                "{}: {} drawings, might be a diagram but below threshold",
                page,
                drawing_count
            );
        } else {
            log::debug!("{}: only {} drawings, not a diagram", page, drawing_count);
        }

        if artifacts.is_empty() {
            log::debug!("{}: no images extracted", page);
        }
        artifacts
    }

    fn embedded<B, S>(
        &self,
        backend: &B,
        sink: &S,
        model: &str,
        page: PageIndex,
    ) -> Vec<ExtractedImageRef>
    where
        B: PdfBackend + ?Sized,
        S: ArtifactSink + ?Sized,
    {
        let images = match backend.embedded_images(page) {
            Ok(images) => images,
            Err(e) => {
                log::warn!("{}: cannot list embedded images: {}", page, e);
                return Vec::new();
            }
        };
        log::debug!("{}: {} embedded images", page, images.len());

        let mut saved = Vec::new();
        for (i, image) in images.iter().enumerate() {
            if !image.exceeds(self.min_image_size) {
                log::debug!("Skipped small image: {}x{}", image.width, image.height);
                continue;
            }
            match self.save_embedded(backend, sink, model, page, i + 1, image) {
                Ok(path) => saved.push(ExtractedImageRef::new(
                    path,
                    ArtifactOrigin::Embedded,
                    page.number(),
                )),
                Err(e) => log::warn!("{}: failed to extract image {}: {}", page, i + 1, e),
            }
        }
        saved
    }

    fn save_embedded<B, S>(
        &self,
        backend: &B,
        sink: &S,
        model: &str,
        page: PageIndex,
        k: usize,
        image: &EmbeddedImage,
    ) -> Result<String>
    where
        B: PdfBackend + ?Sized,
        S: ArtifactSink + ?Sized,
    {
        let encoded = backend.encode_image(image)?;
        let name = embedded_file_name(model, page, k, encoded.format);
        let path = sink.write(model, &name, &encoded.data)?;
        log::debug!("Saved embedded image: {}", name);
        Ok(path)
    }

    fn render<B, S>(&self, backend: &B, sink: &S, model: &str, page: PageIndex) -> Result<String>
    where
        B: PdfBackend + ?Sized,
        S: ArtifactSink + ?Sized,
    {
        let rendered = backend.render_page(page, self.render_scale)?;
        let name = diagram_file_name(model, page);
        let path = sink.write(model, &name, &rendered.data)?;
        log::debug!("Saved technical diagram: {}", name);
        Ok(path)
    }
}

impl Default for DiagramExtractor {
    fn default() -> Self {
        Self::new(&ExtractOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::extract::sink::MemorySink;
    use crate::parser::{MemoryDocument, MemoryPage};

    struct RejectingSink;

    impl ArtifactSink for RejectingSink {
        fn ensure_dir(&self, _model: &str) -> Result<()> {
            Ok(())
        }

        fn write(&self, _model: &str, file_name: &str, _bytes: &[u8]) -> Result<String> {
            Err(Error::ArtifactWrite(format!("disk full: {}", file_name)))
        }
    }

    #[test]
    fn test_file_names() {
        let page = PageIndex::new(4);
        assert_eq!(
            embedded_file_name("WM63SLF", page, 2, ImageFormat::Png),
            "WM63SLF_page_05_img_2.png"
        );
        assert_eq!(
            embedded_file_name("WM63SLF", page, 1, ImageFormat::Jpeg),
            "WM63SLF_page_05_img_1.jpg"
        );
        assert_eq!(diagram_file_name("WM63SLF", PageIndex::new(11)), "WM63SLF_page_12_diagram.png");
    }

    #[test]
    fn test_small_images_are_dropped() {
        let doc = MemoryDocument::new().with_page(
            MemoryPage::text("diagram")
                .with_image(30, 30)
                .with_image(60, 80),
        );
        let sink = MemorySink::new();
        let refs = DiagramExtractor::default().extract(&doc, &sink, "WM90", PageIndex::new(0), 0);

        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].origin, ArtifactOrigin::Embedded);
        assert_eq!(refs[0].path, "images/WM90/WM90_page_01_img_2.png");
        assert_eq!(refs[0].page, 1);
    }

    #[test]
    fn test_dense_page_is_rendered() {
        let doc = MemoryDocument::new()
            .with_page(MemoryPage::text("a"))
            .with_page(MemoryPage::text("b").with_image(200, 200).with_drawings(101));
        let sink = MemorySink::new();
        let refs = DiagramExtractor::default().extract(&doc, &sink, "WM90", PageIndex::new(1), 101);

        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].origin, ArtifactOrigin::Embedded);
        assert_eq!(refs[1].origin, ArtifactOrigin::RenderedDiagram);
        assert_eq!(refs[1].path, "images/WM90/WM90_page_02_diagram.png");
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let doc = MemoryDocument::new().with_page(MemoryPage::text("a"));
        let sink = MemorySink::new();
        let extractor = DiagramExtractor::default();
        assert!(extractor
            .extract(&doc, &sink, "M", PageIndex::new(0), 100)
            .is_empty());
        assert!(!extractor.is_dense(100));
        assert!(extractor.is_dense(101));
    }

    #[test]
    fn test_write_failures_omit_artifacts() {
        let doc = MemoryDocument::new().with_page(MemoryPage::text("a").with_image(60, 80));
        let refs =
            DiagramExtractor::default().extract(&doc, &RejectingSink, "M", PageIndex::new(0), 500);
        assert!(refs.is_empty());
    }

    #[test]
    fn test_disabled_extraction_writes_nothing() {
        let doc = MemoryDocument::new().with_page(MemoryPage::text("a").with_image(60, 80));
        let sink = MemorySink::new();
        let extractor = DiagramExtractor::new(&ExtractOptions::default().with_images(false));
        assert!(extractor
            .extract(&doc, &sink, "M", PageIndex::new(0), 500)
            .is_empty());
        assert!(sink.is_empty());
    }
}
