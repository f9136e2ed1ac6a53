//! [`PdfBackend`] implementation on top of lopdf.

use std::io::Cursor;
use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId, Stream};

use crate::detect::{check_header, read_header};
use crate::error::{Error, Result};
use crate::model::{EmbeddedImage, EncodedImage, ImageFormat, PageIndex};

use super::backend::{decode_text_simple, PdfBackend};
use super::raster::{is_drawing_operator, render_operations};

/// US Letter, used when a page has no usable MediaBox.
const DEFAULT_MEDIA_BOX: [f32; 4] = [0.0, 0.0, 612.0, 792.0];

/// A PDF document loaded with lopdf.
pub struct LopdfBackend {
    doc: LopdfDocument,
    pages: Vec<ObjectId>,
}

impl std::fmt::Debug for LopdfBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LopdfBackend")
            .field("version", &self.doc.version)
            .field("pages", &self.pages.len())
            .finish()
    }
}

impl LopdfBackend {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let header = read_header(path)?;
        log::debug!("{}: {}", path.display(), header);

        let doc = LopdfDocument::load(path)?;
        Self::from_document(doc)
    }

    /// Load a PDF from memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        check_header(data)?;
        let doc = LopdfDocument::load_mem(data)?;
        Self::from_document(doc)
    }

    /// Wrap an already loaded document.
    pub fn from_document(doc: LopdfDocument) -> Result<Self> {
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }
        let pages = doc.get_pages().into_values().collect();
        Ok(Self { doc, pages })
    }

    /// PDF version string of the document.
    pub fn version(&self) -> &str {
        &self.doc.version
    }

    fn page_id(&self, page: PageIndex) -> Result<ObjectId> {
        self.pages
            .get(page.get())
            .copied()
            .ok_or(Error::PageOutOfRange(page.number(), self.pages.len() as u32))
    }

    fn operations(&self, page: PageIndex) -> Result<Vec<Operation>> {
        let id = self.page_id(page)?;
        let data = self
            .doc
            .get_page_content(id)
            .map_err(|e| Error::PdfParse(format!("{}: {}", page, e)))?;
        let content =
            Content::decode(&data).map_err(|e| Error::PdfParse(format!("{}: {}", page, e)))?;
        Ok(content.operations)
    }

    /// Look up `key` on the page, then up the page tree.
    fn inherited(&self, page_id: ObjectId, key: &[u8]) -> Option<&Object> {
        let mut current = page_id;
        // Page trees are shallow; the bound guards against /Parent cycles.
        for _ in 0..32 {
            let dict = self.doc.get_dictionary(current).ok()?;
            if let Ok(value) = dict.get(key) {
                return Some(value);
            }
            current = dict.get(b"Parent").and_then(Object::as_reference).ok()?;
        }
        None
    }

    fn resolve_dict<'a>(&'a self, obj: &'a Object) -> Option<&'a Dictionary> {
        match obj {
            Object::Reference(id) => self.doc.get_dictionary(*id).ok(),
            Object::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    fn media_box(&self, page_id: ObjectId) -> [f32; 4] {
        let Some(array) = self
            .inherited(page_id, b"MediaBox")
            .and_then(|obj| obj.as_array().ok())
        else {
            return DEFAULT_MEDIA_BOX;
        };
        let values: Vec<f32> = array.iter().filter_map(|o| o.as_float().ok()).collect();
        match values.as_slice() {
            [x0, y0, x1, y1] => [*x0, *y0, *x1, *y1],
            _ => DEFAULT_MEDIA_BOX,
        }
    }

    /// Image XObjects referenced from the page resources.
    fn image_streams(&self, page_id: ObjectId) -> Vec<(ObjectId, &Stream)> {
        let Some(resources) = self
            .inherited(page_id, b"Resources")
            .and_then(|obj| self.resolve_dict(obj))
        else {
            return Vec::new();
        };
        let Some(xobjects) = resources
            .get(b"XObject")
            .ok()
            .and_then(|obj| self.resolve_dict(obj))
        else {
            return Vec::new();
        };

        xobjects
            .iter()
            .filter_map(|(_, obj)| obj.as_reference().ok())
            .filter_map(|id| {
                let stream = self.doc.get_object(id).ok()?.as_stream().ok()?;
                let subtype = stream.dict.get(b"Subtype").ok()?.as_name_str().ok()?;
                (subtype == "Image").then_some((id, stream))
            })
            .collect()
    }

    /// Text assembled directly from text-showing operators.
    fn operator_text(&self, page: PageIndex) -> Result<String> {
        fn line_break(text: &mut String) {
            if !text.is_empty() && !text.ends_with('\n') {
                text.push('\n');
            }
        }

        let mut text = String::new();

        for op in self.operations(page)? {
            match op.operator.as_str() {
                "Tj" => {
                    if let Some(Object::String(bytes, _)) = op.operands.last() {
                        text.push_str(&decode_text_simple(bytes));
                    }
                }
                "'" | "\"" => {
                    line_break(&mut text);
                    if let Some(Object::String(bytes, _)) = op.operands.last() {
                        text.push_str(&decode_text_simple(bytes));
                    }
                }
                "TJ" => {
                    let Some(Object::Array(items)) = op.operands.first() else {
                        continue;
                    };
                    for item in items {
                        match item {
                            Object::String(bytes, _) => text.push_str(&decode_text_simple(bytes)),
                            // Large negative kerning separates words.
                            other => {
                                if other.as_float().map_or(false, |v| v < -250.0) {
                                    text.push(' ');
                                }
                            }
                        }
                    }
                }
                "Td" | "TD" | "T*" | "Tm" | "ET" => line_break(&mut text),
                _ => {}
            }
        }
        Ok(text)
    }
}

/// The (single) filter applied to a stream, if any.
fn stream_filter(stream: &Stream) -> Option<String> {
    match stream.dict.get(b"Filter").ok()? {
        Object::Name(name) => Some(String::from_utf8_lossy(name).to_string()),
        Object::Array(filters) if filters.len() == 1 => {
            filters[0].as_name_str().ok().map(str::to_string)
        }
        Object::Array(_) => Some("multiple".to_string()),
        _ => None,
    }
}

fn dict_u32(dict: &Dictionary, key: &[u8]) -> Option<u32> {
    dict.get(key)
        .ok()
        .and_then(|v| v.as_i64().ok())
        .and_then(|v| u32::try_from(v).ok())
}

impl PdfBackend for LopdfBackend {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, page: PageIndex) -> Result<String> {
        self.page_id(page)?;
        match self.doc.extract_text(&[page.number()]) {
            Ok(text) if !text.trim().is_empty() => Ok(text),
            Ok(_) => self.operator_text(page),
            Err(e) => {
                log::debug!("{}: lopdf text extraction failed ({}), decoding operators", page, e);
                self.operator_text(page)
                    .map_err(|e| Error::TextExtract(format!("{}: {}", page, e)))
            }
        }
    }

    fn embedded_images(&self, page: PageIndex) -> Result<Vec<EmbeddedImage>> {
        let id = self.page_id(page)?;
        Ok(self
            .image_streams(id)
            .into_iter()
            .map(|(obj_id, stream)| {
                EmbeddedImage::new(
                    obj_id,
                    dict_u32(&stream.dict, b"Width").unwrap_or(0),
                    dict_u32(&stream.dict, b"Height").unwrap_or(0),
                )
            })
            .collect())
    }

    fn drawing_count(&self, page: PageIndex) -> Result<usize> {
        Ok(self
            .operations(page)?
            .iter()
            .filter(|op| is_drawing_operator(&op.operator))
            .count())
    }

    fn encode_image(&self, image: &EmbeddedImage) -> Result<EncodedImage> {
        let stream = self
            .doc
            .get_object(image.handle)
            .and_then(Object::as_stream)
            .map_err(|e| Error::ImageExtract(format!("object {:?}: {}", image.handle, e)))?;

        let filter = stream_filter(stream);
        match filter.as_deref() {
            Some("DCTDecode") => return Ok(EncodedImage::jpeg(stream.content.clone())),
            Some("JPXDecode") => {
                return Ok(EncodedImage {
                    data: stream.content.clone(),
                    format: ImageFormat::Jpeg2000,
                })
            }
            Some("FlateDecode") | None => {}
            Some(other) => {
                return Err(Error::ImageExtract(format!("unsupported filter {}", other)));
            }
        }

        let bits = dict_u32(&stream.dict, b"BitsPerComponent").unwrap_or(8);
        if bits != 8 {
            return Err(Error::ImageExtract(format!("{} bits per component", bits)));
        }
        let components = self.color_components(&stream.dict)?;

        let data = if filter.is_some() {
            stream
                .decompressed_content()
                .map_err(|e| Error::ImageExtract(e.to_string()))?
        } else {
            stream.content.clone()
        };

        let (width, height) = (image.width, image.height);
        let dynamic = match components {
            1 => image::GrayImage::from_raw(width, height, data).map(image::DynamicImage::ImageLuma8),
            _ => image::RgbImage::from_raw(width, height, data).map(image::DynamicImage::ImageRgb8),
        }
        .ok_or_else(|| {
            Error::ImageExtract(format!("pixel data does not match {}x{}", width, height))
        })?;

        let mut png = Vec::new();
        dynamic.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)?;
        Ok(EncodedImage::png(png))
    }

    fn render_page(&self, page: PageIndex, scale: f32) -> Result<EncodedImage> {
        let id = self.page_id(page)?;
        let operations = self.operations(page)?;
        let png = render_operations(&operations, self.media_box(id), scale)?;
        Ok(EncodedImage::png(png))
    }
}

impl LopdfBackend {
    /// Number of color components for DeviceGray / DeviceRGB / ICCBased.
    fn color_components(&self, dict: &Dictionary) -> Result<u32> {
        let space = dict
            .get(b"ColorSpace")
            .map_err(|_| Error::ImageExtract("missing color space".to_string()))?;
        let space = match space {
            Object::Reference(id) => self
                .doc
                .get_object(*id)
                .map_err(|e| Error::ImageExtract(e.to_string()))?,
            other => other,
        };

        match space {
            Object::Name(name) => match name.as_slice() {
                b"DeviceGray" | b"CalGray" => Ok(1),
                b"DeviceRGB" | b"CalRGB" => Ok(3),
                other => Err(Error::ImageExtract(format!(
                    "unsupported color space {}",
                    String::from_utf8_lossy(other)
                ))),
            },
            Object::Array(items) if items.first().and_then(|o| o.as_name_str().ok()) == Some("ICCBased") => {
                let n = items
                    .get(1)
                    .and_then(|o| o.as_reference().ok())
                    .and_then(|id| self.doc.get_object(id).ok())
                    .and_then(|o| o.as_stream().ok())
                    .and_then(|s| dict_u32(&s.dict, b"N"));
                match n {
                    Some(1) => Ok(1),
                    Some(3) => Ok(3),
                    other => Err(Error::ImageExtract(format!(
                        "unsupported ICC component count {:?}",
                        other
                    ))),
                }
            }
            _ => Err(Error::ImageExtract("unsupported color space".to_string())),
        }
    }
}
