//! Integration tests for the lopdf backend against synthetic PDFs.

use lopdf::{dictionary, Document, Object, Stream};

use partscan::model::{ArtifactOrigin, ImageFormat, PageIndex};
use partscan::{Error, ExtractOptions, Extractor, FsSink, LopdfBackend, PdfBackend, Status};

const DIAGRAM_RECTS: usize = 120;

fn text_block(lines: &[&str]) -> String {
    let mut content = String::new();
    let mut y = 280;
    for line in lines {
        content.push_str(&format!("BT /F1 8 Tf 10 {} Td ({}) Tj ET\n", y, line));
        y -= 12;
    }
    content
}

fn anchor_content() -> String {
    text_block(&[
        "SUGGESTED SPARE PARTS",
        "1  EM948630  DECAL, PUSH TO STOP",
    ])
}

fn diagram_content() -> String {
    let mut content = text_block(&[
        "EXPLODED VIEW OF THE ENGINE MOUNTING AND THE FRAME",
        "REFER TO THE LIST ON THE FOLLOWING PAGE WHEN ORDERING",
        "ALL DIMENSIONS SHOWN ARE FOR REFERENCE ONLY",
    ]);
    content.push_str("q 0 0 0 rg\n");
    for i in 0..DIAGRAM_RECTS {
        let x = (i % 12) * 15 + 5;
        let y = (i / 12) * 15 + 50;
        content.push_str(&format!("{} {} 10 10 re f\n", x, y));
    }
    content.push_str("Q\n");
    content.push_str("q 60 0 0 60 120 200 cm /Im1 Do Q\n");
    content.push_str("q 20 0 0 20 10 200 cm /Im2 Do Q\n");
    content
}

fn table_content() -> String {
    let mut content = text_block(&[
        "ENGINE ASSEMBLY",
        "NO.  PART NO.  PART NAME  QTY  REMARKS",
        "1  EM948630  DECAL, PUSH TO STOP  1",
        "2  EM948631  HANDLE, THROTTLE  1",
        "3  EM948632  SCREW, HEX FLANGE  4",
    ]);
    content.push_str("10 10 m 190 10 l S\n10 20 m 190 20 l S\n10 30 m 190 30 l S\n10 40 m n\n");
    content
}

fn gray_image(doc: &mut Document, side: i64, shade: u8) -> Object {
    let pixels = vec![shade; (side * side) as usize];
    let stream = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => Object::Integer(side),
            "Height" => Object::Integer(side),
            "ColorSpace" => "DeviceGray",
            "BitsPerComponent" => Object::Integer(8),
        },
        pixels,
    );
    Object::Reference(doc.add_object(stream))
}

/// Three pages: spare-parts anchor, dense diagram with two images, table.
fn manual_pdf() -> Vec<u8> {
    let mut doc = Document::with_version("1.5");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let large = gray_image(&mut doc, 60, 0x40);
    let small = gray_image(&mut doc, 20, 0xC0);

    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => Object::Reference(font_id) },
        "XObject" => dictionary! { "Im1" => large, "Im2" => small },
    });

    let pages_id = doc.new_object_id();
    let mut kids = Vec::new();
    for content in [anchor_content(), diagram_content(), table_content()] {
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "Contents" => Object::Reference(content_id),
        });
        kids.push(Object::Reference(page_id));
    }

    // MediaBox and Resources are inherited from the page tree root.
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => Object::Integer(kids.len() as i64),
            "Kids" => kids,
            "MediaBox" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(200), Object::Integer(300)],
            "Resources" => Object::Reference(resources_id),
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

fn page(number: u32) -> PageIndex {
    PageIndex::from_number(number).unwrap()
}

#[test]
fn test_open_from_bytes() {
    let backend = LopdfBackend::from_bytes(&manual_pdf()).unwrap();
    assert_eq!(backend.page_count(), 3);
    assert_eq!(backend.version(), "1.5");
}

#[test]
fn test_from_bytes_rejects_non_pdf() {
    assert!(matches!(
        LopdfBackend::from_bytes(b"<html><body>not a manual</body></html>"),
        Err(Error::UnknownFormat)
    ));
    assert!(LopdfBackend::from_bytes(b"%PDF-1.4\ngarbage").is_err());
}

#[test]
fn test_page_text() {
    let backend = LopdfBackend::from_bytes(&manual_pdf()).unwrap();

    let anchor = backend.page_text(page(1)).unwrap();
    assert!(anchor.contains("SUGGESTED SPARE PARTS"));
    assert!(anchor.contains("EM948630"));

    let table = backend.page_text(page(3)).unwrap();
    assert!(table.contains("ENGINE ASSEMBLY"));
    assert!(table.contains("HANDLE, THROTTLE"));
}

#[test]
fn test_page_out_of_range() {
    let backend = LopdfBackend::from_bytes(&manual_pdf()).unwrap();
    assert!(matches!(
        backend.page_text(page(4)),
        Err(Error::PageOutOfRange(4, 3))
    ));
}

#[test]
fn test_drawing_count() {
    let backend = LopdfBackend::from_bytes(&manual_pdf()).unwrap();
    assert_eq!(backend.drawing_count(page(1)).unwrap(), 0);
    assert_eq!(backend.drawing_count(page(2)).unwrap(), DIAGRAM_RECTS);
    // `n` ends a path without painting it.
    assert_eq!(backend.drawing_count(page(3)).unwrap(), 3);
}

#[test]
fn test_embedded_images_use_inherited_resources() {
    let backend = LopdfBackend::from_bytes(&manual_pdf()).unwrap();
    let images = backend.embedded_images(page(2)).unwrap();

    let mut sizes: Vec<(u32, u32)> = images.iter().map(|i| (i.width, i.height)).collect();
    sizes.sort();
    assert_eq!(sizes, vec![(20, 20), (60, 60)]);
}

#[test]
fn test_encode_raw_gray_image_as_png() {
    let backend = LopdfBackend::from_bytes(&manual_pdf()).unwrap();
    let images = backend.embedded_images(page(2)).unwrap();
    let large = images.iter().find(|i| i.width == 60).unwrap();

    let encoded = backend.encode_image(large).unwrap();
    assert_eq!(encoded.format, ImageFormat::Png);

    let decoded = image::load_from_memory(&encoded.data).unwrap().to_luma8();
    assert_eq!(decoded.dimensions(), (60, 60));
    assert_eq!(decoded.get_pixel(30, 30).0, [0x40]);
}

#[test]
fn test_render_page() {
    let backend = LopdfBackend::from_bytes(&manual_pdf()).unwrap();
    let rendered = backend.render_page(page(2), 2.0).unwrap();
    assert_eq!(rendered.format, ImageFormat::Png);

    let img = image::load_from_memory(&rendered.data).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (400, 600));
    // First rectangle spans (5,50)-(15,60) in page space.
    assert_eq!(img.get_pixel(20, 600 - 110).0, [0, 0, 0, 255]);
    assert_eq!(img.get_pixel(399, 0).0, [255, 255, 255, 255]);
}

#[test]
fn test_process_pdf_file_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wm63slf-parts-manual.pdf");
    std::fs::write(&path, manual_pdf()).unwrap();
    let out = dir.path().join("out");

    let result = Extractor::new(ExtractOptions::default()).process_file(&path, &FsSink::new(&out));

    assert_eq!(result.status, Status::Success);
    assert_eq!(result.model, "WM63SLF");
    assert_eq!(result.source.as_deref(), Some("wm63slf-parts-manual.pdf"));
    assert_eq!(result.spare_parts.len(), 1);
    assert_eq!(result.spare_parts[0].part_number, "EM948630");

    assert_eq!(result.tables.len(), 1);
    assert_eq!(result.tables[0].page, 3);
    assert_eq!(result.tables[0].title, "ENGINE ASSEMBLY");
    assert_eq!(result.tables[0].rows.len(), 3);

    let origins: Vec<ArtifactOrigin> = result.images.iter().map(|i| i.origin).collect();
    assert_eq!(origins, vec![ArtifactOrigin::Embedded, ArtifactOrigin::RenderedDiagram]);
    for image in &result.images {
        assert!(std::path::Path::new(&image.path).is_file(), "{} missing", image.path);
    }
    assert!(out.join("images/WM63SLF/WM63SLF_page_02_diagram.png").is_file());
}
