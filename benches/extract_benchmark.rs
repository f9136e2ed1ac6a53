//! Benchmarks for partscan extraction performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic page text and in-memory documents.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use partscan::extract::{MemorySink, PageClassifier, RowAssembler, SparePartsReader};
use partscan::parser::{MemoryDocument, MemoryPage};
use partscan::{ExtractOptions, Extractor};

/// Creates table page text with the given number of catalog entries.
fn table_text(rows: usize) -> String {
    let mut text = String::from("ENGINE ASSEMBLY\nNO.  PART NO.  PART NAME  QTY  REMARKS\n");
    for i in 0..rows {
        text.push_str(&format!(
            "{}  EM9486{:02}  SCREW, HEX FLANGE {}  {}\n",
            i + 1,
            i % 100,
            i,
            i % 4 + 1
        ));
        if i % 5 == 0 {
            text.push_str("   (M6 X 12, ZINC PLATED)\n");
        }
    }
    text.push_str("- 12 -\n");
    text
}

/// Creates a manual with a spare-parts page followed by alternating pages.
fn create_manual(page_count: usize) -> MemoryDocument {
    let mut doc = MemoryDocument::new().with_page(MemoryPage::text(
        "SUGGESTED SPARE PARTS\n1  EM948630  DECAL, PUSH TO STOP\n2  EM948640  SPARK PLUG",
    ));
    for i in 0..page_count {
        let page = if i % 2 == 0 {
            MemoryPage::text(table_text(20))
        } else {
            MemoryPage::text("Exploded view of the engine mounting. ".repeat(4))
                .with_image(400, 300)
                .with_drawings(250)
        };
        doc.add_page(page);
    }
    doc
}

/// Benchmark page classification.
fn bench_classification(c: &mut Criterion) {
    let classifier = PageClassifier::default();
    let table = table_text(30);
    let diagram = "Exploded view of the engine mounting. ".repeat(4);

    c.bench_function("classify_table_page", |b| {
        b.iter(|| classifier.classify(black_box(&table), 12));
    });

    c.bench_function("classify_diagram_page", |b| {
        b.iter(|| classifier.classify(black_box(&diagram), 250));
    });
}

/// Benchmark row assembly at various table sizes.
fn bench_row_assembly(c: &mut Criterion) {
    let assembler = RowAssembler::default();
    let mut group = c.benchmark_group("row_assembly");

    for rows in [10, 50, 200].iter() {
        let text = table_text(*rows);
        group.bench_function(format!("{}_rows", rows), |b| {
            b.iter(|| assembler.assemble_page(7, "WM63SLF", black_box(&text)));
        });
    }

    group.finish();
}

/// Benchmark spare-parts parsing.
fn bench_spare_parts(c: &mut Criterion) {
    let reader = SparePartsReader::new(&ExtractOptions::default());
    let text = (1..=40)
        .map(|i| format!("{}  EM9486{:02}  REPLACEMENT PART {}", i, i, i))
        .collect::<Vec<_>>()
        .join("\n");

    c.bench_function("spare_parts_40_lines", |b| {
        b.iter(|| reader.read(black_box(&text), "WM63SLF"));
    });
}

/// Benchmark whole-document processing on in-memory manuals.
fn bench_process_document(c: &mut Criterion) {
    let extractor = Extractor::default();
    let mut group = c.benchmark_group("process_document");

    for page_count in [4, 16].iter() {
        let doc = create_manual(*page_count);
        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| extractor.process_document(black_box(&doc), "WM63SLF", &MemorySink::new()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_classification,
    bench_row_assembly,
    bench_spare_parts,
    bench_process_document,
);
criterion_main!(benches);
