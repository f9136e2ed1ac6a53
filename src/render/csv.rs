//! CSV output: one file per sheet.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

use super::sheets::{Sheet, Workbook};

/// Directory (under the output root) holding one CSV per parts table.
pub const TABLES_DIR: &str = "tables";

/// Write a sheet as CSV, header row first.
pub fn write_sheet<W: Write>(writer: W, sheet: &Sheet) -> Result<()> {
    let mut csv = csv::WriterBuilder::new().from_writer(writer);
    csv.write_record(&sheet.headers)?;
    for row in &sheet.rows {
        csv.write_record(row)?;
    }
    csv.flush()?;
    Ok(())
}

/// Render a sheet to a CSV string.
pub fn sheet_to_csv(sheet: &Sheet) -> Result<String> {
    let mut buf = Vec::new();
    write_sheet(&mut buf, sheet)?;
    String::from_utf8(buf).map_err(|e| Error::Serialize(e.to_string()))
}

/// Write a workbook under `root`.
///
/// Layout: `tables/<sheet>.csv` per table, `spare_parts.csv` (only when
/// there are entries) and `processing_summary.csv`. Returns the files
/// written.
pub fn write_workbook<P: AsRef<Path>>(root: P, book: &Workbook) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    let mut written = Vec::new();

    if !book.tables.is_empty() {
        let tables_dir = root.join(TABLES_DIR);
        fs::create_dir_all(&tables_dir)?;
        for sheet in &book.tables {
            let path = tables_dir.join(format!("{}.csv", sheet.name));
            write_sheet(fs::File::create(&path)?, sheet)?;
            written.push(path);
        }
        log::info!("Tables saved: {} sheets in {}", book.tables.len(), tables_dir.display());
    }

    if !book.spare_parts.is_empty() {
        let path = root.join(format!("{}.csv", book.spare_parts.name));
        write_sheet(fs::File::create(&path)?, &book.spare_parts)?;
        log::info!("Spare parts saved: {}", path.display());
        written.push(path);
    }

    let path = root.join(format!("{}.csv", book.summary.name));
    write_sheet(fs::File::create(&path)?, &book.summary)?;
    log::info!("Processing summary saved: {}", path.display());
    written.push(path);

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProcessingResult, Row, Status, TableRecord};

    #[test]
    fn test_sheet_to_csv_quotes_commas() {
        let mut sheet = Sheet::new("t", ["No.", "Part Name"]);
        sheet.push_row(vec!["1".to_string(), "DECAL, PUSH TO STOP".to_string()]);
        let csv = sheet_to_csv(&sheet).unwrap();
        assert_eq!(csv, "No.,Part Name\n1,\"DECAL, PUSH TO STOP\"\n");
    }

    #[test]
    fn test_write_workbook_layout() {
        let dir = tempfile::tempdir().unwrap();
        let mut result = ProcessingResult::new("WM90");
        result.tables.push(TableRecord::new(
            3,
            "WM90",
            "FRAME",
            vec![Row::from_fields(["1", "EM1", "BOLT", "2"])],
        ));
        result.status = Status::Success;

        let book = Workbook::from_results(&[result]);
        let written = write_workbook(dir.path(), &book).unwrap();

        assert_eq!(
            written,
            vec![
                dir.path().join("tables").join("WM90_P3_FRAME.csv"),
                dir.path().join("processing_summary.csv"),
            ]
        );
        let table = fs::read_to_string(&written[0]).unwrap();
        assert_eq!(table, "No.,Part No.,Part Name,Qty,Remarks\n1,EM1,BOLT,2,\n");
        let summary = fs::read_to_string(&written[1]).unwrap();
        assert!(summary.starts_with("Model,Status,Spare_Parts_Count"));
        assert!(summary.contains("WM90,success,0,1,0,Page 3: FRAME"));
    }
}
