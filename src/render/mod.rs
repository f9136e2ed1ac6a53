//! Output writers: sheet model, CSV and JSON.

mod csv;
mod json;
mod sheets;

pub use self::csv::{sheet_to_csv, write_sheet, write_workbook, TABLES_DIR};
pub use json::{to_json, JsonFormat};
pub use sheets::{table_sheet_name, Sheet, Workbook, MAX_SHEET_NAME, SPARE_PARTS_SHEET, SUMMARY_SHEET};
