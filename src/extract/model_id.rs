//! Model code detection from manual file names.

use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// Two letters, digits, then optional word characters (e.g. `WM63SLF`).
fn model_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)[A-Z]{2}\d+\w*").unwrap())
}

/// Derive a model code from a file name without extension.
///
/// Returns the first model-shaped token upper-cased, or the name unchanged
/// when there is none.
///
/// # Example
///
/// ```
/// use partscan::extract::model_code;
///
/// assert_eq!(model_code("WM63SLF-rev-0-parts-manual"), "WM63SLF");
/// assert_eq!(model_code("parts-manual"), "parts-manual");
/// ```
pub fn model_code(stem: &str) -> String {
    match model_pattern().find(stem) {
        Some(m) => m.as_str().to_uppercase(),
        None => stem.to_string(),
    }
}

/// Derive a model code from a path's file stem.
pub fn model_from_path<P: AsRef<Path>>(path: P) -> String {
    let stem = path
        .as_ref()
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    model_code(&stem)
}
