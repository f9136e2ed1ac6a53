//! Input discovery: PDF header sniffing and manual lookup in directories.

use crate::error::{Error, Result};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Header bytes of every PDF file.
const PDF_MAGIC: &[u8] = b"%PDF-";
/// Length of the version string following the magic, e.g. `1.7`.
const VERSION_LEN: usize = 3;

/// Version information read from a PDF header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfHeader {
    /// PDF version (e.g., "1.4", "2.0")
    pub version: String,
}

impl std::fmt::Display for PdfHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PDF {}", self.version)
    }
}

/// Read and validate the header of the file at `path`.
pub fn read_header<P: AsRef<Path>>(path: P) -> Result<PdfHeader> {
    let mut file = File::open(path)?;
    let mut buf = [0u8; 16];
    let read = file.read(&mut buf)?;
    check_header(&buf[..read])
}

/// Validate the leading bytes of a PDF.
///
/// Returns [`Error::UnknownFormat`] when the magic is missing and
/// [`Error::UnsupportedVersion`] when the version is not `d.d`.
pub fn check_header(data: &[u8]) -> Result<PdfHeader> {
    if data.len() < PDF_MAGIC.len() + VERSION_LEN || !data.starts_with(PDF_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let raw = &data[PDF_MAGIC.len()..PDF_MAGIC.len() + VERSION_LEN];
    let version = String::from_utf8_lossy(raw).to_string();
    let bytes = version.as_bytes();
    let well_formed = bytes.len() == VERSION_LEN
        && bytes[0].is_ascii_digit()
        && bytes[1] == b'.'
        && bytes[2].is_ascii_digit();

    if !well_formed {
        return Err(Error::UnsupportedVersion(version));
    }

    Ok(PdfHeader { version })
}

/// Whether `path` has a `.pdf` extension (case-insensitive).
pub fn has_pdf_extension<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// List the PDF manuals directly inside `dir`, sorted by file name.
///
/// Subdirectories are not searched.
pub fn find_manuals<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut manuals = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_pdf_extension(&path) {
            manuals.push(path);
        }
    }
    manuals.sort();
    Ok(manuals)
}

/// Expand a list of inputs (files or directories) into PDF paths.
///
/// Directories contribute their PDF files; plain files are kept as given so
/// that open failures surface as per-document errors later.
pub fn collect_inputs<P: AsRef<Path>>(inputs: &[P]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for input in inputs {
        let input = input.as_ref();
        if input.is_dir() {
            paths.extend(find_manuals(input)?);
        } else {
            paths.push(input.to_path_buf());
        }
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_header_valid() {
        let header = check_header(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3").unwrap();
        assert_eq!(header.version, "1.7");
        assert_eq!(header.to_string(), "PDF 1.7");
    }

    #[test]
    fn test_check_header_not_pdf() {
        assert!(matches!(
            check_header(b"<!DOCTYPE html>"),
            Err(Error::UnknownFormat)
        ));
        assert!(matches!(check_header(b"%PDF"), Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_check_header_bad_version() {
        assert!(matches!(
            check_header(b"%PDF-x.y\n"),
            Err(Error::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn test_has_pdf_extension() {
        assert!(has_pdf_extension("WM63SLF-parts.pdf"));
        assert!(has_pdf_extension("MANUAL.PDF"));
        assert!(!has_pdf_extension("notes.txt"));
        assert!(!has_pdf_extension("no_extension"));
    }

    #[test]
    fn test_find_manuals_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.pdf"), b"%PDF-1.4\n").unwrap();
        fs::write(dir.path().join("a.PDF"), b"%PDF-1.4\n").unwrap();
        fs::write(dir.path().join("readme.txt"), b"hello").unwrap();
        fs::create_dir(dir.path().join("nested.pdf")).unwrap();

        let found = find_manuals(dir.path()).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.PDF", "b.pdf"]);
    }
}
