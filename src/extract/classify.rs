//! Page classification: table, diagram, or skip.
//!
//! Two independent signals decide whether a page is a parts table: column
//! header keywords anywhere on the page, and lines shaped like numbered
//! catalog rows. Either one is enough, since continuation pages often repeat
//! rows without repeating the header.

use regex::Regex;
use std::sync::OnceLock;

use crate::model::{Classification, Evidence, PageKind};

use super::ExtractOptions;

/// Row shapes: `1  EM948630 ...`, `6.....07055-034 ...`, `12 ... ABC12 ... text`.
fn data_row_patterns() -> &'static [Regex; 3] {
    static PATTERNS: OnceLock<[Regex; 3]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new(r"^\d+\s+[A-Z0-9\-]{4,}").unwrap(),
            Regex::new(r"^\d+\.+[A-Z0-9\-]{4,}").unwrap(),
            Regex::new(r"^\d+.*[A-Z0-9\-]{5,}.*[A-Za-z]").unwrap(),
        ]
    })
}

/// Whether a trimmed line looks like a numbered catalog row.
pub fn is_data_row(line: &str) -> bool {
    data_row_patterns().iter().any(|re| re.is_match(line))
}

/// Classifies pages from their text and drawing count.
///
/// Classification is a pure function of its inputs.
#[derive(Debug, Clone)]
pub struct PageClassifier {
    min_text_chars: usize,
    header_keywords: Vec<String>,
    min_header_hits: usize,
    min_data_row_hits: usize,
    scan_lines: Option<usize>,
}

impl PageClassifier {
    /// Create a classifier from extraction options.
    pub fn new(options: &ExtractOptions) -> Self {
        Self {
            min_text_chars: options.min_text_chars,
            header_keywords: options
                .header_keywords
                .iter()
                .map(|k| k.to_uppercase())
                .collect(),
            min_header_hits: options.min_header_hits,
            min_data_row_hits: options.min_data_row_hits,
            scan_lines: options.classify_scan_lines,
        }
    }

    /// Classify a page.
    pub fn classify(&self, text: &str, drawing_count: usize) -> Classification {
        let text_length = text.chars().filter(|c| !c.is_whitespace()).count();
        let mut evidence = Evidence {
            drawing_count,
            text_length,
            ..Default::default()
        };

        if text_length < self.min_text_chars {
            return Classification::new(PageKind::Skip, evidence);
        }

        evidence.header_hits = self.header_hits(text);
        evidence.data_row_hits = self.data_row_hits(text);

        let kind = if evidence.header_hits >= self.min_header_hits
            || evidence.data_row_hits >= self.min_data_row_hits
        {
            PageKind::Table
        } else {
            PageKind::Diagram
        };

        Classification::new(kind, evidence)
    }

    /// Number of header keywords present in the upper-cased text.
    pub fn header_hits(&self, text: &str) -> usize {
        let upper = text.to_uppercase();
        self.header_keywords
            .iter()
            .filter(|k| upper.contains(k.as_str()))
            .count()
    }

    /// Number of lines (within the scan window) shaped like catalog rows.
    pub fn data_row_hits(&self, text: &str) -> usize {
        let limit = self.scan_lines.unwrap_or(usize::MAX);
        text.lines()
            .take(limit)
            .map(str::trim)
            .filter(|line| !line.is_empty() && is_data_row(line))
            .count()
    }
}

impl Default for PageClassifier {
    fn default() -> Self {
        Self::new(&ExtractOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn padding() -> String {
        "Illustration notes for the assembly shown on this page. ".repeat(3)
    }

    #[test]
    fn test_short_page_is_skipped() {
        let classifier = PageClassifier::default();
        let text = "PAGE 1234\n".repeat(5); // 40 non-whitespace characters
        let result = classifier.classify(&text, 500);
        assert_eq!(result.kind, PageKind::Skip);
        assert_eq!(result.evidence.text_length, 40);
        assert_eq!(result.evidence.drawing_count, 500);
    }

    #[test]
    fn test_header_keywords_make_table() {
        let classifier = PageClassifier::default();
        let text = format!("{}\nNO.  PART NO.  PART NAME  QTY  REMARKS", padding());
        let result = classifier.classify(&text, 0);
        assert_eq!(result.kind, PageKind::Table);
        assert_eq!(result.evidence.header_hits, 5);
    }

    #[test]
    fn test_data_rows_make_table_without_header() {
        let classifier = PageClassifier::default();
        let text = format!(
            "1  EM948630  DECAL, PUSH TO STOP  1\n\
             2..........07055-034.........V-BELT, 4L340\n\
             3  EM2345  BOLT, HEX  4\n{}",
            padding()
        );
        let result = classifier.classify(&text, 10);
        assert_eq!(result.kind, PageKind::Table);
        assert_eq!(result.evidence.header_hits, 0);
        assert_eq!(result.evidence.data_row_hits, 3);
    }

    #[test]
    fn test_prose_is_diagram() {
        let classifier = PageClassifier::default();
        let result = classifier.classify(&padding(), 250);
        assert_eq!(result.kind, PageKind::Diagram);
        assert_eq!(result.evidence.data_row_hits, 0);
    }

    #[test]
    fn test_rows_outside_scan_window_are_ignored() {
        let classifier = PageClassifier::default();
        let mut lines: Vec<String> = (0..15).map(|i| format!("note line {}", i)).collect();
        lines.push("1  EM948630  DECAL  1".to_string());
        lines.push("2  EM948631  DECAL  1".to_string());
        lines.push("3  EM948632  DECAL  1".to_string());
        let text = lines.join("\n") + &padding();

        assert_eq!(classifier.data_row_hits(&text), 0);

        let all = PageClassifier::new(&ExtractOptions::default().scan_all_lines());
        assert_eq!(all.data_row_hits(&text), 3);
    }

    #[test]
    fn test_classification_is_pure() {
        let classifier = PageClassifier::default();
        let text = format!("{}\nQTY REMARKS", padding());
        assert_eq!(classifier.classify(&text, 42), classifier.classify(&text, 42));
    }

    #[test]
    fn test_is_data_row() {
        assert!(is_data_row("1  EM948630  DECAL, PUSH TO STOP  1"));
        assert!(is_data_row("6............07055-034"));
        assert!(!is_data_row("NO.  PART NO.  PART NAME"));
        assert!(!is_data_row("12"));
    }
}
