//! Locating the page that opens the spare-parts section.

use unicode_normalization::UnicodeNormalization;

use crate::model::PageIndex;
use crate::parser::PdfBackend;

/// The first page containing the spare-parts marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    /// Index of the anchor page
    pub page: PageIndex,
    /// Text of the anchor page, as read during the scan
    pub text: String,
}

/// Case-normalize text for marker matching (NFKC, then upper-case).
pub fn normalize_for_match(text: &str) -> String {
    text.nfkc().collect::<String>().to_uppercase()
}

/// Scan pages in order for `marker` and stop at the first match.
///
/// `marker` is compared against the normalized page text, so it should be
/// upper-case. Pages whose text cannot be read count as non-matches.
pub fn locate_anchor<B: PdfBackend + ?Sized>(backend: &B, marker: &str) -> Option<Anchor> {
    let marker = normalize_for_match(marker);
    log::debug!("Searching for '{}' page", marker);

    for page in PageIndex::all(backend.page_count()) {
        let text = match backend.page_text(page) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Failed to read {} while searching for anchor: {}", page, e);
                continue;
            }
        };

        log::trace!("{}: {} characters", page, text.len());
        if normalize_for_match(&text).contains(&marker) {
            log::info!("Found '{}' on {}", marker, page);
            return Some(Anchor { page, text });
        }
    }

    log::info!("No '{}' page found", marker);
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{MemoryDocument, MemoryPage};

    const MARKER: &str = "SUGGESTED SPARE PARTS";

    #[test]
    fn test_locate_first_match() {
        let doc = MemoryDocument::new()
            .with_page(MemoryPage::text("cover"))
            .with_page(MemoryPage::text("Suggested Spare Parts\n1 ... EM948630 ... DECAL"))
            .with_page(MemoryPage::text("SUGGESTED SPARE PARTS (cont.)"));

        let anchor = locate_anchor(&doc, MARKER).unwrap();
        assert_eq!(anchor.page, PageIndex::new(1));
        assert!(anchor.text.starts_with("Suggested"));
    }

    #[test]
    fn test_locate_not_found() {
        let doc = MemoryDocument::new()
            .with_page(MemoryPage::text("cover"))
            .with_page(MemoryPage::text("parts list"));
        assert_eq!(locate_anchor(&doc, MARKER), None);
    }

    #[test]
    fn test_unreadable_page_is_skipped() {
        let doc = MemoryDocument::new()
            .with_page(MemoryPage::unreadable("corrupt content stream"))
            .with_page(MemoryPage::text("SUGGESTED SPARE PARTS"));
        assert_eq!(locate_anchor(&doc, MARKER).unwrap().page, PageIndex::new(1));
    }

    #[test]
    fn test_normalization_handles_compatibility_forms() {
        // Full-width letters fold to ASCII under NFKC.
        assert_eq!(normalize_for_match("ｐａｒｔｓ"), "PARTS");
    }
}
