// src/utils/pdf.rs

//! PDF helpers built on `lopdf`.

use lopdf::Document;

use crate::error::Result;

/// Parse a PDF held in memory.
pub fn load(bytes: &[u8]) -> Result<Document> {
    Ok(Document::load_mem(bytes)?)
}

/// Extract the text of every page, in page order, concatenated.
///
/// A page whose fonts cannot be mapped to text contributes its raw content
/// stream instead, so edits to it still show up in the result. Only a
/// document that does not parse is an error.
pub fn extract_text(bytes: &[u8]) -> Result<String> {
    let doc = load(bytes)?;

    let mut text = String::new();
    for (page_num, page_id) in doc.get_pages() {
        match doc.extract_text(&[page_num]) {
            Ok(page_text) => text.push_str(&page_text),
            Err(e) => {
                log::warn!(
                    "Page {page_num} has no extractable text ({e}), using its content stream"
                );
                let content = doc.get_page_content(page_id)?;
                text.push_str(&String::from_utf8_lossy(&content));
            }
        }
    }
    Ok(text)
}

/// Round-trip a PDF through the parser and writer.
///
/// Unreferenced objects are dropped on the way, so the written file only
/// carries what the page tree reaches.
pub fn reserialize(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut doc = load(bytes)?;
    doc.prune_objects();

    let mut out = Vec::with_capacity(bytes.len());
    doc.save_to(&mut out)?;
    Ok(out)
}


#[cfg(test)]
mod tests {
    use super::testing::{pdf_with_font, pdf_with_lines, pdf_with_pages};
    use super::*;
    use lopdf::{Dictionary, dictionary};

    /// Composite font with no ToUnicode map, which text extraction cannot decode.
    fn unmapped_font() -> Dictionary {
        dictionary! {
            "Type" => "Font",
            "Subtype" => "Type0",
            "BaseFont" => "Unmapped",
            "Encoding" => "Identity-H",
        }
    }

    #[test]
    fn test_extract_text_single_page() {
        let bytes = pdf_with_lines(&["Bulletin cumulatif", "INF1005 A"]);
        let text = extract_text(&bytes).unwrap();
        assert!(text.contains("Bulletin cumulatif"));
        assert!(text.contains("INF1005 A"));
    }

    #[test]
    fn test_extract_text_keeps_page_order() {
        let bytes = pdf_with_pages(&[&["first page"], &["second page"]]);
        let text = extract_text(&bytes).unwrap();
        let first = text.find("first page").unwrap();
        let second = text.find("second page").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_load_rejects_garbage() {
        assert!(load(b"<html>session expired</html>").is_err());
        assert!(extract_text(b"").is_err());
    }

    #[test]
    fn test_unmapped_font_falls_back_to_content_stream() {
        let bytes = pdf_with_font(unmapped_font(), &[&["INF1005 A"]]);
        let text = extract_text(&bytes).unwrap();
        assert!(text.contains("INF1005 A"));
    }

    #[test]
    fn test_unmapped_font_edits_still_change_text() {
        let before = pdf_with_font(unmapped_font(), &[&["cover"], &["INF1005 A"]]);
        let after = pdf_with_font(unmapped_font(), &[&["cover"], &["INF1005 B"]]);
        let before_text = extract_text(&before).unwrap();
        assert_eq!(before_text, extract_text(&before).unwrap());
        assert_ne!(before_text, extract_text(&after).unwrap());
    }

    #[test]
    fn test_reserialize_preserves_text() {
        let bytes = pdf_with_lines(&["MTH1101 B+"]);
        let rewritten = reserialize(&bytes).unwrap();
        assert!(rewritten.starts_with(b"%PDF-"));
        assert!(extract_text(&rewritten).unwrap().contains("MTH1101 B+"));
    }
}
