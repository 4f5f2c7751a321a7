//! Prompt fragments with provenance tags.

use crate::types::ExtractedDocument;

/// Longest prefix of `text` holding at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// `[KIND] name : <preview>...`; the ellipsis is appended even when
/// nothing was cut.
pub fn document_fragment(doc: &ExtractedDocument, preview_chars: usize) -> String {
    format!(
        "[{}] {} : {}...",
        doc.kind.tag(),
        doc.source_name,
        truncate_chars(&doc.text, preview_chars)
    )
}

pub fn web_fragment(snippet: &str) -> String {
    format!("[Web] {}", snippet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DocumentKind;

    fn doc(text: &str) -> ExtractedDocument {
        ExtractedDocument {
            source_name: "budget report.pdf".to_string(),
            kind: DocumentKind::Pdf,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_truncate_on_char_boundary() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("héllo", 5), "héllo");
        assert_eq!(truncate_chars("héllo", 50), "héllo");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn test_short_text_keeps_ellipsis() {
        assert_eq!(
            document_fragment(&doc("Q1 results..."), 500),
            "[PDF] budget report.pdf : Q1 results......"
        );
    }

    #[test]
    fn test_long_text_capped_at_preview() {
        let text = "é".repeat(800);
        let fragment = document_fragment(&doc(&text), 500);
        let body = fragment
            .strip_prefix("[PDF] budget report.pdf : ")
            .and_then(|b| b.strip_suffix("..."))
            .unwrap();
        assert_eq!(body.chars().count(), 500);
    }

    #[test]
    fn test_web_fragment() {
        assert_eq!(web_fragment("Rust 1.0 shipped in 2015"), "[Web] Rust 1.0 shipped in 2015");
    }
}
