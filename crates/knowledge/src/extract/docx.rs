//! Word documents via docx-rs.

use driverag_core::{AppError, AppResult};
use docx_rs::{DocumentChild, ParagraphChild, RunChild};

/// Paragraph text in document order, one line per paragraph. Tables are
/// skipped.
pub fn extract_docx(bytes: &[u8]) -> AppResult<String> {
    let doc = docx_rs::read_docx(bytes)
        .map_err(|e| AppError::Extraction(format!("Failed to read DOCX: {}", e)))?;

    let mut text = String::new();
    for child in doc.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            for child in paragraph.children {
                if let ParagraphChild::Run(run) = child {
                    for child in run.children {
                        if let RunChild::Text(t) = child {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            text.push('\n');
        }
    }

    Ok(text)
}
