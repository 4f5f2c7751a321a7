//! PDF text via lopdf.

use driverag_core::{AppError, AppResult};
use lopdf::Document;

/// Concatenate the text of every page in page order.
pub fn extract_pdf(bytes: &[u8]) -> AppResult<String> {
    let doc = Document::load_mem(bytes)
        .map_err(|e| AppError::Extraction(format!("Failed to load PDF: {}", e)))?;

    let mut text = String::new();
    // Keyed by page number.
    for page_number in doc.get_pages().keys() {
        match doc.extract_text(&[*page_number]) {
            // Drop the line break lopdf appends after each text object.
            Ok(page_text) => text.push_str(page_text.trim_end_matches('\n')),
            Err(e) => tracing::debug!("No text on page {}: {}", page_number, e),
        }
    }

    Ok(text)
}
