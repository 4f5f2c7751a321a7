//! Text extraction, dispatched on document kind.

pub mod docx;
pub mod pdf;
pub mod sheet;
pub mod text;

use crate::drive::DriveApi;
use crate::types::{DocumentKind, ExtractedDocument, FileReference};
use driverag_core::{AppError, AppResult};
use std::sync::Arc;

/// Downloads a file and turns it into plain text.
pub struct ContentExtractor {
    drive: Arc<dyn DriveApi>,
}

impl ContentExtractor {
    pub fn new(drive: Arc<dyn DriveApi>) -> Self {
        Self { drive }
    }

    /// Extract one file. Unsupported kinds fail before any download.
    pub async fn extract(&self, file: &FileReference) -> AppResult<ExtractedDocument> {
        let kind = file.kind().ok_or_else(|| {
            AppError::Extraction(format!(
                "'{}' has a MIME type outside the allow-list: {}",
                file.name, file.mime_type
            ))
        })?;

        if !kind.is_extractable() {
            return Err(AppError::Extraction(format!(
                "unsupported file type {} for '{}'",
                kind.tag(),
                file.name
            )));
        }

        let bytes = self.drive.download(&file.id).await?;
        tracing::debug!("Downloaded {} bytes for '{}'", bytes.len(), file.name);

        let text = extract_text(kind, &bytes)
            .map_err(|e| AppError::Extraction(format!("'{}': {}", file.name, e)))?;

        Ok(ExtractedDocument {
            source_name: file.name.clone(),
            kind,
            text,
        })
    }
}

/// Parse raw bytes of the given kind.
pub fn extract_text(kind: DocumentKind, bytes: &[u8]) -> AppResult<String> {
    match kind {
        DocumentKind::Txt => Ok(text::decode_utf8(bytes)),
        DocumentKind::Pdf => pdf::extract_pdf(bytes),
        DocumentKind::Docx => docx::extract_docx(bytes),
        DocumentKind::Xls | DocumentKind::Xlsx => sheet::extract_workbook(bytes),
        DocumentKind::Csv => sheet::extract_csv(bytes),
        DocumentKind::Doc => Err(AppError::Extraction(
            "unsupported file type DOC".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::FakeDrive;

    fn file(name: &str, id: &str, mime_type: &str) -> FileReference {
        FileReference {
            name: name.to_string(),
            id: id.to_string(),
            mime_type: mime_type.to_string(),
        }
    }

    #[tokio::test]
    async fn test_extract_text_file() {
        let drive = Arc::new(FakeDrive::new().with_file("notes.txt", "t1", "text/plain", b"meeting at noon"));
        let extractor = ContentExtractor::new(drive.clone());

        let doc = extractor
            .extract(&file("notes.txt", "t1", "text/plain"))
            .await
            .unwrap();
        assert_eq!(doc.kind, DocumentKind::Txt);
        assert_eq!(doc.source_name, "notes.txt");
        assert_eq!(doc.text, "meeting at noon");
        assert_eq!(drive.downloads(), vec!["t1".to_string()]);
    }

    #[tokio::test]
    async fn test_legacy_word_is_unsupported_without_download() {
        let drive = Arc::new(FakeDrive::new());
        let extractor = ContentExtractor::new(drive.clone());

        let err = extractor
            .extract(&file("old.doc", "d1", "application/msword"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
        assert!(err.to_string().contains("unsupported"));
        assert!(drive.downloads().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_mime_type_is_rejected() {
        let extractor = ContentExtractor::new(Arc::new(FakeDrive::new()));
        let result = extractor.extract(&file("pic.png", "p1", "image/png")).await;
        assert!(matches!(result, Err(AppError::Extraction(_))));
    }

    #[test]
    fn test_dispatch_csv() {
        let text = extract_text(DocumentKind::Csv, b"a,b\n1,2\n").unwrap();
        assert_eq!(text, "a | b\n1 | 2\n");
    }
}
