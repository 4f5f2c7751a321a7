//! Retrieval domain types.

use serde::{Deserialize, Serialize};

/// File formats the locator searches for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Txt,
    Pdf,
    Doc,
    Docx,
    Xls,
    Xlsx,
    Csv,
}

impl DocumentKind {
    /// Every allow-listed kind, in query order.
    pub const ALL: [DocumentKind; 7] = [
        Self::Txt,
        Self::Pdf,
        Self::Doc,
        Self::Docx,
        Self::Xls,
        Self::Xlsx,
        Self::Csv,
    ];

    /// Map a MIME type onto an allow-listed kind.
    pub fn from_mime_type(mime_type: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.mime_type() == mime_type)
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Txt => "text/plain",
            Self::Pdf => "application/pdf",
            Self::Doc => "application/msword",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Xls => "application/vnd.ms-excel",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Csv => "text/csv",
        }
    }

    /// Provenance label used in prompt fragments.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Txt => "TXT",
            Self::Pdf => "PDF",
            Self::Doc => "DOC",
            Self::Docx => "DOCX",
            Self::Xls => "XLS",
            Self::Xlsx => "XLSX",
            Self::Csv => "CSV",
        }
    }

    /// Whether a text extractor exists for this kind.
    ///
    /// Legacy Word binaries are found by search but cannot be parsed.
    pub fn is_extractable(&self) -> bool {
        !matches!(self, Self::Doc)
    }
}

/// A file found in the storage account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReference {
    pub name: String,
    pub id: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

impl FileReference {
    /// The allow-listed kind of this file, if any.
    pub fn kind(&self) -> Option<DocumentKind> {
        DocumentKind::from_mime_type(&self.mime_type)
    }
}

/// Plain text pulled out of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDocument {
    pub source_name: String,
    pub kind: DocumentKind,
    pub text: String,
}

/// Where a question looks for context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Storage account only
    Drive,
    /// Storage account, then the web when nothing was found
    Web,
    /// Same sources as `Web`
    All,
}

impl SearchMode {
    /// Parse a mode token, ignoring case and surrounding whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "drive" => Some(Self::Drive),
            "web" => Some(Self::Web),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Drive => "drive",
            Self::Web => "web",
            Self::All => "all",
        }
    }

    /// Whether the web fallback may run.
    pub fn allows_web(&self) -> bool {
        matches!(self, Self::Web | Self::All)
    }
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_mime_type() {
        assert_eq!(
            DocumentKind::from_mime_type("application/pdf"),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(
            DocumentKind::from_mime_type("text/csv"),
            Some(DocumentKind::Csv)
        );
        assert_eq!(DocumentKind::from_mime_type("image/png"), None);
    }

    #[test]
    fn test_every_kind_round_trips() {
        for kind in DocumentKind::ALL {
            assert_eq!(DocumentKind::from_mime_type(kind.mime_type()), Some(kind));
        }
    }

    #[test]
    fn test_only_legacy_word_is_unextractable() {
        let unextractable: Vec<_> = DocumentKind::ALL
            .into_iter()
            .filter(|k| !k.is_extractable())
            .collect();
        assert_eq!(unextractable, vec![DocumentKind::Doc]);
    }

    #[test]
    fn test_file_reference_deserializes_drive_json() {
        let file: FileReference = serde_json::from_str(
            r#"{"name": "budget report.pdf", "id": "1AbC", "mimeType": "application/pdf"}"#,
        )
        .unwrap();
        assert_eq!(file.kind(), Some(DocumentKind::Pdf));
    }

    #[test]
    fn test_search_mode_parse() {
        assert_eq!(SearchMode::parse("drive"), Some(SearchMode::Drive));
        assert_eq!(SearchMode::parse(" WEB \n"), Some(SearchMode::Web));
        assert_eq!(SearchMode::parse("All"), Some(SearchMode::All));
        assert_eq!(SearchMode::parse("exit"), None);
        assert_eq!(SearchMode::parse("cloud"), None);
    }

    #[test]
    fn test_search_mode_web_permission() {
        assert!(!SearchMode::Drive.allows_web());
        assert!(SearchMode::Web.allows_web());
        assert!(SearchMode::All.allows_web());
    }
}
