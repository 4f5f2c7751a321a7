//! Name-substring document lookup.

use crate::drive::client::DriveApi;
use crate::drive::query::build_search_query;
use crate::types::FileReference;
use driverag_core::AppResult;
use std::sync::Arc;

/// Finds allow-listed files whose name contains the question text.
pub struct DocumentLocator {
    drive: Arc<dyn DriveApi>,
}

impl DocumentLocator {
    pub fn new(drive: Arc<dyn DriveApi>) -> Self {
        Self { drive }
    }

    /// Zero matches is an empty vector, not an error.
    pub async fn find_documents(&self, query_text: &str) -> AppResult<Vec<FileReference>> {
        let query = build_search_query(query_text);
        tracing::debug!("Drive query: {}", query);

        let files = self.drive.list_files(&query).await?;

        if files.is_empty() {
            tracing::warn!("No document found for '{}'", query_text);
        } else {
            let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
            tracing::info!("Found {} document(s): {}", files.len(), names.join(", "));
        }

        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::FakeDrive;

    #[tokio::test]
    async fn test_find_documents_passes_escaped_query() {
        let drive = Arc::new(FakeDrive::new().with_file("Bob's notes.txt", "t1", "text/plain", b"hi"));
        let locator = DocumentLocator::new(drive.clone());

        let files = locator.find_documents("Bob's").await.unwrap();
        assert_eq!(files.len(), 1);

        let queries = drive.queries();
        assert_eq!(queries.len(), 1);
        assert!(queries[0].starts_with("name contains 'Bob\\'s' and ("));
    }

    #[tokio::test]
    async fn test_no_match_is_empty() {
        let drive = Arc::new(FakeDrive::new());
        let locator = DocumentLocator::new(drive);
        assert!(locator.find_documents("nothing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_service_failure_propagates() {
        let drive = Arc::new(FakeDrive::failing());
        let locator = DocumentLocator::new(drive);
        assert!(locator.find_documents("x").await.is_err());
    }
}
