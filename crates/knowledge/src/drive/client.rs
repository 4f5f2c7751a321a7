//! Drive v3 REST client.

use crate::auth::TokenProvider;
use crate::types::FileReference;
use driverag_core::{AppError, AppResult};
use serde::Deserialize;
use std::sync::Arc;

/// Default API host.
pub const DEFAULT_DRIVE_URL: &str = "https://www.googleapis.com";

const LIST_FIELDS: &str = "nextPageToken, files(name, id, mimeType)";
const PAGE_SIZE: &str = "100";

/// Read-only operations the retrieval pipeline needs from storage.
#[async_trait::async_trait]
pub trait DriveApi: Send + Sync {
    /// Run a `files.list` query, following every result page.
    async fn list_files(&self, query: &str) -> AppResult<Vec<FileReference>>;

    /// Download the raw content of a file.
    async fn download(&self, file_id: &str) -> AppResult<Vec<u8>>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileList {
    #[serde(default)]
    files: Vec<FileReference>,
    #[serde(default)]
    next_page_token: Option<String>,
}

/// Bearer-authenticated Drive client.
pub struct DriveClient {
    base_url: String,
    http: reqwest::Client,
    tokens: Arc<dyn TokenProvider>,
}

impl DriveClient {
    pub fn new(http: reqwest::Client, tokens: Arc<dyn TokenProvider>) -> Self {
        Self::with_base_url(DEFAULT_DRIVE_URL, http, tokens)
    }

    pub fn with_base_url(
        base_url: impl Into<String>,
        http: reqwest::Client,
        tokens: Arc<dyn TokenProvider>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            tokens,
        }
    }

    async fn bearer(&self) -> AppResult<String> {
        self.tokens
            .access_token()
            .await
            .map_err(|e| AppError::Search(format!("Could not obtain access token: {}", e)))
    }

    async fn fetch_page(
        &self,
        token: &str,
        query: &str,
        page_token: Option<&str>,
    ) -> AppResult<FileList> {
        let url = format!("{}/drive/v3/files", self.base_url);

        let mut params = vec![
            ("q", query),
            ("fields", LIST_FIELDS),
            ("pageSize", PAGE_SIZE),
        ];
        if let Some(page_token) = page_token {
            params.push(("pageToken", page_token));
        }

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&params)
            .send()
            .await
            .map_err(|e| AppError::Search(format!("Drive list request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Search(format!(
                "Drive API error ({}): {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Search(format!("Failed to parse Drive file list: {}", e)))
    }

    /// `files/{id}` endpoint with the id encoded as a single path segment.
    fn file_url(&self, file_id: &str) -> AppResult<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url).map_err(|e| {
            AppError::Extraction(format!("Invalid Drive URL '{}': {}", self.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                AppError::Extraction(format!("Drive URL '{}' cannot hold a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(["drive", "v3", "files", file_id]);
        Ok(url)
    }
}

#[async_trait::async_trait]
impl DriveApi for DriveClient {
    async fn list_files(&self, query: &str) -> AppResult<Vec<FileReference>> {
        let token = self.bearer().await?;

        let mut files = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let page = self
                .fetch_page(&token, query, page_token.as_deref())
                .await?;
            files.extend(page.files);

            match page.next_page_token {
                Some(next) if !next.is_empty() => page_token = Some(next),
                _ => break,
            }
        }

        Ok(files)
    }

    async fn download(&self, file_id: &str) -> AppResult<Vec<u8>> {
        let token = self
            .tokens
            .access_token()
            .await
            .map_err(|e| AppError::Extraction(format!("Could not obtain access token: {}", e)))?;

        let url = self.file_url(file_id)?;
        tracing::debug!("Downloading file {}", file_id);

        let response = self
            .http
            .get(url)
            .bearer_auth(&token)
            .query(&[("alt", "media")])
            .send()
            .await
            .map_err(|e| AppError::Extraction(format!("Download of {} failed: {}", file_id, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Extraction(format!(
                "Download of {} returned {}: {}",
                file_id, status, body
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::Extraction(format!("Download of {} failed: {}", file_id, e)))?;
        Ok(bytes.to_vec())
    }
}
