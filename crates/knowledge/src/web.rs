//! Web fallback through the Custom Search JSON API.

use driverag_core::config::SearchSettings;
use driverag_core::{AppError, AppResult};
use serde_json::Value;

/// Default Custom Search endpoint.
pub const DEFAULT_SEARCH_URL: &str = "https://www.googleapis.com/customsearch/v1";

/// Snippet source used when storage has nothing relevant.
///
/// Implementations never fail: problems are logged and yield no snippets.
#[async_trait::async_trait]
pub trait WebSearch: Send + Sync {
    async fn search_web(&self, query_text: &str) -> Vec<String>;
}

/// Custom Search JSON API client.
pub struct GoogleWebSearch {
    http: reqwest::Client,
    endpoint: String,
    settings: SearchSettings,
}

impl GoogleWebSearch {
    pub fn new(http: reqwest::Client, settings: &SearchSettings) -> Self {
        Self {
            http,
            endpoint: DEFAULT_SEARCH_URL.to_string(),
            settings: settings.clone(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn fetch(&self, api_key: &str, engine_id: &str, query_text: &str) -> AppResult<Vec<String>> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("key", api_key), ("cx", engine_id), ("q", query_text)])
            .send()
            .await
            .map_err(|e| AppError::WebSearch(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::WebSearch(format!(
                "Search API returned {}",
                response.status()
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| AppError::WebSearch(format!("Failed to parse search response: {}", e)))?;

        Ok(parse_snippets(&payload, self.settings.max_results))
    }
}

#[async_trait::async_trait]
impl WebSearch for GoogleWebSearch {
    async fn search_web(&self, query_text: &str) -> Vec<String> {
        if !self.settings.is_configured() {
            tracing::warn!("Web search is not configured (missing API key or engine id)");
            return Vec::new();
        }
        let api_key = self.settings.api_key.as_deref().unwrap_or_default();
        let engine_id = self.settings.engine_id.as_deref().unwrap_or_default();

        match self.fetch(api_key, engine_id, query_text).await {
            Ok(snippets) => {
                tracing::info!("Web search returned {} snippet(s)", snippets.len());
                snippets
            }
            Err(e) => {
                tracing::error!("Web search failed: {}", e);
                Vec::new()
            }
        }
    }
}

/// Snippets of the first `max` result items. Items without a snippet are
/// dropped, so fewer than `max` may come back.
pub fn parse_snippets(payload: &Value, max: usize) -> Vec<String> {
    payload
        .get("items")
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .take(max)
                .filter_map(|item| item.get("snippet").and_then(|s| s.as_str()))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
