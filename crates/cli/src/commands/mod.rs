//! Command handlers for the driverag CLI.

pub mod auth;
pub mod chat;

// Re-export command types for convenience
pub use auth::AuthCommand;
pub use chat::ChatCommand;

use driverag_core::{config::AppConfig, AppError, AppResult};
use std::time::Duration;

/// HTTP client shared by storage, OAuth and web search calls.
pub(crate) fn http_client(config: &AppConfig) -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()
        .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))
}
