//! Error types for driverag.
//!
//! One enum covers every failure category of the retrieval pipeline:
//! authentication, storage search, text extraction, web search and
//! generation, plus the usual configuration and I/O plumbing.

use thiserror::Error;

/// Unified error type for driverag.
///
/// All fallible functions return `Result<T, AppError>`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Credential load, refresh or consent-flow failure
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Storage service query failure
    #[error("Search error: {0}")]
    Search(String),

    /// Download, decode or parse failure for a single file
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Web search API failure
    #[error("Web search error: {0}")]
    WebSearch(String),

    /// Chat-completion backend errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Prompt template errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
