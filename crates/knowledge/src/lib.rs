//! Document retrieval for driverag.
//!
//! Finds files in the storage account by name, extracts their text, falls
//! back to web snippets and feeds the result to the model:
//! - OAuth credential storage and refresh (`auth`)
//! - Drive v3 listing and download (`drive`)
//! - Per-format text extraction (`extract`)
//! - Custom Search snippets (`web`)
//! - The answering pipeline (`rag`)

pub mod auth;
pub mod drive;
pub mod extract;
pub mod rag;
pub mod types;
pub mod web;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use auth::{CredentialStore, TokenProvider};
pub use drive::{DocumentLocator, DriveApi, DriveClient};
pub use extract::ContentExtractor;
pub use rag::{Answerer, RagPipeline, NO_RELEVANT_DOCUMENT};
pub use types::{DocumentKind, ExtractedDocument, FileReference, SearchMode};
pub use web::{GoogleWebSearch, WebSearch};
