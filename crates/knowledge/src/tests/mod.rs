//! Shared test doubles and fixtures.


use crate::auth::TokenProvider;
use crate::drive::DriveApi;
use crate::types::FileReference;
use crate::web::WebSearch;
use driverag_core::{AppError, AppResult};
use driverag_llm::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use std::collections::HashMap;
use std::sync::Mutex;

/// Token provider with a fixed token.
pub struct StaticToken(pub &'static str);

#[async_trait::async_trait]
impl TokenProvider for StaticToken {
    async fn access_token(&self) -> AppResult<String> {
        Ok(self.0.to_string())
    }
}

/// In-memory storage account. Every listed file matches every query.
#[derive(Default)]
pub struct FakeDrive {
    files: Vec<FileReference>,
    contents: HashMap<String, Vec<u8>>,
    fail_listing: bool,
    queries: Mutex<Vec<String>>,
    downloads: Mutex<Vec<String>>,
}

impl FakeDrive {
    pub fn new() -> Self {
        Self::default()
    }

    /// A drive whose listing call always fails.
    pub fn failing() -> Self {
        Self {
            fail_listing: true,
            ..Self::default()
        }
    }

    pub fn with_file(mut self, name: &str, id: &str, mime_type: &str, content: &[u8]) -> Self {
        self.files.push(FileReference {
            name: name.to_string(),
            id: id.to_string(),
            mime_type: mime_type.to_string(),
        });
        self.contents.insert(id.to_string(), content.to_vec());
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn downloads(&self) -> Vec<String> {
        self.downloads.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl DriveApi for FakeDrive {
    async fn list_files(&self, query: &str) -> AppResult<Vec<FileReference>> {
        self.queries.lock().unwrap().push(query.to_string());
        if self.fail_listing {
            return Err(AppError::Search("listing unavailable".to_string()));
        }
        Ok(self.files.clone())
    }

    async fn download(&self, file_id: &str) -> AppResult<Vec<u8>> {
        self.downloads.lock().unwrap().push(file_id.to_string());
        self.contents
            .get(file_id)
            .cloned()
            .ok_or_else(|| AppError::Extraction(format!("no such file: {}", file_id)))
    }
}

/// Web search returning canned snippets.
pub struct FakeWeb {
    snippets: Vec<String>,
    calls: Mutex<usize>,
}

impl FakeWeb {
    pub fn new(snippets: &[&str]) -> Self {
        Self {
            snippets: snippets.iter().map(|s| s.to_string()).collect(),
            calls: Mutex::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl WebSearch for FakeWeb {
    async fn search_web(&self, _query_text: &str) -> Vec<String> {
        *self.calls.lock().unwrap() += 1;
        self.snippets.clone()
    }
}

/// Model double that records every request.
pub struct FakeLlm {
    reply: Result<String, String>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl FakeLlm {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.prompt).collect()
    }
}

#[async_trait::async_trait]
impl LlmClient for FakeLlm {
    fn provider_name(&self) -> &str {
        "fake"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.requests.lock().unwrap().push(request.clone());
        match self.reply {
            Ok(ref content) => Ok(LlmResponse {
                content: content.clone(),
                model: request.model.clone(),
                usage: LlmUsage::new(10, 5),
            }),
            Err(ref message) => Err(AppError::Llm(message.clone())),
        }
    }
}
