//! One question in, one answer out.
//!
//! Locate files by name, extract each, fall back to the web when nothing
//! was found and the mode allows it, then render the prompt and ask the
//! model. Every step runs to completion before the next one starts.

use crate::auth::TokenProvider;
use crate::drive::{DocumentLocator, DriveApi, DriveClient};
use crate::extract::ContentExtractor;
use crate::rag::context::{document_fragment, web_fragment};
use crate::types::SearchMode;
use crate::web::{GoogleWebSearch, WebSearch};
use driverag_core::{AppConfig, AppError, AppResult};
use driverag_llm::{create_client_from_config, LlmClient, LlmRequest};
use driverag_prompt::{load_prompt_file, ChatPrompt, PromptTemplate};
use std::sync::Arc;
use std::time::Duration;

/// Returned when neither storage nor the web produced any context.
pub const NO_RELEVANT_DOCUMENT: &str =
    "Sorry, I couldn't find any relevant document for your question.";

const DEFAULT_PREVIEW_CHARS: usize = 500;

/// Anything that can answer a question in a given search mode.
///
/// Answers are always displayable text; failures are folded into it.
#[async_trait::async_trait]
pub trait Answerer: Send + Sync {
    async fn answer(&self, question: &str, mode: SearchMode) -> String;
}

/// The retrieval-augmented answering pipeline.
pub struct RagPipeline {
    locator: DocumentLocator,
    extractor: ContentExtractor,
    web: Arc<dyn WebSearch>,
    llm: Arc<dyn LlmClient>,
    template: PromptTemplate,
    model: String,
    temperature: Option<f32>,
    preview_chars: usize,
}

impl RagPipeline {
    pub fn new(
        drive: Arc<dyn DriveApi>,
        web: Arc<dyn WebSearch>,
        llm: Arc<dyn LlmClient>,
        template: PromptTemplate,
        model: impl Into<String>,
    ) -> Self {
        Self {
            locator: DocumentLocator::new(drive.clone()),
            extractor: ContentExtractor::new(drive),
            web,
            llm,
            template,
            model: model.into(),
            temperature: None,
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_preview_chars(mut self, preview_chars: usize) -> Self {
        self.preview_chars = preview_chars;
        self
    }

    /// Wire the production collaborators from configuration.
    pub fn from_config(config: &AppConfig, tokens: Arc<dyn TokenProvider>) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        let drive: Arc<dyn DriveApi> = Arc::new(DriveClient::new(http.clone(), tokens));
        let web: Arc<dyn WebSearch> = Arc::new(GoogleWebSearch::new(http, &config.search));
        let llm = create_client_from_config(config)?;

        let template = match config.prompt_file {
            Some(ref path) => {
                tracing::info!("Using prompt definition from {:?}", path);
                PromptTemplate::from_definition(&load_prompt_file(path)?)?
            }
            None => PromptTemplate::builtin()?,
        };

        Ok(Self::new(drive, web, llm, template, config.resolved_model())
            .with_temperature(config.resolved_temperature())
            .with_preview_chars(config.preview_chars))
    }

    /// Collect context fragments for a question.
    ///
    /// Storage failures count as zero files; files that fail to extract
    /// are skipped.
    pub async fn gather_context(&self, question: &str, mode: SearchMode) -> Vec<String> {
        let files = match self.locator.find_documents(question).await {
            Ok(files) => files,
            Err(e) => {
                tracing::error!("Document search failed: {}", e);
                Vec::new()
            }
        };

        let mut fragments = Vec::new();
        for file in &files {
            match self.extractor.extract(file).await {
                Ok(doc) => fragments.push(document_fragment(&doc, self.preview_chars)),
                Err(e) => tracing::warn!("Skipping '{}': {}", file.name, e),
            }
        }

        if fragments.is_empty() && mode.allows_web() {
            tracing::info!("No document context, falling back to web search");
            fragments.extend(
                self.web
                    .search_web(question)
                    .await
                    .iter()
                    .map(|snippet| web_fragment(snippet)),
            );
        }

        fragments
    }

    /// Render the prompt and ask the model.
    pub async fn generate(&self, fragments: &[String], question: &str) -> AppResult<String> {
        let prompt = self.template.render(&ChatPrompt::new(fragments, question))?;
        tracing::debug!("Prompt:\n{}", prompt);

        let mut request = LlmRequest::new(prompt, self.model.clone());
        if let Some(temperature) = self.temperature {
            request = request.with_temperature(temperature);
        }

        let response = self.llm.complete(&request).await?;
        tracing::info!(
            provider = self.llm.provider_name(),
            tokens = response.usage.total_tokens,
            "Answer generated"
        );
        Ok(response.content)
    }

    /// Full turn: context, then generation. Never fails.
    pub async fn answer(&self, question: &str, mode: SearchMode) -> String {
        tracing::info!(mode = %mode, "Answering: {}", question);

        let fragments = self.gather_context(question, mode).await;
        if fragments.is_empty() {
            return NO_RELEVANT_DOCUMENT.to_string();
        }

        match self.generate(&fragments, question).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("Answer generation failed: {}", e);
                format!("An error occurred: {}", e)
            }
        }
    }
}

#[async_trait::async_trait]
impl Answerer for RagPipeline {
    async fn answer(&self, question: &str, mode: SearchMode) -> String {
        RagPipeline::answer(self, question, mode).await
    }
}
