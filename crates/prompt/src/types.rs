//! Prompt types.

use serde::{Deserialize, Serialize};

/// A prompt definition loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Unique prompt identifier
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// API version for schema evolution
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Template string with Handlebars syntax.
    ///
    /// Available variables: `context`, `question`.
    pub template: String,
}

/// The inputs of one question, built fresh for every turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatPrompt {
    /// Newline-joined provenance-tagged fragments
    pub context: String,

    /// The user's question, verbatim
    pub question: String,
}

impl ChatPrompt {
    /// Join fragments with newlines under one context block.
    pub fn new<S: AsRef<str>>(fragments: &[S], question: impl Into<String>) -> Self {
        let context = fragments
            .iter()
            .map(|f| f.as_ref())
            .collect::<Vec<_>>()
            .join("\n");

        Self {
            context,
            question: question.into(),
        }
    }
}
