//! Prompt builder: renders the template with the retrieved context.

use crate::types::{ChatPrompt, PromptDefinition};
use driverag_core::{AppError, AppResult};
use handlebars::Handlebars;

/// Template used when no prompt file is configured.
pub const DEFAULT_TEMPLATE: &str =
    "Relevant contexts:\n{{context}}\n\nQuestion: {{question}}\n\nAnswer:";

const TEMPLATE_NAME: &str = "prompt";

/// A compiled prompt template.
pub struct PromptTemplate {
    id: String,
    registry: Handlebars<'static>,
}

impl PromptTemplate {
    /// Compile a template string.
    pub fn new(id: impl Into<String>, template: &str) -> AppResult<Self> {
        let mut registry = Handlebars::new();

        // Context is plain text; HTML escaping would mangle quotes and ampersands.
        registry.register_escape_fn(handlebars::no_escape);
        registry.set_strict_mode(true);

        registry
            .register_template_string(TEMPLATE_NAME, template)
            .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

        Ok(Self {
            id: id.into(),
            registry,
        })
    }

    /// The built-in template.
    pub fn builtin() -> AppResult<Self> {
        Self::new("builtin.answer", DEFAULT_TEMPLATE)
    }

    /// Compile the template of a loaded prompt definition.
    pub fn from_definition(definition: &PromptDefinition) -> AppResult<Self> {
        Self::new(definition.id.clone(), &definition.template)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Render the prompt for one question.
    pub fn render(&self, prompt: &ChatPrompt) -> AppResult<String> {
        tracing::debug!(template = %self.id, "Rendering prompt");

        self.registry
            .render(TEMPLATE_NAME, prompt)
            .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
    }
}

/// Build the prompt text from context fragments and the question.
///
/// Uses the built-in template:
///
/// ```text
/// Relevant contexts:
/// <fragments, one per line>
///
/// Question: <question>
///
/// Answer:
/// ```
pub fn build_prompt<S: AsRef<str>>(fragments: &[S], question: &str) -> AppResult<String> {
    PromptTemplate::builtin()?.render(&ChatPrompt::new(fragments, question))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_prompt_layout() {
        let fragments = vec![
            "[PDF] budget report.pdf : Q1 results......".to_string(),
            "[TXT] notes.txt : draft...".to_string(),
        ];
        let prompt = build_prompt(&fragments, "budget report").unwrap();

        assert_eq!(
            prompt,
            "Relevant contexts:\n\
             [PDF] budget report.pdf : Q1 results......\n\
             [TXT] notes.txt : draft...\n\
             \n\
             Question: budget report\n\
             \n\
             Answer:"
        );
    }

    #[test]
    fn test_build_prompt_does_not_escape() {
        let prompt = build_prompt(&["[Web] Tom & Jerry's \"show\""], "<who>?").unwrap();
        assert!(prompt.contains("Tom & Jerry's \"show\""));
        assert!(prompt.contains("Question: <who>?"));
    }

    #[test]
    fn test_custom_template() {
        let template = PromptTemplate::new("custom", "Q={{question}}|C={{context}}").unwrap();
        let rendered = template
            .render(&ChatPrompt::new(&["a", "b"], "q"))
            .unwrap();
        assert_eq!(rendered, "Q=q|C=a\nb");
        assert_eq!(template.id(), "custom");
    }

    #[test]
    fn test_unknown_variable_is_rejected() {
        let template = PromptTemplate::new("strict", "{{missing}}").unwrap();
        let result = template.render(&ChatPrompt::new(&["a"], "q"));
        assert!(matches!(result, Err(AppError::Prompt(_))));
    }

    #[test]
    fn test_invalid_template() {
        assert!(PromptTemplate::new("broken", "{{#if}}").is_err());
    }
}
