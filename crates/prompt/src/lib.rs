//! Prompt assembly for driverag.
//!
//! Joins retrieved context fragments and the user question into the single
//! user message sent to the model:
//! - Handlebars template rendering
//! - Built-in default template
//! - Optional YAML prompt definition supplied by the operator

pub mod builder;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::{build_prompt, PromptTemplate, DEFAULT_TEMPLATE};
pub use loader::load_prompt_file;
pub use types::{ChatPrompt, PromptDefinition};
