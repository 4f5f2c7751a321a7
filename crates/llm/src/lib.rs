//! Response generation for driverag.
//!
//! A provider-agnostic chat-completion abstraction. The active backend is
//! picked by configuration through [`create_client`].
//!
//! # Providers
//! - **Ollama**: Local LLM runtime (default)
//! - **OpenAI**: Hosted chat-completions API (or any compatible server)
//!
//! # Example
//! ```no_run
//! use driverag_llm::{LlmClient, LlmRequest, providers::OllamaClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new();
//! let request = LlmRequest::new("Hello, world!", "llama3.2");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export main types
pub use client::{ChatMessage, LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::{create_client, create_client_from_config};
pub use providers::{OllamaClient, OpenAiClient};
pub use types::ProviderType;
