//! LLM provider factory.
//!
//! Turns configuration into a ready-to-use `LlmClient`, so the rest of the
//! pipeline never depends on which backend answers.

use crate::client::LlmClient;
use crate::providers::ollama::DEFAULT_OLLAMA_URL;
use crate::providers::openai::DEFAULT_OPENAI_URL;
use crate::providers::{OllamaClient, OpenAiClient};
use crate::types::ProviderType;
use driverag_core::{AppConfig, AppError, AppResult};
use std::sync::Arc;
use std::time::Duration;

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("ollama", "openai")
/// * `endpoint` - Optional custom endpoint URL
/// * `api_key` - API key, required by hosted providers
/// * `timeout` - Optional per-request timeout
///
/// # Errors
/// Returns an error if the provider is unknown, a required key is missing,
/// or the HTTP client cannot be built.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
    timeout: Option<Duration>,
) -> Result<Arc<dyn LlmClient>, String> {
    let provider_type =
        ProviderType::parse(provider).ok_or_else(|| format!("Unknown provider: {}", provider))?;

    match provider_type {
        ProviderType::Ollama => {
            let base_url = endpoint.unwrap_or(DEFAULT_OLLAMA_URL);
            let client = match timeout {
                Some(timeout) => {
                    OllamaClient::with_timeout(base_url, timeout).map_err(|e| e.to_string())?
                }
                None => OllamaClient::with_base_url(base_url),
            };
            Ok(Arc::new(client))
        }
        ProviderType::OpenAI => {
            let api_key = api_key
                .filter(|k| !k.is_empty())
                .ok_or_else(|| "OpenAI provider requires API key".to_string())?;
            let base_url = endpoint.unwrap_or(DEFAULT_OPENAI_URL);
            let client = match timeout {
                Some(timeout) => OpenAiClient::with_timeout(base_url, api_key, timeout)
                    .map_err(|e| e.to_string())?,
                None => OpenAiClient::with_base_url(base_url, api_key),
            };
            Ok(Arc::new(client))
        }
    }
}

/// Create the client selected by the application configuration.
pub fn create_client_from_config(config: &AppConfig) -> AppResult<Arc<dyn LlmClient>> {
    let api_key = config.resolve_api_key(&config.provider);
    let timeout = Duration::from_secs(config.request_timeout_secs);

    tracing::debug!(
        provider = %config.provider,
        endpoint = ?config.endpoint,
        "Creating LLM client"
    );

    create_client(
        &config.provider,
        config.endpoint.as_deref(),
        api_key.as_deref(),
        Some(timeout),
    )
    .map_err(AppError::Config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_ollama_client() {
        let client = create_client("ollama", None, None, None).unwrap();
        assert_eq!(client.provider_name(), "ollama");
    }

    #[test]
    fn test_create_ollama_with_custom_endpoint() {
        let client = create_client(
            "ollama",
            Some("http://localhost:8080"),
            None,
            Some(Duration::from_secs(5)),
        );
        assert!(client.is_ok());
    }

    #[test]
    fn test_create_openai_client() {
        let client = create_client("openai", None, Some("sk-test"), None).unwrap();
        assert_eq!(client.provider_name(), "openai");
    }

    #[test]
    fn test_openai_requires_api_key() {
        match create_client("openai", None, None, None) {
            Err(err) => assert!(err.contains("OpenAI provider requires API key")),
            Ok(_) => panic!("Expected error for OpenAI without API key"),
        }
        assert!(create_client("openai", None, Some(""), None).is_err());
    }

    #[test]
    fn test_unknown_provider() {
        match create_client("unknown", None, None, None) {
            Err(err) => assert!(err.contains("Unknown provider")),
            Ok(_) => panic!("Expected error for unknown provider"),
        }
    }

    #[test]
    fn test_create_from_default_config() {
        let config = AppConfig::default();
        let client = create_client_from_config(&config).unwrap();
        assert_eq!(client.provider_name(), "ollama");
    }
}
