//! Configuration management for driverag.
//!
//! Configuration is merged from three sources, later ones winning:
//! - Built-in defaults
//! - A YAML config file (`.driverag/config.yaml` in the workspace)
//! - Environment variables, then command-line flags
//!
//! No secret is ever compiled in: API keys and the search engine id are
//! read from the environment, either directly or through the env-var names
//! given in the YAML file.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Providers the response generator can talk to.
pub const KNOWN_PROVIDERS: [&str; 2] = ["ollama", "openai"];

/// Characters of each document kept in the prompt context.
pub const DEFAULT_PREVIEW_CHARS: usize = 500;

/// Snippets kept from a web search.
pub const DEFAULT_MAX_WEB_RESULTS: usize = 3;

/// Main application configuration.
///
/// Built once in `main` and passed by reference to every component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding `.driverag/`
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Response generator backend ("ollama" or "openai")
    pub provider: String,

    /// Model identifier; `None` means the provider default
    pub model: Option<String>,

    /// Custom endpoint for the provider
    pub endpoint: Option<String>,

    /// Explicit API key for the provider
    pub api_key: Option<String>,

    /// Sampling temperature; `None` means the provider default
    pub temperature: Option<f32>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Storage account credentials
    pub drive: DriveSettings,

    /// Web fallback search
    pub search: SearchSettings,

    /// Characters of each document kept in the prompt
    pub preview_chars: usize,

    /// Per-request HTTP timeout
    pub request_timeout_secs: u64,

    /// YAML prompt definition replacing the built-in template
    pub prompt_file: Option<PathBuf>,

    /// LLM provider configurations from the config file
    pub llm: Option<LlmConfig>,
}

/// Where the OAuth client secret and the cached token live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveSettings {
    pub token_file: PathBuf,
    pub client_secret_file: PathBuf,
}

impl Default for DriveSettings {
    fn default() -> Self {
        Self {
            token_file: PathBuf::from("token.json"),
            client_secret_file: PathBuf::from("credentials.json"),
        }
    }
}

/// Custom Search API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    pub api_key: Option<String>,
    pub engine_id: Option<String>,
    pub max_results: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            engine_id: None,
            max_results: DEFAULT_MAX_WEB_RESULTS,
        }
    }
}

impl SearchSettings {
    /// Both the key and the engine id are present.
    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
            && self.engine_id.as_deref().is_some_and(|e| !e.is_empty())
    }
}

/// LLM section of config.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(rename = "activeProvider")]
    pub active_provider: String,

    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

/// Provider-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProviderConfig {
    OpenAI {
        #[serde(rename = "apiKeyEnv")]
        api_key_env: String,
        model: String,
        endpoint: Option<String>,
        temperature: Option<f32>,
    },
    Ollama {
        endpoint: String,
        model: String,
        temperature: Option<f32>,
    },
}

impl ProviderConfig {
    pub fn model(&self) -> &str {
        match self {
            Self::OpenAI { model, .. } | Self::Ollama { model, .. } => model,
        }
    }

    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::OpenAI { endpoint, .. } => endpoint.as_deref(),
            Self::Ollama { endpoint, .. } => Some(endpoint),
        }
    }

    pub fn temperature(&self) -> Option<f32> {
        match self {
            Self::OpenAI { temperature, .. } | Self::Ollama { temperature, .. } => *temperature,
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmConfig>,
    workspace: Option<WorkspaceSection>,
    drive: Option<DriveSection>,
    search: Option<SearchSection>,
    context: Option<ContextSection>,
    logging: Option<LoggingSection>,
    prompt: Option<PromptSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WorkspaceSection {
    path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DriveSection {
    #[serde(rename = "tokenFile")]
    token_file: Option<String>,
    #[serde(rename = "clientSecretFile")]
    client_secret_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SearchSection {
    #[serde(rename = "apiKeyEnv")]
    api_key_env: Option<String>,
    #[serde(rename = "engineIdEnv")]
    engine_id_env: Option<String>,
    #[serde(rename = "maxResults")]
    max_results: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ContextSection {
    #[serde(rename = "previewChars")]
    preview_chars: Option<usize>,
    #[serde(rename = "requestTimeoutSecs")]
    request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PromptSection {
    file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            provider: "ollama".to_string(), // Local-first default
            model: None,
            endpoint: None,
            api_key: None,
            temperature: None,
            log_level: None,
            verbose: false,
            no_color: false,
            drive: DriveSettings::default(),
            search: SearchSettings::default(),
            preview_chars: DEFAULT_PREVIEW_CHARS,
            request_timeout_secs: 120,
            prompt_file: None,
            llm: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the YAML file and the environment.
    ///
    /// Environment variables:
    /// - `DRIVERAG_WORKSPACE`: Override workspace path
    /// - `DRIVERAG_CONFIG`: Path to config file
    /// - `DRIVERAG_PROVIDER` / `DRIVERAG_MODEL` / `DRIVERAG_ENDPOINT`
    /// - `DRIVERAG_API_KEY`: Provider API key
    /// - `DRIVERAG_TOKEN_FILE` / `DRIVERAG_CLIENT_SECRET`: OAuth files
    /// - `DRIVERAG_SEARCH_API_KEY` / `DRIVERAG_SEARCH_ENGINE_ID`: web search
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load() -> AppResult<Self> {
        Self::load_with(None, None)
    }

    /// Like [`AppConfig::load`], but an explicit workspace or config file
    /// (e.g. from CLI flags) wins over the environment when choosing which
    /// YAML file to read.
    pub fn load_with(workspace: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(workspace) =
            workspace.or_else(|| std::env::var("DRIVERAG_WORKSPACE").ok().map(PathBuf::from))
        {
            config.workspace = workspace;
        }

        if let Some(config_file) =
            config_file.or_else(|| std::env::var("DRIVERAG_CONFIG").ok().map(PathBuf::from))
        {
            config.config_file = Some(config_file);
        }

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| config.default_config_path());

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        } else if config.config_file.is_some() {
            return Err(AppError::Config(format!(
                "Config file not found: {:?}",
                config_path
            )));
        }

        // Environment variables override YAML config
        if let Ok(provider) = std::env::var("DRIVERAG_PROVIDER") {
            config.provider = provider;
        }
        if let Ok(model) = std::env::var("DRIVERAG_MODEL") {
            config.model = Some(model);
        }
        if let Ok(endpoint) = std::env::var("DRIVERAG_ENDPOINT") {
            config.endpoint = Some(endpoint);
        }
        if let Ok(key) = std::env::var("DRIVERAG_API_KEY") {
            config.api_key = Some(key);
        }
        if let Ok(path) = std::env::var("DRIVERAG_TOKEN_FILE") {
            config.drive.token_file = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("DRIVERAG_CLIENT_SECRET") {
            config.drive.client_secret_file = PathBuf::from(path);
        }
        if let Ok(key) = std::env::var("DRIVERAG_SEARCH_API_KEY") {
            config.search.api_key = Some(key);
        }
        if let Ok(cx) = std::env::var("DRIVERAG_SEARCH_ENGINE_ID") {
            config.search.engine_id = Some(cx);
        }
        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }
        if std::env::var_os("NO_COLOR").is_some() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into a copy of this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        self.merge_yaml_str(&contents).map_err(|e| match e {
            AppError::Serialization(msg) => {
                AppError::Config(format!("Failed to parse config file {:?}: {}", path, msg))
            }
            other => other,
        })
    }

    fn merge_yaml_str(&self, contents: &str) -> AppResult<Self> {
        let config_file: ConfigFile = serde_yaml::from_str(contents)?;
        let mut result = self.clone();

        if let Some(path) = config_file.workspace.and_then(|ws| ws.path) {
            result.workspace = PathBuf::from(path);
        }

        if let Some(drive) = config_file.drive {
            if let Some(token_file) = drive.token_file {
                result.drive.token_file = PathBuf::from(token_file);
            }
            if let Some(secret) = drive.client_secret_file {
                result.drive.client_secret_file = PathBuf::from(secret);
            }
        }

        if let Some(search) = config_file.search {
            if let Some(var) = search.api_key_env {
                result.search.api_key = std::env::var(&var).ok();
            }
            if let Some(var) = search.engine_id_env {
                result.search.engine_id = std::env::var(&var).ok();
            }
            if let Some(max) = search.max_results {
                result.search.max_results = max;
            }
        }

        if let Some(context) = config_file.context {
            if let Some(chars) = context.preview_chars {
                result.preview_chars = chars;
            }
            if let Some(secs) = context.request_timeout_secs {
                result.request_timeout_secs = secs;
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        if let Some(file) = config_file.prompt.and_then(|p| p.file) {
            result.prompt_file = Some(PathBuf::from(file));
        }

        if let Some(llm) = config_file.llm {
            result.provider = llm.active_provider.clone();

            if let Some(provider_config) = llm.providers.get(&llm.active_provider) {
                result.model = Some(provider_config.model().to_string());
                result.endpoint = provider_config.endpoint().map(str::to_string);
                result.temperature = provider_config.temperature();
            }

            result.llm = Some(llm);
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Flags take precedence over environment variables and the file.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        workspace: Option<PathBuf>,
        config_file: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        token_file: Option<PathBuf>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(workspace) = workspace {
            self.workspace = workspace;
        }

        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(provider) = provider {
            if provider != self.provider {
                // Model and endpoint from the file belong to the old provider.
                self.model = None;
                self.endpoint = None;
                self.temperature = None;
            }
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = Some(model);
        }

        if let Some(token_file) = token_file {
            self.drive.token_file = token_file;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Path of the config file when none is given explicitly.
    pub fn default_config_path(&self) -> PathBuf {
        self.workspace.join(".driverag").join("config.yaml")
    }

    /// Model to use, falling back to the provider default.
    pub fn resolved_model(&self) -> String {
        self.model
            .clone()
            .unwrap_or_else(|| default_model(&self.provider).to_string())
    }

    /// Temperature to use, falling back to the provider default.
    pub fn resolved_temperature(&self) -> Option<f32> {
        self.temperature.or_else(|| default_temperature(&self.provider))
    }

    /// Get the configuration block for a provider.
    pub fn get_provider_config(&self, provider: &str) -> Option<&ProviderConfig> {
        self.llm.as_ref().and_then(|llm| llm.providers.get(provider))
    }

    /// Resolve the provider API key.
    ///
    /// `DRIVERAG_API_KEY` wins; otherwise the env var named by the
    /// provider's `apiKeyEnv` entry.
    pub fn resolve_api_key(&self, provider: &str) -> Option<String> {
        if let Some(ref key) = self.api_key {
            return Some(key.clone());
        }

        match self.get_provider_config(provider) {
            Some(ProviderConfig::OpenAI { api_key_env, .. }) => std::env::var(api_key_env).ok(),
            _ => None,
        }
    }

    /// Validate configuration for the active provider.
    pub fn validate(&self) -> AppResult<()> {
        let provider = self.provider.to_lowercase();

        if !KNOWN_PROVIDERS.contains(&provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        if provider == "openai" && self.resolve_api_key(&provider).is_none() {
            return Err(AppError::Config(
                "Provider 'openai' requires an API key (set DRIVERAG_API_KEY or apiKeyEnv)"
                    .to_string(),
            ));
        }

        if self.preview_chars == 0 {
            return Err(AppError::Config(
                "previewChars must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Default model for a provider.
pub fn default_model(provider: &str) -> &'static str {
    match provider.to_lowercase().as_str() {
        "openai" => "gpt-3.5-turbo",
        _ => "llama3.2",
    }
}

/// Default temperature for a provider.
pub fn default_temperature(provider: &str) -> Option<f32> {
    match provider.to_lowercase().as_str() {
        "openai" => Some(0.7),
        _ => None,
    }
}
