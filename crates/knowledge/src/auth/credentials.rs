//! OAuth credential files.
//!
//! Two JSON files live on disk:
//! - the client secret downloaded from the cloud console (operator supplied)
//! - the authorized-user token file written by this tool
//!
//! Both use the layouts of Google's client libraries, so a token file
//! created by another tool for the same client can be reused.

use chrono::{DateTime, Duration, Utc};
use driverag_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Read-only access to the storage account.
pub const DRIVE_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/drive.readonly";

pub const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Tokens this close to expiry are treated as expired.
const EXPIRY_SKEW_SECS: i64 = 60;

fn default_auth_uri() -> String {
    DEFAULT_AUTH_URI.to_string()
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// OAuth client registration for an installed application.
#[derive(Clone, Deserialize)]
pub struct ClientSecret {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

#[derive(Deserialize)]
struct ClientSecretFile {
    installed: Option<ClientSecret>,
    web: Option<ClientSecret>,
}

impl ClientSecret {
    /// Load a client-secret file (`installed` or `web` section).
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::Auth(format!(
                "Failed to read client secret file {:?}: {}",
                path, e
            ))
        })?;
        Self::from_json(&content)
            .map_err(|e| AppError::Auth(format!("Invalid client secret file {:?}: {}", path, e)))
    }

    fn from_json(content: &str) -> AppResult<Self> {
        let file: ClientSecretFile = serde_json::from_str(content)?;
        file.installed.or(file.web).ok_or_else(|| {
            AppError::Auth("expected an 'installed' or 'web' client section".to_string())
        })
    }
}

impl std::fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSecret")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("auth_uri", &self.auth_uri)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

/// Token endpoint response for both the code and refresh grants.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Persisted authorized-user credentials.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    /// Current access token
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

impl Credentials {
    /// Build credentials from a fresh token response.
    pub fn from_token_response(
        secret: &ClientSecret,
        scopes: &[&str],
        response: TokenResponse,
        now: DateTime<Utc>,
    ) -> Self {
        let mut credentials = Self {
            token: None,
            refresh_token: None,
            token_uri: secret.token_uri.clone(),
            client_id: secret.client_id.clone(),
            client_secret: secret.client_secret.clone(),
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
            expiry: None,
        };
        credentials.apply_token_response(response, now);
        credentials
    }

    /// Store a new access token. A missing refresh token keeps the old one.
    pub fn apply_token_response(&mut self, response: TokenResponse, now: DateTime<Utc>) {
        self.token = Some(response.access_token);
        self.expiry = response.expires_in.map(|secs| now + Duration::seconds(secs));

        if let Some(refresh_token) = response.refresh_token {
            self.refresh_token = Some(refresh_token);
        }
        if let Some(scope) = response.scope {
            self.scopes = scope.split_whitespace().map(str::to_string).collect();
        }
    }

    /// The access token is past (or within a minute of) its expiry.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expiry {
            Some(expiry) => expiry <= now + Duration::seconds(EXPIRY_SKEW_SECS),
            None => false,
        }
    }

    /// An access token is present and not expired.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty()) && !self.is_expired(now)
    }

    pub fn can_refresh(&self) -> bool {
        self.refresh_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Load the token file. A missing or unreadable file yields `None`.
    pub fn load(path: &Path) -> Option<Self> {
        if !path.exists() {
            tracing::debug!("No token file at {:?}", path);
            return None;
        }

        let parsed = std::fs::read_to_string(path)
            .map_err(AppError::from)
            .and_then(|content| serde_json::from_str::<Credentials>(&content).map_err(Into::into));

        match parsed {
            Ok(credentials) => {
                tracing::info!("Loaded existing token from {:?}", path);
                Some(credentials)
            }
            Err(e) => {
                tracing::warn!("Ignoring unreadable token file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Write the token file.
    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| {
            AppError::Auth(format!("Failed to write token file {:?}: {}", path, e))
        })?;

        tracing::info!("Saved token to {:?}", path);
        Ok(())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("token_uri", &self.token_uri)
            .field("client_id", &self.client_id)
            .field("scopes", &self.scopes)
            .field("expiry", &self.expiry)
            .finish()
    }
}
