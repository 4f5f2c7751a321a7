//! Credential store: always hands out a usable access token.
//!
//! Order of attempts:
//! 1. cached token file, if its access token is still valid
//! 2. refresh with the cached refresh token
//! 3. interactive consent flow
//!
//! Whatever comes out of 2 or 3 is written back to the token file before
//! it is returned.

use crate::auth::credentials::{ClientSecret, Credentials, DRIVE_READONLY_SCOPE};
use crate::auth::flow;
use chrono::Utc;
use driverag_core::config::DriveSettings;
use driverag_core::{AppError, AppResult};
use std::path::PathBuf;

/// Source of bearer tokens for the storage API.
#[async_trait::async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> AppResult<String>;
}

/// File-backed OAuth credential store.
pub struct CredentialStore {
    token_file: PathBuf,
    client_secret_file: PathBuf,
    http: reqwest::Client,
    interactive: bool,
}

impl CredentialStore {
    pub fn new(settings: &DriveSettings, http: reqwest::Client) -> Self {
        Self {
            token_file: settings.token_file.clone(),
            client_secret_file: settings.client_secret_file.clone(),
            http,
            interactive: true,
        }
    }

    /// Never fall back to the browser flow; fail with `AppError::Auth`
    /// instead.
    pub fn non_interactive(mut self) -> Self {
        self.interactive = false;
        self
    }

    pub fn token_file(&self) -> &PathBuf {
        &self.token_file
    }

    /// Return valid credentials, refreshing or re-authorizing as needed.
    pub async fn get_valid_credentials(&self) -> AppResult<Credentials> {
        let cached = Credentials::load(&self.token_file);

        if let Some(ref credentials) = cached {
            if credentials.is_valid(Utc::now()) {
                tracing::debug!("Cached access token is still valid");
                return Ok(credentials.clone());
            }
        }

        let credentials = match cached {
            Some(mut credentials) if credentials.can_refresh() => {
                match flow::refresh(&self.http, &mut credentials).await {
                    Ok(()) => credentials,
                    Err(e) => {
                        tracing::warn!("Token refresh failed, re-authorizing: {}", e);
                        self.authorize().await?
                    }
                }
            }
            _ => self.authorize().await?,
        };

        credentials.save(&self.token_file)?;
        Ok(credentials)
    }

    /// Run the consent flow with the operator's client secret.
    pub async fn authorize(&self) -> AppResult<Credentials> {
        if !self.interactive {
            return Err(AppError::Auth(format!(
                "No valid token in {:?} and interactive authorization is disabled",
                self.token_file
            )));
        }

        if !self.client_secret_file.exists() {
            return Err(AppError::Auth(format!(
                "Client secret file not found: {:?}. Download OAuth client credentials for a desktop app and save them there.",
                self.client_secret_file
            )));
        }

        tracing::info!("Generating a new token");
        let secret = ClientSecret::load(&self.client_secret_file)?;
        flow::run_consent_flow(&self.http, &secret, &[DRIVE_READONLY_SCOPE]).await
    }
}

#[async_trait::async_trait]
impl TokenProvider for CredentialStore {
    async fn access_token(&self) -> AppResult<String> {
        self.get_valid_credentials()
            .await?
            .token
            .ok_or_else(|| AppError::Auth("Credentials carry no access token".to_string()))
    }
}
