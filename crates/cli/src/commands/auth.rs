//! Auth command handler.
//!
//! Authorizes read-only access to the storage account and caches the token.

use clap::Args;
use driverag_core::{config::AppConfig, AppResult};
use driverag_knowledge::CredentialStore;

/// Authorize storage access and cache the token
#[derive(Args, Debug, Default)]
pub struct AuthCommand {
    /// Run the consent flow even if a valid token is cached
    #[arg(short, long)]
    pub force: bool,
}

impl AuthCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing auth command");

        let store = CredentialStore::new(&config.drive, super::http_client(config)?);

        let credentials = if self.force {
            let credentials = store.authorize().await?;
            credentials.save(store.token_file())?;
            credentials
        } else {
            store.get_valid_credentials().await?
        };

        println!("Token cached in {}", store.token_file().display());
        if let Some(expiry) = credentials.expiry {
            println!("Access token valid until {}", expiry.to_rfc3339());
        }

        Ok(())
    }
}
