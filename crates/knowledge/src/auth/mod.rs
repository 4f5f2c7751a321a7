//! Storage account authorization.

pub mod credentials;
pub mod flow;
pub mod store;

pub use credentials::{ClientSecret, Credentials, DRIVE_READONLY_SCOPE};
pub use store::{CredentialStore, TokenProvider};
