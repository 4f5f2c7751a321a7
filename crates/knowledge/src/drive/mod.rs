//! Storage account access: query building, REST client and locator.

pub mod client;
pub mod locator;
pub mod query;

pub use client::{DriveApi, DriveClient, DEFAULT_DRIVE_URL};
pub use locator::DocumentLocator;
pub use query::{build_search_query, escape_query_value};
