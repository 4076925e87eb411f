//! # Frappe Client
//!
//! A blocking client for the REST API of Frappe application servers.
//!
//! ## Features
//!
//! - Session authentication with username/password (`sid` cookie)
//! - Token authentication with an API key/secret pair
//! - One automatic re-login and retry when a session request gets a 403
//! - A callback receiving the session after every login, so it can be stored
//!   and reused to skip the next login
//! - Single document and list fetches with fields, filters, offsets and sort
//! - Lazy pagination over lists as a plain [`Iterator`]
//!
//! ## Example
//!
//! ```ignore
//! use frappe_client::prelude::*;
//!
//! let config = Config::from_env()?;
//! let client = FrappeClient::new(config)?;
//!
//! let query = DocQuery::new()
//!     .fields(["name", "status"])
//!     .filters(serde_json::json!({"status": ["=", "Open"]}))
//!     .limit_page_length(50);
//!
//! for page in client.get_paginated_doc("ToDo", &query) {
//!     let page = page?;
//!     info!("{} records from offset {}", page.len(), page.offset);
//! }
//! ```

/// Authentication state and credentials
pub mod auth;
/// The request client
pub mod client;
/// Client configuration
pub mod config;
/// Global constants
pub mod constants;
/// Error types
pub mod error;
/// Request and response models
pub mod model;
/// Lazy list pagination
pub mod pagination;
/// Commonly used re-exports
pub mod prelude;
/// Environment and logging helpers
pub mod utils;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the library version
#[must_use]
pub fn version() -> &'static str {
    VERSION
}

const _: () = {
    const fn assert_send_sync<T: Send + Sync>() {}
    let _ = assert_send_sync::<client::FrappeClient>;
    let _ = assert_send_sync::<error::FrappeError>;
    let _ = assert_send_sync::<auth::SessionState>;
};
