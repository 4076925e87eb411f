/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! Error types for the Frappe client

use reqwest::StatusCode;
use thiserror::Error;

/// Error returned by a session callback
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// Result alias used across the crate
pub type FrappeResult<T> = Result<T, FrappeError>;

/// Main error type for the library
#[derive(Debug, Error)]
pub enum FrappeError {
    /// Login did not succeed (rejected credentials, bad status, no session id)
    #[error("authentication error: {0}")]
    Authentication(String),

    /// Configuration is missing or inconsistent
    #[error("missing config: {0}")]
    MissingConfig(String),

    /// Transport level failure, passed through from reqwest
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON encoding or typed decoding failed
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A body that had to be JSON was not
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// The server answered with a status the operation cannot work with
    #[error("unexpected response status: {0}")]
    Unexpected(StatusCode),

    /// The session callback returned an error
    #[error("session callback failed: {0}")]
    Callback(#[source] CallbackError),

    /// A configured header name or value is not valid HTTP
    #[error("invalid header: {0}")]
    InvalidHeader(String),
}
