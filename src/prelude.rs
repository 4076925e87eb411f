/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! # Frappe Client Prelude
//!
//! Imports the types needed for most interactions with a Frappe site.
//!
//! ```rust
//! use frappe_client::prelude::*;
//!
//! let config = Config::with_token("https://erp.example.com", "api_key", "api_secret");
//! let query = DocQuery::new().fields(["name"]).paginate();
//! ```

// ============================================================================
// CORE CONFIGURATION AND SETUP
// ============================================================================

/// Configuration for the Frappe client
pub use crate::config::Config;

/// Library version information
pub use crate::{VERSION, version};

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Main error type and result alias
pub use crate::error::{CallbackError, FrappeError, FrappeResult};

// ============================================================================
// AUTHENTICATION AND SESSION MANAGEMENT
// ============================================================================

/// Credentials, session state and login callback
pub use crate::auth::{Auth, Credentials, SessionCallback, SessionState};

// ============================================================================
// CLIENT
// ============================================================================

/// Request client
pub use crate::client::{DocFetch, FrappeClient};

/// Pagination
pub use crate::pagination::{Page, Paginator};

// ============================================================================
// MODELS
// ============================================================================

/// Request bodies, document queries and responses
pub use crate::model::{DocQuery, FrappeResponse, Payload};

// ============================================================================
// UTILITIES
// ============================================================================

/// Logging utilities
pub use crate::utils::logger::setup_logger;

/// Global constants
pub use crate::constants::*;

// ============================================================================
// RE-EXPORTS FROM EXTERNAL CRATES
// ============================================================================

pub use serde::{Deserialize, Serialize};
pub use std::sync::Arc;
pub use tracing::{debug, error, info, warn};

/// Re-export chrono for login timestamps
pub use chrono::{DateTime, Utc};

/// Re-export reqwest types that appear in responses
pub use reqwest::StatusCode;
