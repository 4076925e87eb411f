/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! Authentication module for the Frappe API
//!
//! This module provides the authentication state used by the client:
//! - Username/password session auth backed by the `sid` cookie
//! - API key/secret token auth sent as an `Authorization` header
//! - Re-authentication on demand, with a callback fired after every login

use crate::constants::SESSION_ID_KEY;
use crate::error::{CallbackError, FrappeError, FrappeResult};
use chrono::{DateTime, Utc};
use pretty_simple_display::{DebugPretty, DisplaySimple};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::COOKIE;
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, error, info};

/// Function invoked synchronously with the new session after every successful login
///
/// Returning an error aborts the operation that triggered the login.
pub type SessionCallback = Arc<dyn Fn(&SessionState) -> Result<(), CallbackError> + Send + Sync>;

/// Credentials for one of the two supported authentication modes
#[derive(DebugPretty, DisplaySimple, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Credentials {
    /// Username/password login producing a server-side session
    Session {
        /// Login user, usually an email address
        username: String,
        /// Login password
        #[serde(skip_serializing)]
        password: String,
    },
    /// Long-lived API key/secret pair, no login step
    Token {
        /// API key of the user
        api_key: String,
        /// API secret of the user
        #[serde(skip_serializing)]
        api_secret: String,
    },
}

impl Credentials {
    /// Creates session credentials
    pub fn session(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Session {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Creates token credentials
    pub fn token(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self::Token {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Checks if these credentials use session (cookie) authentication
    #[must_use]
    pub fn is_session(&self) -> bool {
        matches!(self, Self::Session { .. })
    }

    /// Value of the `Authorization` header for token credentials
    ///
    /// Returns `None` for session credentials.
    #[must_use]
    pub fn token_header(&self) -> Option<String> {
        match self {
            Self::Token {
                api_key,
                api_secret,
            } => Some(format!("token {api_key}:{api_secret}")),
            Self::Session { .. } => None,
        }
    }
}

/// Account and session metadata set by a successful login
///
/// The server hands these out as cookies (`sid`, `full_name`, `system_user`,
/// `user_id`, `user_image`). Keys are kept sorted so the `Cookie` header built
/// from them is stable.
#[derive(DebugPretty, DisplaySimple, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct SessionState(BTreeMap<String, String>);

impl SessionState {
    /// Creates an empty session state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a session state from `(name, value)` cookie pairs
    pub fn from_cookies<I, K, V>(cookies: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        cookies.into_iter().collect()
    }

    /// Gets a value by key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Inserts or replaces a value, returning the previous one
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Checks whether a key is present
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Server-side session id
    #[must_use]
    pub fn sid(&self) -> Option<&str> {
        self.get(SESSION_ID_KEY)
    }

    /// Display name of the logged in user
    #[must_use]
    pub fn full_name(&self) -> Option<&str> {
        self.get("full_name")
    }

    /// Id of the logged in user
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.get("user_id")
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Checks whether the state has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(key, value)` pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Renders the state as a `Cookie` header value, e.g. `full_name=Jane; sid=abc`
    #[must_use]
    pub fn cookie_header(&self) -> String {
        self.iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Consumes the state, returning the underlying map
    #[must_use]
    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SessionState {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<BTreeMap<String, String>> for SessionState {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl IntoIterator for SessionState {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[derive(Default)]
struct SessionSlot {
    state: Option<SessionState>,
    last_login: Option<DateTime<Utc>>,
}

/// Authentication manager for the Frappe API
///
/// Owns the session state. Request paths only read it; [`Auth::login`] is the
/// single writer.
pub struct Auth {
    credentials: Credentials,
    client: Client,
    login_url: Url,
    callback: Option<SessionCallback>,
    session: RwLock<SessionSlot>,
}

impl Auth {
    /// Creates a new Auth instance
    ///
    /// # Arguments
    /// * `credentials` - Session or token credentials
    /// * `client` - Transport shared with the request client
    /// * `login_url` - Full URL of the login endpoint
    /// * `session_data` - Previously stored session, used instead of logging in
    /// * `callback` - Invoked after every successful login
    pub fn new(
        credentials: Credentials,
        client: Client,
        login_url: Url,
        session_data: Option<SessionState>,
        callback: Option<SessionCallback>,
    ) -> Self {
        Self {
            credentials,
            client,
            login_url,
            callback,
            session: RwLock::new(SessionSlot {
                state: session_data,
                last_login: None,
            }),
        }
    }

    /// Credentials in use
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Checks if this instance authenticates with a session cookie
    #[must_use]
    pub fn is_session_mode(&self) -> bool {
        self.credentials.is_session()
    }

    /// Gets a copy of the current session state, if any
    pub fn session(&self) -> Option<SessionState> {
        self.read_slot().state.clone()
    }

    /// Time of the last successful login made by this instance
    pub fn last_login(&self) -> Option<DateTime<Utc>> {
        self.read_slot().last_login
    }

    /// Logs in if session mode is active and no session exists yet
    ///
    /// Token mode never logs in.
    pub fn ensure_session(&self) -> FrappeResult<()> {
        if !self.is_session_mode() || self.read_slot().state.is_some() {
            return Ok(());
        }
        info!("No active session, logging in");
        self.login().map(|_| ())
    }

    /// Performs a login with the session credentials
    ///
    /// Stores the resulting session and then invokes the callback, if any.
    ///
    /// # Returns
    /// * `Ok(SessionState)` - The new session
    /// * `Err(FrappeError::Authentication)` - If the server rejects the login or
    ///   cannot be reached
    /// * `Err(FrappeError::Callback)` - If the callback fails
    pub fn login(&self) -> FrappeResult<SessionState> {
        let Credentials::Session { username, password } = &self.credentials else {
            return Err(FrappeError::MissingConfig(
                "username and password are required for session login".to_string(),
            ));
        };

        info!("Logging in as {}", username);
        debug!("Sending login request to: {}", self.login_url);

        let response = self
            .client
            .post(self.login_url.clone())
            .form(&[("usr", username.as_str()), ("pwd", password.as_str())])
            .send()
            .map_err(|e| {
                error!("Login request failed: {}", e);
                FrappeError::Authentication(format!("login request failed: {e}"))
            })?;

        let status = response.status();
        let state: SessionState = response
            .cookies()
            .map(|cookie| (cookie.name().to_string(), cookie.value().to_string()))
            .collect();

        if status == StatusCode::FORBIDDEN {
            error!("Login rejected with status {}", status);
            return Err(FrappeError::Authentication(
                "invalid session: the server rejected the credentials".to_string(),
            ));
        }
        if status != StatusCode::OK {
            let body = response.text().unwrap_or_default();
            error!("Login failed with status {}: {}", status, body);
            return Err(FrappeError::Authentication(format!(
                "login failed with status {status}"
            )));
        }
        if state.sid().is_none() {
            error!("Login response did not set a session id");
            return Err(FrappeError::Authentication(
                "login response did not set a session id".to_string(),
            ));
        }

        {
            let mut slot = self.session.write().unwrap_or_else(PoisonError::into_inner);
            slot.state = Some(state.clone());
            slot.last_login = Some(Utc::now());
        }

        info!("✓ Login successful, user: {}", state.user_id().unwrap_or(username));

        if let Some(callback) = &self.callback {
            callback(&state).map_err(FrappeError::Callback)?;
        }
        Ok(state)
    }

    /// Adds the session cookie to a request when a session exists
    pub fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.read_slot().state {
            Some(state) if !state.is_empty() => request.header(COOKIE, state.cookie_header()),
            _ => request,
        }
    }

    fn read_slot(&self) -> std::sync::RwLockReadGuard<'_, SessionSlot> {
        self.session.read().unwrap_or_else(PoisonError::into_inner)
    }
}
