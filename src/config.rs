/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/
use crate::auth::{Credentials, SessionState};
use crate::constants::{ENV_API_KEY, ENV_API_SECRET, ENV_PASSWORD, ENV_URL, ENV_USERNAME};
use crate::error::{FrappeError, FrappeResult};
use crate::utils::config::{get_env_pair, get_env_required};
use dotenv::dotenv;
use pretty_simple_display::{DebugPretty, DisplaySimple};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(DebugPretty, DisplaySimple, Serialize, Deserialize, Clone, PartialEq)]
/// Main configuration for the Frappe API client
pub struct Config {
    /// Base URL of the Frappe site, e.g. `https://erp.example.com`
    pub url: String,
    /// Authentication credentials
    pub credentials: Credentials,
    /// Previously stored session; when present no login is made at construction
    #[serde(default, skip_serializing)]
    pub session_data: Option<SessionState>,
    /// Extra headers sent with every request, login included
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl Config {
    /// Creates a configuration using username/password session auth
    pub fn with_session(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self::with_credentials(url, Credentials::session(username, password))
    }

    /// Creates a configuration using API key/secret token auth
    pub fn with_token(
        url: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self::with_credentials(url, Credentials::token(api_key, api_secret))
    }

    /// Creates a configuration from explicit credentials
    pub fn with_credentials(url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            url: url.into(),
            credentials,
            session_data: None,
            headers: BTreeMap::new(),
        }
    }

    /// Creates a configuration from environment variables
    ///
    /// Loads `.env` first, then reads `FRAPPE_URL` together with either
    /// `FRAPPE_USERNAME`/`FRAPPE_PASSWORD` or `FRAPPE_API_KEY`/`FRAPPE_API_SECRET`.
    /// Session credentials take precedence when both pairs are set.
    pub fn from_env() -> FrappeResult<Self> {
        match dotenv() {
            Ok(_) => debug!("Successfully loaded .env file"),
            Err(e) => debug!("Failed to load .env file: {e}"),
        }

        let url = get_env_required(ENV_URL)?;

        let credentials = if let Some((username, password)) = get_env_pair(ENV_USERNAME, ENV_PASSWORD) {
            Credentials::session(username, password)
        } else if let Some((api_key, api_secret)) = get_env_pair(ENV_API_KEY, ENV_API_SECRET) {
            Credentials::token(api_key, api_secret)
        } else {
            return Err(FrappeError::MissingConfig(format!(
                "set {ENV_USERNAME}/{ENV_PASSWORD} or {ENV_API_KEY}/{ENV_API_SECRET}"
            )));
        };

        Ok(Self::with_credentials(url, credentials))
    }

    /// Sets a previously stored session so construction skips the login
    #[must_use]
    pub fn session_data(mut self, session_data: SessionState) -> Self {
        self.session_data = Some(session_data);
        self
    }

    /// Adds a header sent with every request
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Base URL without trailing slashes
    pub fn base_url(&self) -> &str {
        self.url.trim().trim_end_matches('/')
    }

    /// Checks the configuration for inconsistencies
    ///
    /// # Returns
    /// * `Ok(())` - If the configuration is usable
    /// * `Err(FrappeError::MissingConfig)` - If the URL or credentials are blank,
    ///   or session data is combined with token credentials
    pub fn validate(&self) -> FrappeResult<()> {
        if self.base_url().is_empty() {
            return Err(FrappeError::MissingConfig("url is required".to_string()));
        }
        match &self.credentials {
            Credentials::Session { username, password } => {
                if username.is_empty() || password.is_empty() {
                    return Err(FrappeError::MissingConfig(
                        "missing user, password for session based auth".to_string(),
                    ));
                }
            }
            Credentials::Token {
                api_key,
                api_secret,
            } => {
                if api_key.is_empty() || api_secret.is_empty() {
                    return Err(FrappeError::MissingConfig(
                        "missing api key, api secret for token based auth".to_string(),
                    ));
                }
                // 403 re-logins need a username and password
                if self.session_data.is_some() {
                    return Err(FrappeError::MissingConfig(
                        "session data requires username and password credentials".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}
