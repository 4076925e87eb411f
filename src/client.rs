/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! Blocking client for the Frappe REST API
//!
//! This module provides a small client that handles:
//! - Session (username/password) and token (API key/secret) authentication
//! - One transparent re-login and retry when a session request gets a 403
//! - Fetching single documents, lists, and lazily paginated lists
//!
//! # Example
//! ```ignore
//! use frappe_client::client::FrappeClient;
//! use frappe_client::config::Config;
//!
//! let config = Config::with_session("https://erp.example.com", "jane@example.com", "secret");
//! let client = FrappeClient::new(config)?;
//!
//! // Make requests - re-authentication is handled automatically
//! let user = client.get("frappe.auth.get_logged_user", &[])?;
//! ```

use crate::auth::{Auth, Credentials, SessionCallback, SessionState};
use crate::config::Config;
use crate::constants::{API_PREFIX, LOGIN_METHOD, METHOD_SEGMENT, RESOURCE_SEGMENT, USER_AGENT};
use crate::error::{FrappeError, FrappeResult};
use crate::model::{DocQuery, FrappeResponse, Payload};
use crate::pagination::Paginator;
use chrono::{DateTime, Utc};
use reqwest::blocking::Client as HttpClient;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode, Url};
use tracing::{debug, warn};

/// Result of [`FrappeClient::get_doc`]
pub enum DocFetch<'a> {
    /// A single response, for named documents or unpaginated lists
    Single(FrappeResponse),
    /// A lazy sequence of list pages
    Pages(Paginator<'a>),
}

impl<'a> DocFetch<'a> {
    /// Returns the response of a non-paginated fetch
    pub fn into_response(self) -> Option<FrappeResponse> {
        match self {
            Self::Single(response) => Some(response),
            Self::Pages(_) => None,
        }
    }

    /// Returns the page sequence of a paginated fetch
    pub fn into_pages(self) -> Option<Paginator<'a>> {
        match self {
            Self::Pages(pages) => Some(pages),
            Self::Single(_) => None,
        }
    }
}

/// Blocking client for the Frappe REST API
///
/// Every call is a blocking HTTP exchange. The session state is mutated only
/// by logins, so one instance can be shared between threads, though calls are
/// never issued concurrently by the client itself.
pub struct FrappeClient {
    auth: Auth,
    http_client: HttpClient,
    base_url: Url,
}

impl FrappeClient {
    /// Creates a new client, logging in first when session credentials come
    /// without stored session data
    ///
    /// # Arguments
    /// * `config` - Site URL, credentials, optional session data and headers
    ///
    /// # Returns
    /// * `Ok(FrappeClient)` - Client ready to use
    /// * `Err(FrappeError)` - If the configuration is invalid or the login fails
    pub fn new(config: Config) -> FrappeResult<Self> {
        Self::build(config, None, true)
    }

    /// Creates a new client that reports every successful login to `callback`
    ///
    /// Use the callback to persist the [`SessionState`] and pass it back as
    /// `session_data` next time to skip the login.
    pub fn with_callback(config: Config, callback: SessionCallback) -> FrappeResult<Self> {
        Self::build(config, Some(callback), true)
    }

    /// Creates a new client without performing the initial login
    ///
    /// With session credentials the login happens on the first request.
    pub fn new_lazy(config: Config, callback: Option<SessionCallback>) -> FrappeResult<Self> {
        Self::build(config, callback, false)
    }

    fn build(config: Config, callback: Option<SessionCallback>, eager: bool) -> FrappeResult<Self> {
        config.validate()?;

        let base_url = Url::parse(config.base_url())
            .map_err(|e| FrappeError::MissingConfig(format!("invalid url {}: {e}", config.url)))?;
        if base_url.cannot_be_a_base() {
            return Err(FrappeError::MissingConfig(format!(
                "url {} cannot be used as a base",
                config.url
            )));
        }

        let http_client = HttpClient::builder()
            .user_agent(USER_AGENT)
            .default_headers(default_headers(&config)?)
            .build()?;

        let login_url = endpoint(&base_url, &[API_PREFIX, METHOD_SEGMENT, LOGIN_METHOD]);
        let auth = Auth::new(
            config.credentials,
            http_client.clone(),
            login_url,
            config.session_data,
            callback,
        );

        if eager {
            auth.ensure_session()?;
        }

        Ok(Self {
            auth,
            http_client,
            base_url,
        })
    }

    /// Calls a whitelisted method with GET
    ///
    /// # Arguments
    /// * `method` - Dotted method path, e.g. `frappe.auth.get_logged_user`
    /// * `params` - Query parameters
    ///
    /// # Returns
    /// * `Ok(FrappeResponse)` - The response, whatever its status
    /// * `Err(FrappeError)` - On transport errors or a failed re-login
    pub fn get(&self, method: &str, params: &[(&str, &str)]) -> FrappeResult<FrappeResponse> {
        let url = endpoint(&self.base_url, &[API_PREFIX, METHOD_SEGMENT, method]);
        let params: Vec<(String, String)> = params
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        self.execute(Method::GET, &url, &params, &Payload::Empty)
    }

    /// Calls a whitelisted method with POST
    ///
    /// # Arguments
    /// * `method` - Dotted method path
    /// * `payload` - Form or JSON body
    pub fn post(&self, method: &str, payload: &Payload) -> FrappeResult<FrappeResponse> {
        let url = endpoint(&self.base_url, &[API_PREFIX, METHOD_SEGMENT, method]);
        self.execute(Method::POST, &url, &[], payload)
    }

    /// Fetches a document or a list of documents of `doctype`
    ///
    /// A named query fetches `/api/resource/{doctype}/{name}`. Otherwise the
    /// list is fetched, as a single response or, when `query.pagination` is
    /// set, as a lazy [`Paginator`]. Named queries are never paginated.
    pub fn get_doc(&self, doctype: &str, query: &DocQuery) -> FrappeResult<DocFetch<'_>> {
        if query.is_single() {
            let name = query.name.as_deref().unwrap_or_default();
            let url = endpoint(&self.base_url, &[API_PREFIX, RESOURCE_SEGMENT, doctype, name]);
            return self
                .execute(Method::GET, &url, &[], &Payload::Empty)
                .map(DocFetch::Single);
        }
        if query.pagination {
            return Ok(DocFetch::Pages(self.get_paginated_doc(doctype, query)));
        }
        let params = query.to_params()?;
        self.get_list(doctype, &params).map(DocFetch::Single)
    }

    /// Returns a lazy sequence over the pages of a list
    ///
    /// Nothing is fetched until the first call to `next`. `query.name` is
    /// ignored: the whole list of `doctype` is paged. See [`Paginator`].
    pub fn get_paginated_doc(&self, doctype: &str, query: &DocQuery) -> Paginator<'_> {
        Paginator::new(self, doctype, query)
    }

    pub(crate) fn get_list(
        &self,
        doctype: &str,
        params: &[(String, String)],
    ) -> FrappeResult<FrappeResponse> {
        let url = endpoint(&self.base_url, &[API_PREFIX, RESOURCE_SEGMENT, doctype]);
        self.execute(Method::GET, &url, params, &Payload::Empty)
    }

    /// Sends a request, logging in again and retrying exactly once on a 403
    /// in session mode
    fn execute(
        &self,
        method: Method,
        url: &Url,
        params: &[(String, String)],
        payload: &Payload,
    ) -> FrappeResult<FrappeResponse> {
        self.auth.ensure_session()?;

        let response = self.send(method.clone(), url, params, payload)?;
        if response.status() == StatusCode::FORBIDDEN && self.auth.is_session_mode() {
            warn!("Received 403 for {}, logging in again and retrying once", url.path());
            self.auth.login()?;
            return self.send(method, url, params, payload);
        }
        Ok(response)
    }

    fn send(
        &self,
        method: Method,
        url: &Url,
        params: &[(String, String)],
        payload: &Payload,
    ) -> FrappeResult<FrappeResponse> {
        debug!("{} {}", method, url);

        let mut request = self.http_client.request(method, url.clone());
        if !params.is_empty() {
            request = request.query(params);
        }
        request = payload.apply(request);
        request = self.auth.authorize(request);

        let response = request.send()?;
        debug!("Response status: {}", response.status());
        FrappeResponse::read(response)
    }

    /// Gets a copy of the current session state
    ///
    /// Always `None` in token mode.
    pub fn session(&self) -> Option<SessionState> {
        self.auth.session()
    }

    /// Time of the last successful login made by this client
    pub fn last_login(&self) -> Option<DateTime<Utc>> {
        self.auth.last_login()
    }

    /// Checks if this client authenticates with a session cookie
    #[must_use]
    pub fn is_session_mode(&self) -> bool {
        self.auth.is_session_mode()
    }

    /// Base URL of the site
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Gets a reference to the underlying Auth instance
    pub fn auth(&self) -> &Auth {
        &self.auth
    }
}

impl std::fmt::Debug for FrappeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrappeClient")
            .field("base_url", &self.base_url.as_str())
            .field("session_mode", &self.auth.is_session_mode())
            .finish_non_exhaustive()
    }
}

/// Appends path segments to `base`, percent-encoding each of them
fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Headers sent with every request: configured ones plus the token header
fn default_headers(config: &Config) -> FrappeResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    for (name, value) in &config.headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| FrappeError::InvalidHeader(format!("{name}: {e}")))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|e| FrappeError::InvalidHeader(format!("{name}: {e}")))?;
        headers.insert(header_name, header_value);
    }

    if let Credentials::Token { .. } = &config.credentials {
        let token = config.credentials.token_header().unwrap_or_default();
        let mut value = HeaderValue::from_str(&token)
            .map_err(|e| FrappeError::InvalidHeader(format!("authorization: {e}")))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}
