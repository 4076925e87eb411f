/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/
use crate::error::{FrappeError, FrappeResult};
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Raw response returned by the client
///
/// The body is read eagerly so the client can decide on a retry and callers
/// can inspect the status after the connection has been released.
#[derive(Debug, Clone)]
pub struct FrappeResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl FrappeResponse {
    /// Creates a response from its parts
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Reads a transport response to the end
    pub fn read(response: reqwest::blocking::Response) -> FrappeResult<Self> {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes()?.to_vec();
        Ok(Self::new(status, headers, body))
    }

    /// HTTP status code
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Checks if the status is 2xx
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Response headers
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw body bytes
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Body as text, replacing invalid UTF-8
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parses the body as JSON
    ///
    /// # Returns
    /// * `Ok(T)` - Deserialized body
    /// * `Err(FrappeError::Deserialization)` - If the body is not valid JSON for `T`
    pub fn json<T: DeserializeOwned>(&self) -> FrappeResult<T> {
        serde_json::from_slice(&self.body).map_err(|e| {
            FrappeError::Deserialization(format!("unable to process non JSON response: {e}"))
        })
    }

    /// Parses the `message` member that method calls wrap their result in
    pub fn message<T: DeserializeOwned>(&self) -> FrappeResult<T> {
        self.member("message")
    }

    /// Parses the `data` member that resource calls wrap their result in
    pub fn data<T: DeserializeOwned>(&self) -> FrappeResult<T> {
        self.member("data")
    }

    fn member<T: DeserializeOwned>(&self, key: &str) -> FrappeResult<T> {
        let mut body: Value = self.json()?;
        let value = body
            .get_mut(key)
            .map(Value::take)
            .ok_or_else(|| FrappeError::Deserialization(format!("response has no `{key}` member")))?;
        Ok(serde_json::from_value(value)?)
    }
}
