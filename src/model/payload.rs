use reqwest::blocking::RequestBuilder;
use serde_json::Value;

/// Body of a POST request
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Payload {
    /// No body
    #[default]
    Empty,
    /// `application/x-www-form-urlencoded` pairs
    Form(Vec<(String, String)>),
    /// JSON document
    Json(Value),
}

impl Payload {
    /// Creates a form payload from `(name, value)` pairs
    pub fn form<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Form(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Creates a JSON payload
    #[must_use]
    pub fn json(value: Value) -> Self {
        Self::Json(value)
    }

    pub(crate) fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::Empty => request,
            Self::Form(pairs) => request.form(pairs),
            Self::Json(value) => request.json(value),
        }
    }
}
