/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/
use crate::constants::{LIMIT_PAGE_LENGTH_PARAM, LIMIT_START_PARAM};
use crate::error::FrappeResult;
use pretty_simple_display::{DebugPretty, DisplaySimple};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Options for fetching documents of a doctype
///
/// With `name` set a single document is fetched, otherwise a list.
#[derive(DebugPretty, DisplaySimple, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct DocQuery {
    /// Name (primary key) of a single document
    pub name: Option<String>,
    /// Fields to return for each document
    pub fields: Option<Vec<String>>,
    /// Filters, either a mapping of field to `[operator, value]` or a list of triples
    pub filters: Option<Value>,
    /// Offset of the first document
    pub limit_start: Option<u64>,
    /// Maximum number of documents per response
    pub limit_page_length: Option<u64>,
    /// Sort clause, e.g. `modified desc`
    pub order_by: Option<String>,
    /// Whether the list should be returned as a lazy sequence of pages
    pub pagination: bool,
}

impl DocQuery {
    /// Creates an empty query for the whole list
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a query for a single document
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Sets the fields to return
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the filters
    #[must_use]
    pub fn filters(mut self, filters: Value) -> Self {
        self.filters = Some(filters);
        self
    }

    /// Sets the offset of the first document
    #[must_use]
    pub fn limit_start(mut self, limit_start: u64) -> Self {
        self.limit_start = Some(limit_start);
        self
    }

    /// Sets the page size
    #[must_use]
    pub fn limit_page_length(mut self, limit_page_length: u64) -> Self {
        self.limit_page_length = Some(limit_page_length);
        self
    }

    /// Sets the sort clause
    pub fn order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    /// Requests a lazy sequence of pages instead of a single response
    #[must_use]
    pub fn paginate(mut self) -> Self {
        self.pagination = true;
        self
    }

    /// Checks whether this query addresses a single document
    #[must_use]
    pub fn is_single(&self) -> bool {
        self.name.as_deref().is_some_and(|name| !name.is_empty())
    }

    /// Query parameters for a list call
    ///
    /// `fields` and `filters` are JSON-encoded; unset options are omitted.
    pub fn to_params(&self) -> FrappeResult<Vec<(String, String)>> {
        self.params_with_limits(self.limit_start, self.limit_page_length)
    }

    /// Query parameters for a list call with an explicit offset and page size
    pub fn params_with_limits(
        &self,
        limit_start: Option<u64>,
        limit_page_length: Option<u64>,
    ) -> FrappeResult<Vec<(String, String)>> {
        let mut params = Vec::new();
        if let Some(fields) = self.fields.as_ref().filter(|f| !f.is_empty()) {
            params.push(("fields".to_string(), serde_json::to_string(fields)?));
        }
        if let Some(filters) = self.filters.as_ref().filter(|f| !is_blank(f)) {
            params.push(("filters".to_string(), serde_json::to_string(filters)?));
        }
        if let Some(start) = limit_start {
            params.push((LIMIT_START_PARAM.to_string(), start.to_string()));
        }
        if let Some(length) = limit_page_length {
            params.push((LIMIT_PAGE_LENGTH_PARAM.to_string(), length.to_string()));
        }
        if let Some(order_by) = self.order_by.as_ref().filter(|o| !o.is_empty()) {
            params.push(("order_by".to_string(), order_by.clone()));
        }
        Ok(params)
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
