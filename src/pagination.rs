/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! Lazy pagination over document lists
//!
//! A [`Paginator`] fetches one page per call to `next`, moving the offset
//! forward by the page size, until the server returns an empty page.

use crate::client::FrappeClient;
use crate::constants::DEFAULT_PAGE_LENGTH;
use crate::error::{FrappeError, FrappeResult};
use crate::model::DocQuery;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::iter::FusedIterator;
use tracing::debug;

/// One slice of a document list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    /// Offset of the first record of this page
    pub offset: u64,
    /// Records as returned by the server
    pub records: Vec<Value>,
}

impl Page {
    /// Number of records in this page
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Checks whether the page holds no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Converts every record into `T`
    pub fn records_as<T: DeserializeOwned>(&self) -> FrappeResult<Vec<T>> {
        self.records
            .iter()
            .cloned()
            .map(|record| serde_json::from_value(record).map_err(FrappeError::from))
            .collect()
    }

    /// Consumes the page, returning its records
    #[must_use]
    pub fn into_records(self) -> Vec<Value> {
        self.records
    }
}

#[derive(Deserialize)]
struct ListBody {
    #[serde(default)]
    data: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageState {
    Fetching(u64),
    Exhausted,
}

/// Forward-only sequence of list pages
///
/// Each advance is one blocking list request with `limit_start` set to the
/// current offset, subject to the same 403 re-login rule as any other call.
/// The sequence ends on the first empty page, a 404, or when the next offset
/// would not fit in a `u64`. Any other failure is yielded once as an error
/// and ends the sequence. Start over by asking the client for a new paginator.
pub struct Paginator<'a> {
    client: &'a FrappeClient,
    doctype: String,
    query: DocQuery,
    page_size: u64,
    state: PageState,
}

impl<'a> Paginator<'a> {
    pub(crate) fn new(client: &'a FrappeClient, doctype: &str, query: &DocQuery) -> Self {
        let page_size = query
            .limit_page_length
            .filter(|&length| length > 0)
            .unwrap_or(DEFAULT_PAGE_LENGTH);
        Self {
            client,
            doctype: doctype.to_string(),
            query: query.clone(),
            page_size,
            state: PageState::Fetching(query.limit_start.unwrap_or(0)),
        }
    }

    /// Page size used for every request
    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Offset of the next page, `None` once the sequence has ended
    pub fn next_offset(&self) -> Option<u64> {
        match self.state {
            PageState::Fetching(offset) => Some(offset),
            PageState::Exhausted => None,
        }
    }

    fn fetch(&self, offset: u64) -> FrappeResult<Option<Page>> {
        let params = self
            .query
            .params_with_limits(Some(offset), Some(self.page_size))?;
        let response = self.client.get_list(&self.doctype, &params)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("{} returned 404 at offset {}, previous page was the last", self.doctype, offset);
            return Ok(None);
        }
        if !status.is_success() {
            return Err(FrappeError::Unexpected(status));
        }

        let records = response.json::<ListBody>()?.data.unwrap_or_default();
        if records.is_empty() {
            debug!("{} has no records at offset {}", self.doctype, offset);
            return Ok(None);
        }
        Ok(Some(Page { offset, records }))
    }
}

impl Iterator for Paginator<'_> {
    type Item = FrappeResult<Page>;

    fn next(&mut self) -> Option<Self::Item> {
        let PageState::Fetching(offset) = self.state else {
            return None;
        };

        match self.fetch(offset) {
            Ok(Some(page)) => {
                self.state = match offset.checked_add(self.page_size) {
                    Some(next) => PageState::Fetching(next),
                    None => PageState::Exhausted,
                };
                Some(Ok(page))
            }
            Ok(None) => {
                self.state = PageState::Exhausted;
                None
            }
            Err(e) => {
                self.state = PageState::Exhausted;
                Some(Err(e))
            }
        }
    }
}

impl FusedIterator for Paginator<'_> {}
