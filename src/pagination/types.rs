//! Pagination types
//!
//! Per-call list options, the metadata read from response headers and the
//! two result shapes a list call can produce.

use crate::http::{ByteStream, ResponseEnvelope};
use crate::types::{JsonObject, JsonValue};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Total number of records
pub const TOTAL_HEADER: &str = "x-total";
/// Next page number
pub const NEXT_PAGE_HEADER: &str = "x-next-page";
/// Current page number
pub const PAGE_HEADER: &str = "x-page";
/// Previous page number
pub const PREV_PAGE_HEADER: &str = "x-prev-page";
/// Records per page
pub const PER_PAGE_HEADER: &str = "x-per-page";
/// Total number of pages
pub const TOTAL_PAGES_HEADER: &str = "x-total-pages";
/// RFC 5988 link relations
pub const LINK_HEADER: &str = "link";

/// Options of one list call
///
/// `page`, `max_pages` and `show_pagination` steer pagination; everything in
/// `query` is sent to the server as-is (after key translation).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListOptions {
    /// Fetch only this page; disables following `next` links
    pub page: Option<u32>,
    /// Stop once the server-reported page number reaches this bound
    pub max_pages: Option<u32>,
    /// Return pagination metadata (only honoured together with `page`)
    pub show_pagination: bool,
    /// Extra query parameters in caller naming
    pub query: JsonObject,
}

impl ListOptions {
    /// Create empty list options
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin a single page
    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Bound the number of pages followed
    #[must_use]
    pub fn max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    /// Ask for pagination metadata
    #[must_use]
    pub fn show_pagination(mut self, show: bool) -> Self {
        self.show_pagination = show;
        self
    }

    /// Add a query parameter
    ///
    /// `page`, `maxPages` and `showPagination` set the matching control
    /// instead, as [`from_object`](Self::from_object) does.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.set(key.into(), value.into());
        self
    }

    /// Split a flat caller record into controls and query parameters
    ///
    /// `page`, `maxPages` and `showPagination` are lifted out; every other
    /// key stays a query parameter. Numbers given as strings are accepted.
    pub fn from_object(object: JsonObject) -> Self {
        let mut options = Self::default();
        for (key, value) in object {
            options.set(key, value);
        }
        options
    }

    fn set(&mut self, key: String, value: JsonValue) {
        match key.as_str() {
            "page" => match as_u32(&value) {
                Some(page) => self.page = Some(page),
                None => {
                    self.query.insert(key, value);
                }
            },
            "maxPages" => self.max_pages = as_u32(&value),
            "showPagination" => {
                self.show_pagination = value
                    .as_bool()
                    .unwrap_or_else(|| value.as_str() == Some("true"));
            }
            _ => {
                self.query.insert(key, value);
            }
        }
    }

    /// Whether a single page is pinned
    ///
    /// Looks at the `page` actually sent. A page of `0`, `null`, `false` or
    /// `""` does not pin, so the chain is followed as without one.
    pub fn pins_page(&self) -> bool {
        match self.page {
            Some(page) => page > 0,
            None => self.query.get("page").is_some_and(is_truthy),
        }
    }

    /// Query parameters actually sent: `query` plus a pinned `page`
    pub fn query_options(&self) -> JsonObject {
        let mut query = self.query.clone();
        if let Some(page) = self.page {
            query.insert("page".to_string(), JsonValue::from(page));
        }
        query
    }

    /// The whole option set as one flat record, controls included
    pub fn to_object(&self) -> JsonObject {
        let mut object = self.query_options();
        if let Some(max_pages) = self.max_pages {
            object.insert("maxPages".to_string(), JsonValue::from(max_pages));
        }
        if self.show_pagination {
            object.insert("showPagination".to_string(), JsonValue::Bool(true));
        }
        object
    }
}

fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}

fn as_u32(value: &JsonValue) -> Option<u32> {
    match value {
        JsonValue::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Pagination details of a single response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMetadata {
    /// Total number of records
    pub total: Option<u64>,
    /// Next page number
    pub next: Option<u32>,
    /// Current page number
    pub current: Option<u32>,
    /// Previous page number
    pub previous: Option<u32>,
    /// Records per page
    pub per_page: Option<u32>,
    /// Total number of pages
    pub total_pages: Option<u32>,
}

impl PaginationMetadata {
    /// Read metadata from `x-*` response headers
    ///
    /// Missing, empty or non-numeric headers become `None`.
    pub fn from_response(response: &ResponseEnvelope) -> Self {
        Self {
            total: header_number(response, TOTAL_HEADER),
            next: header_number(response, NEXT_PAGE_HEADER),
            current: header_number(response, PAGE_HEADER),
            previous: header_number(response, PREV_PAGE_HEADER),
            per_page: header_number(response, PER_PAGE_HEADER),
            total_pages: header_number(response, TOTAL_PAGES_HEADER),
        }
    }
}

/// Parse a numeric response header
pub fn header_number<T: FromStr>(response: &ResponseEnvelope, name: &str) -> Option<T> {
    response
        .header(name)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
}

/// Result of a list call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PaginatedResult {
    /// Records of every page followed, in page order
    Records(Vec<JsonValue>),
    /// One pinned page with its metadata
    Page {
        /// Records of the page
        data: Vec<JsonValue>,
        /// Metadata from the page's headers
        pagination: PaginationMetadata,
    },
}

impl PaginatedResult {
    /// The records, whichever shape
    pub fn data(&self) -> &[JsonValue] {
        match self {
            Self::Records(data) | Self::Page { data, .. } => data,
        }
    }

    /// Consume the result, keeping the records
    pub fn into_data(self) -> Vec<JsonValue> {
        match self {
            Self::Records(data) | Self::Page { data, .. } => data,
        }
    }

    /// Pagination metadata, present only for a pinned page
    pub fn pagination(&self) -> Option<&PaginationMetadata> {
        match self {
            Self::Records(_) => None,
            Self::Page { pagination, .. } => Some(pagination),
        }
    }
}

/// Records carried by a response body
///
/// Arrays yield their elements, `null` yields nothing, any other value is a
/// single record.
pub fn body_records(body: JsonValue) -> Vec<JsonValue> {
    match body {
        JsonValue::Array(items) => items,
        JsonValue::Null => Vec::new(),
        other => vec![other],
    }
}

/// Per-call switches of [`RequestHelper::get`](super::RequestHelper::get)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetOptions {
    /// Return a live byte stream instead of paginated records
    pub stream: bool,
}

/// What [`RequestHelper::get`](super::RequestHelper::get) produced
pub enum GetResponse {
    /// Buffered, possibly aggregated records
    Data(PaginatedResult),
    /// Live body; the caller owns it and dropping it releases the connection
    Stream(ByteStream),
}

impl GetResponse {
    /// The records, if this is not a stream
    pub fn into_data(self) -> Option<PaginatedResult> {
        match self {
            Self::Data(result) => Some(result),
            Self::Stream(_) => None,
        }
    }

    /// The stream, if one was requested
    pub fn into_stream(self) -> Option<ByteStream> {
        match self {
            Self::Data(_) => None,
            Self::Stream(stream) => Some(stream),
        }
    }
}

impl fmt::Debug for GetResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Data(result) => f.debug_tuple("Data").field(result).finish(),
            Self::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}
