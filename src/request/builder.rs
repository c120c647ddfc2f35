//! Request descriptor construction
//!
//! Turns a connection context, an endpoint and per-call options into a
//! fully-specified `RequestDescriptor`. No I/O happens here and nothing can
//! fail; malformed input surfaces later from the transport.

use super::url::{append_query, encode_query, flatten_query, is_absolute, join_url};
use crate::case::{decamelize_keys, decamelize_object};
use crate::connection::ConnectionContext;
use crate::types::{JsonObject, JsonValue, Method, StringMap};

/// How query parameters reach the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryEncoding {
    /// Attached as structured parameters, encoded by the transport
    #[default]
    Structured,
    /// Pre-serialised into the URL, for transports without query support
    Inline,
}

/// Request payload
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// JSON-encoded body
    Json(JsonValue),
    /// `application/x-www-form-urlencoded` body
    Form(JsonObject),
}

/// Everything a transport needs to perform one HTTP exchange
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    /// HTTP method
    pub method: Method,
    /// Final URL (may already carry a query string)
    pub url: String,
    /// Headers, authentication included
    pub headers: StringMap,
    /// Structured query parameters, wire-named
    pub query: Option<JsonObject>,
    /// Payload, wire-named
    pub body: Option<RequestBody>,
    /// Caller wants headers as well as the body
    pub full_response: bool,
    /// Verify TLS certificates
    pub reject_unauthorized: bool,
    /// Caller wants an incremental byte source instead of a buffered body
    pub streaming: bool,
}

impl RequestDescriptor {
    /// Structured query parameters flattened into key/value pairs
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.query.as_ref().map(flatten_query).unwrap_or_default()
    }
}

/// Per-call inputs to [`build`]
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Extra headers, merged over the connection's headers
    pub headers: StringMap,
    /// Request payload in caller naming
    pub body: Option<RequestBody>,
    /// Query parameters in caller naming
    pub query: Option<JsonObject>,
    /// Request the full response envelope
    pub full_response: bool,
    /// Request a streaming response
    pub streaming: bool,
    /// Query encoding supported by the transport
    pub query_encoding: QueryEncoding,
}

impl BuildOptions {
    /// Create empty build options
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set a JSON body
    #[must_use]
    pub fn json(mut self, body: JsonValue) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    /// Set a form-encoded body
    #[must_use]
    pub fn form(mut self, fields: JsonObject) -> Self {
        self.body = Some(RequestBody::Form(fields));
        self
    }

    /// Set query parameters
    #[must_use]
    pub fn query(mut self, query: JsonObject) -> Self {
        self.query = Some(query);
        self
    }

    /// Request the full response envelope
    #[must_use]
    pub fn full_response(mut self, full: bool) -> Self {
        self.full_response = full;
        self
    }

    /// Request a streaming response
    #[must_use]
    pub fn streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    /// Set the query encoding
    #[must_use]
    pub fn query_encoding(mut self, encoding: QueryEncoding) -> Self {
        self.query_encoding = encoding;
        self
    }
}

/// Build a request descriptor
///
/// Relative endpoints are joined to the connection's base URL; absolute
/// `http(s)://` endpoints are used as-is. Body and query field names are
/// converted to snake_case, values are left alone.
pub fn build(
    context: &ConnectionContext,
    method: Method,
    endpoint: &str,
    options: BuildOptions,
) -> RequestDescriptor {
    let mut url = if is_absolute(endpoint) {
        endpoint.to_string()
    } else {
        join_url(&[context.base_url(), endpoint])
    };

    let mut headers = context.headers().clone();
    headers.extend(options.headers);

    let body = options.body.map(|body| match body {
        RequestBody::Json(value) => RequestBody::Json(decamelize_keys(&value)),
        RequestBody::Form(fields) => RequestBody::Form(decamelize_object(&fields)),
    });

    let mut query = options.query.as_ref().map(decamelize_object);
    if options.query_encoding == QueryEncoding::Inline {
        if let Some(params) = query.take() {
            url = append_query(&url, &encode_query(&flatten_query(&params)));
        }
    }

    RequestDescriptor {
        method,
        url,
        headers,
        query,
        body,
        full_response: options.full_response,
        reject_unauthorized: context.reject_unauthorized(),
        streaming: options.streaming,
    }
}
