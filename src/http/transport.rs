//! Transport abstraction
//!
//! The pagination engine only ever talks to a `Transport`. `HttpClient` is
//! the production implementation; tests plug in scripted ones.

use crate::error::Result;
use crate::request::{QueryEncoding, RequestDescriptor};
use crate::types::JsonValue;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use reqwest::header::HeaderMap;
use std::pin::Pin;

/// Incremental response body
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// Status, headers and decoded body of one HTTP exchange
#[derive(Debug, Clone)]
pub struct ResponseEnvelope {
    /// HTTP status code
    pub status: u16,
    /// Response headers (case-insensitive lookup)
    pub headers: HeaderMap,
    /// Decoded JSON body, `null` when the body was empty
    pub body: JsonValue,
}

impl ResponseEnvelope {
    /// Create an envelope
    pub fn new(status: u16, headers: HeaderMap, body: JsonValue) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Header value as a string, if present and valid UTF-8
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Consume the envelope, keeping only the body
    pub fn into_body(self) -> JsonValue {
        self.body
    }
}

/// Executes request descriptors
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform a buffered exchange
    async fn execute(&self, request: RequestDescriptor) -> Result<ResponseEnvelope>;

    /// Perform an exchange and hand back the body as it arrives
    async fn execute_stream(&self, request: RequestDescriptor) -> Result<ByteStream>;

    /// How this transport wants query parameters delivered
    fn query_encoding(&self) -> QueryEncoding {
        QueryEncoding::Structured
    }
}
