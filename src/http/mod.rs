//! HTTP transport module
//!
//! Executes request descriptors built by the `request` module.
//!
//! # Features
//!
//! - **Transport trait**: the seam the pagination engine depends on
//! - **Automatic Retries**: Configurable retry logic with backoff
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Streaming**: Incremental bodies for downloads

mod client;
mod rate_limit;
mod transport;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use transport::{ByteStream, ResponseEnvelope, Transport};

#[cfg(test)]
mod tests;
