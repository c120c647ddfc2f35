//! HTTP transport with retry and rate limiting
//!
//! Executes request descriptors over reqwest and handles:
//! - Automatic retries with configurable backoff
//! - `Retry-After` on 429 responses
//! - Client-side rate limiting
//! - Certificate verification bypass per descriptor
//! - JSON body decoding and streaming bodies

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use super::transport::{ByteStream, ResponseEnvelope, Transport};
use crate::error::{Error, Result};
use crate::request::{flatten_query, RequestBody, RequestDescriptor};
use crate::types::{BackoffType, JsonValue, StringMap};
use async_trait::async_trait;
use futures::TryStreamExt;
use once_cell::sync::OnceCell;
use reqwest::{Client, Response, StatusCode};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// Maximum number of retries
    pub max_retries: u32,
    /// Initial delay for backoff
    pub initial_backoff: Duration,
    /// Maximum delay for backoff
    pub max_backoff: Duration,
    /// Type of backoff strategy
    pub backoff_type: BackoffType,
    /// Rate limiter configuration
    pub rate_limit: Option<RateLimiterConfig>,
    /// Headers added to every request, below descriptor headers
    pub default_headers: StringMap,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(60),
            backoff_type: BackoffType::Exponential,
            rate_limit: Some(RateLimiterConfig::default()),
            default_headers: StringMap::new(),
            user_agent: format!("pagewalk/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set max retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set backoff configuration
    pub fn backoff(mut self, backoff_type: BackoffType, initial: Duration, max: Duration) -> Self {
        self.config.backoff_type = backoff_type;
        self.config.initial_backoff = initial;
        self.config.max_backoff = max;
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Disable rate limiting
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// reqwest-backed [`Transport`]
pub struct HttpClient {
    client: Client,
    insecure_client: OnceCell<Client>,
    config: HttpClientConfig,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Self::client_builder(&config).build()?;
        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            insecure_client: OnceCell::new(),
            config,
            rate_limiter,
        })
    }

    fn client_builder(config: &HttpClientConfig) -> reqwest::ClientBuilder {
        Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
    }

    /// Client matching the descriptor's TLS policy
    ///
    /// The non-verifying client is only built the first time it is needed.
    fn client_for(&self, reject_unauthorized: bool) -> Result<&Client> {
        if reject_unauthorized {
            return Ok(&self.client);
        }
        self.insecure_client.get_or_try_init(|| {
            warn!("TLS certificate verification disabled for this connection");
            Self::client_builder(&self.config)
                .danger_accept_invalid_certs(true)
                .build()
                .map_err(Error::Http)
        })
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// The configuration this client was built with
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    fn prepare(&self, client: &Client, request: &RequestDescriptor) -> reqwest::RequestBuilder {
        let mut req = client.request(request.method.into(), &request.url);

        for (key, value) in merge_headers(&self.config.default_headers, &request.headers) {
            req = req.header(key, value);
        }

        let pairs = request.query_pairs();
        if !pairs.is_empty() {
            req = req.query(&pairs);
        }

        match &request.body {
            Some(RequestBody::Json(body)) => req = req.json(body),
            Some(RequestBody::Form(fields)) => req = req.form(&flatten_query(fields)),
            None => {}
        }

        req.timeout(self.config.timeout)
    }

    /// Send a descriptor, retrying transient failures
    ///
    /// Non-success responses that survive the retry budget become
    /// [`Error::HttpStatus`].
    pub async fn send(&self, request: &RequestDescriptor) -> Result<Response> {
        let client = self.client_for(request.reject_unauthorized)?;
        let max_retries = self.config.max_retries;
        let timeout = self.config.timeout;

        let mut last_error = None;
        let mut attempt = 0;

        while attempt <= max_retries {
            if let Some(ref limiter) = self.rate_limiter {
                limiter.wait().await;
            }

            match self.prepare(client, request).send().await {
                Ok(response) => {
                    let status = response.status();

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        let retry_after = extract_retry_after(&response);
                        if attempt < max_retries {
                            warn!(
                                "Rate limited (429), attempt {}/{}, waiting {}s",
                                attempt + 1,
                                max_retries + 1,
                                retry_after
                            );
                            tokio::time::sleep(Duration::from_secs(retry_after)).await;
                            attempt += 1;
                            continue;
                        }
                        return Err(Error::RateLimited {
                            retry_after_seconds: retry_after,
                        });
                    }

                    if is_retryable_status(status) && attempt < max_retries {
                        let delay = self.calculate_backoff(attempt);
                        warn!(
                            "Request failed with {}, attempt {}/{}, retrying in {:?}",
                            status.as_u16(),
                            attempt + 1,
                            max_retries + 1,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        last_error = Some(Error::http_status(status.as_u16(), ""));
                        continue;
                    }

                    if status.is_client_error() || status.is_server_error() {
                        let body = response.text().await.unwrap_or_default();
                        return Err(Error::http_status(status.as_u16(), body));
                    }

                    debug!("{} {} -> {}", request.method, request.url, status.as_u16());
                    return Ok(response);
                }
                Err(e) if e.is_timeout() => {
                    let timeout_ms = timeout.as_millis() as u64;
                    if attempt < max_retries {
                        let delay = self.calculate_backoff(attempt);
                        warn!(
                            "Request timeout, attempt {}/{}, retrying in {:?}",
                            attempt + 1,
                            max_retries + 1,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        last_error = Some(Error::Timeout { timeout_ms });
                        continue;
                    }
                    return Err(Error::Timeout { timeout_ms });
                }
                Err(e) if e.is_connect() && attempt < max_retries => {
                    let delay = self.calculate_backoff(attempt);
                    warn!(
                        "Connection error, attempt {}/{}, retrying in {:?}",
                        attempt + 1,
                        max_retries + 1,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                    last_error = Some(Error::Http(e));
                }
                Err(e) => return Err(Error::Http(e)),
            }
        }

        Err(last_error.unwrap_or(Error::MaxRetriesExceeded { max_retries }))
    }

    /// Calculate backoff delay for a given attempt
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let delay = match self.config.backoff_type {
            BackoffType::Constant => self.config.initial_backoff,
            BackoffType::Linear => self.config.initial_backoff * (attempt + 1),
            BackoffType::Exponential => {
                let factor = 2u32.saturating_pow(attempt);
                self.config.initial_backoff.saturating_mul(factor)
            }
        };

        std::cmp::min(delay, self.config.max_backoff)
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn execute(&self, request: RequestDescriptor) -> Result<ResponseEnvelope> {
        let response = self.send(&request).await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let bytes = response.bytes().await?;

        let body = if bytes.iter().all(u8::is_ascii_whitespace) {
            JsonValue::Null
        } else {
            serde_json::from_slice(&bytes)
                .map_err(|e| Error::decode(format!("{} {}: {e}", request.method, request.url)))?
        };

        Ok(ResponseEnvelope::new(status, headers, body))
    }

    async fn execute_stream(&self, request: RequestDescriptor) -> Result<ByteStream> {
        let response = self.send(&request).await?;
        debug!("Streaming body of {} {}", request.method, request.url);
        Ok(Box::pin(response.bytes_stream().map_err(Error::Http)))
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .field("insecure_client_built", &self.insecure_client.get().is_some())
            .finish_non_exhaustive()
    }
}

/// Check if an HTTP status is retryable
fn is_retryable_status(status: StatusCode) -> bool {
    matches!(
        status.as_u16(),
        500 | 502 | 503 | 504 | 520 | 521 | 522 | 523 | 524
    )
}

/// Default headers overlaid with descriptor headers, names compared
/// case-insensitively
fn merge_headers<'a>(defaults: &'a StringMap, overrides: &'a StringMap) -> HashMap<String, &'a str> {
    defaults
        .iter()
        .chain(overrides)
        .map(|(key, value)| (key.to_ascii_lowercase(), value.as_str()))
        .collect()
}

/// Extract retry-after header value
fn extract_retry_after(response: &Response) -> u64 {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
        .unwrap_or(60)
}
