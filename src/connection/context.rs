//! Immutable connection context
//!
//! Built once per client and shared read-only by every request issued
//! through it.

use super::types::ConnectionOptions;
use crate::request::join_url;
use crate::types::StringMap;
use std::fmt;

/// Base URL, authentication headers and TLS policy of one client
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionContext {
    base_url: String,
    headers: StringMap,
    reject_unauthorized: bool,
}

impl ConnectionContext {
    /// Build a context from construction-time options
    ///
    /// The base URL is `<url>/api/<version>`. At most one authentication
    /// header is set, see [`ConnectionOptions::auth`].
    pub fn new(options: &ConnectionOptions) -> Self {
        let base_url = join_url(&[options.url.as_str(), "api", options.version.as_str()]);

        let mut headers = StringMap::new();
        if let Some((name, value)) = options.auth().header() {
            headers.insert(name.to_string(), value);
        }

        Self {
            base_url,
            headers,
            reject_unauthorized: options.reject_unauthorized,
        }
    }

    /// Build a context from already-resolved parts
    pub fn from_parts(
        base_url: impl Into<String>,
        headers: StringMap,
        reject_unauthorized: bool,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            headers,
            reject_unauthorized,
        }
    }

    /// Base URL every endpoint is joined to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Headers sent with every request
    pub fn headers(&self) -> &StringMap {
        &self.headers
    }

    /// Whether TLS certificates are verified
    pub fn reject_unauthorized(&self) -> bool {
        self.reject_unauthorized
    }

    /// Turn an absolute URL returned by the server back into an endpoint
    ///
    /// URLs outside the base URL are returned unchanged; the request builder
    /// uses absolute URLs as-is.
    pub fn relative_endpoint<'a>(&self, url: &'a str) -> &'a str {
        url.strip_prefix(self.base_url.as_str()).unwrap_or(url)
    }
}

impl fmt::Debug for ConnectionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut header_names: Vec<&str> = self.headers.keys().map(String::as_str).collect();
        header_names.sort_unstable();

        f.debug_struct("ConnectionContext")
            .field("base_url", &self.base_url)
            .field("headers", &header_names)
            .field("reject_unauthorized", &self.reject_unauthorized)
            .finish()
    }
}
