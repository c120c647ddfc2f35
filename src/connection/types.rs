//! Connection configuration types
//!
//! `ConnectionOptions` is what a caller hands over at construction time;
//! `AuthConfig` is the single authentication scheme derived from it.

use serde::{Deserialize, Serialize};

/// Default API host
pub const DEFAULT_URL: &str = "https://gitlab.com";

/// Default API version segment
pub const DEFAULT_VERSION: &str = "v4";

/// Header carrying a personal access token
pub const PRIVATE_TOKEN_HEADER: &str = "private-token";

/// Header carrying an OAuth bearer token
pub const AUTHORIZATION_HEADER: &str = "authorization";

/// Authentication scheme applied to every request of a connection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthConfig {
    /// No authentication header, requests proceed unauthenticated
    #[default]
    None,

    /// Personal access token sent as `private-token`
    PrivateToken {
        /// The token value
        token: String,
    },

    /// OAuth token sent as `authorization: Bearer <token>`
    Bearer {
        /// The bearer token
        token: String,
    },
}

impl AuthConfig {
    /// The header name and value this scheme contributes, if any
    pub fn header(&self) -> Option<(&'static str, String)> {
        match self {
            AuthConfig::None => None,
            AuthConfig::PrivateToken { token } => Some((PRIVATE_TOKEN_HEADER, token.clone())),
            AuthConfig::Bearer { token } => Some((AUTHORIZATION_HEADER, format!("Bearer {token}"))),
        }
    }
}

/// Construction-time options for a connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionOptions {
    /// API host, e.g. `https://gitlab.example.com`
    #[serde(default = "default_url")]
    pub url: String,

    /// API version segment appended after `/api`
    #[serde(default = "default_version")]
    pub version: String,

    /// Personal access token
    #[serde(default)]
    pub token: Option<String>,

    /// OAuth token (takes precedence over `token`)
    #[serde(default)]
    pub oauth_token: Option<String>,

    /// Verify TLS certificates
    #[serde(default = "default_true")]
    pub reject_unauthorized: bool,
}

fn default_url() -> String {
    DEFAULT_URL.to_string()
}

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            url: default_url(),
            version: default_version(),
            token: None,
            oauth_token: None,
            reject_unauthorized: true,
        }
    }
}

impl ConnectionOptions {
    /// Create options with default host and version
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API host
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set the API version segment
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set a personal access token
    #[must_use]
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set an OAuth token
    #[must_use]
    pub fn oauth_token(mut self, token: impl Into<String>) -> Self {
        self.oauth_token = Some(token.into());
        self
    }

    /// Enable or disable TLS certificate verification
    #[must_use]
    pub fn reject_unauthorized(mut self, reject: bool) -> Self {
        self.reject_unauthorized = reject;
        self
    }

    /// Resolve the authentication scheme
    ///
    /// An OAuth token wins over a personal token. Empty strings count as absent.
    pub fn auth(&self) -> AuthConfig {
        let present = |t: &Option<String>| t.as_deref().filter(|s| !s.is_empty()).map(String::from);

        if let Some(token) = present(&self.oauth_token) {
            AuthConfig::Bearer { token }
        } else if let Some(token) = present(&self.token) {
            AuthConfig::PrivateToken { token }
        } else {
            AuthConfig::None
        }
    }
}
