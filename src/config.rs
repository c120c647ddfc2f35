//! Client configuration
//!
//! A `ClientConfig` is loaded from a YAML or JSON file, then selected fields
//! are overridden from the environment. It splits into the construction-time
//! `ConnectionOptions` and the transport's `HttpClientConfig`.

use crate::connection::{ConnectionOptions, DEFAULT_URL, DEFAULT_VERSION};
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::types::{BackoffType, StringMap};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding `url`
pub const ENV_URL: &str = "PAGEWALK_URL";
/// Environment variable overriding `token`
pub const ENV_TOKEN: &str = "PAGEWALK_TOKEN";
/// Environment variable overriding `oauth_token`
pub const ENV_OAUTH_TOKEN: &str = "PAGEWALK_OAUTH_TOKEN";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API host
    #[serde(default = "default_url")]
    pub url: String,

    /// API version segment
    #[serde(default = "default_version")]
    pub version: String,

    /// Personal access token
    #[serde(default)]
    pub token: Option<String>,

    /// OAuth token
    #[serde(default)]
    pub oauth_token: Option<String>,

    /// Verify TLS certificates
    #[serde(default = "default_true")]
    pub reject_unauthorized: bool,

    /// Transport settings
    #[serde(default)]
    pub http: HttpConfig,
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

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            version: default_version(),
            token: None,
            oauth_token: None,
            reject_unauthorized: true,
            http: HttpConfig::default(),
        }
    }
}

// ============================================================================
// HTTP Config
// ============================================================================

/// Transport settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff strategy between retries
    #[serde(default)]
    pub backoff: BackoffType,

    /// First backoff delay in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Backoff ceiling in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,

    /// Client-side rate limit; absent disables throttling
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,

    /// Extra headers sent with every request
    #[serde(default)]
    pub headers: StringMap,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    100
}

fn default_max_backoff_ms() -> u64 {
    60_000
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            backoff: BackoffType::default(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            rate_limit: None,
            headers: StringMap::new(),
            user_agent: None,
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

impl ClientConfig {
    /// Load a config file; `.json` files are parsed as JSON, anything else as YAML
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::config(format!(
                    "Failed to read config file '{}': {}",
                    path.display(),
                    e
                ))
            }
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_yaml_str(&content)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse YAML content
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Parse JSON content
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Apply `PAGEWALK_*` environment overrides
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary lookup; empty values are ignored
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if let Some(url) = lookup(ENV_URL) {
            self.url = url;
        }
        if let Some(token) = lookup(ENV_TOKEN) {
            self.token = Some(token);
        }
        if let Some(token) = lookup(ENV_OAUTH_TOKEN) {
            self.oauth_token = Some(token);
        }
        self
    }

    /// Reject values that cannot produce a usable connection
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.url).map_err(|e| Error::invalid_value("url", e.to_string()))?;
        if self.version.trim().is_empty() {
            return Err(Error::invalid_value("version", "must not be empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(Error::invalid_value("http.timeout_secs", "must be positive"));
        }
        Ok(())
    }

    /// Construction-time options for the connection context
    pub fn connection_options(&self) -> ConnectionOptions {
        ConnectionOptions {
            url: self.url.clone(),
            version: self.version.clone(),
            token: self.token.clone(),
            oauth_token: self.oauth_token.clone(),
            reject_unauthorized: self.reject_unauthorized,
        }
    }

    /// Transport configuration
    pub fn http_client_config(&self) -> HttpClientConfig {
        let mut config = HttpClientConfig {
            timeout: Duration::from_secs(self.http.timeout_secs),
            max_retries: self.http.max_retries,
            initial_backoff: Duration::from_millis(self.http.initial_backoff_ms),
            max_backoff: Duration::from_millis(self.http.max_backoff_ms),
            backoff_type: self.http.backoff,
            rate_limit: self.http.rate_limit,
            default_headers: self.http.headers.clone(),
            ..HttpClientConfig::default()
        };
        if let Some(agent) = &self.http.user_agent {
            config.user_agent = agent.clone();
        }
        config
    }
}
