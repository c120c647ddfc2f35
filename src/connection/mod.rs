//! Connection module
//!
//! Supports: personal access tokens, OAuth bearer tokens, unauthenticated
//!
//! A `ConnectionContext` bundles the base URL, the authentication header and
//! the TLS policy of one client. It never changes after construction.

mod context;
mod types;

pub use context::ConnectionContext;
pub use types::{
    AuthConfig, ConnectionOptions, AUTHORIZATION_HEADER, DEFAULT_URL, DEFAULT_VERSION,
    PRIVATE_TOKEN_HEADER,
};
