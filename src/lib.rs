// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # pagewalk
//!
//! Request building and link-header pagination for paginated REST APIs
//! (GitLab conventions: `Link`, `X-Page`, `X-Total`, ...).
//!
//! ## Features
//!
//! - **Request Building**: canonical URL joining, camelCase → snake_case
//!   body and query keys, structured or inline query encoding
//! - **Authentication**: personal access token or OAuth bearer token
//! - **Pagination**: follows `rel="next"` links, bounded by `max_pages`,
//!   or fetches one pinned page with its metadata
//! - **Transport**: reqwest with retries, backoff and rate limiting
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pagewalk::{ConnectionOptions, HttpClientConfig, ListOptions, RequestHelper, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let options = ConnectionOptions::new().token("glpat-...");
//!     let helper = RequestHelper::connect(&options, HttpClientConfig::default())?;
//!
//!     // Every project, all pages concatenated
//!     let projects = helper
//!         .get_paginated("projects", &ListOptions::new().param("membership", true))
//!         .await?;
//!
//!     // Page 2 only, with X-Total / X-Next-Page metadata
//!     let page = helper
//!         .get_paginated("projects", &ListOptions::new().page(2).show_pagination(true))
//!         .await?;
//!     println!("{:?}", page.pagination());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        RequestHelper                         │
//! │  get()  get_paginated()  stream()  post()  put()  delete()   │
//! └──────────────────────────────────────────────────────────────┘
//!                                │
//! ┌───────────────┬──────────────┴─────┬──────────────┬─────────┐
//! │  Connection   │      Request       │  Pagination  │ Transport│
//! ├───────────────┼────────────────────┼──────────────┼─────────┤
//! │ Base URL      │ URL join           │ Link header  │ reqwest │
//! │ private-token │ Key translation    │ X-Page       │ Retry   │
//! │ Bearer        │ Query encoding     │ max_pages    │ Rate lim│
//! └───────────────┴────────────────────┴──────────────┴─────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// camelCase → snake_case key translation
pub mod case;

/// Connection context and authentication
pub mod connection;

/// Request descriptor construction
pub mod request;

/// HTTP transport with retry and rate limiting
pub mod http;

/// Link-header pagination engine
pub mod pagination;

/// Client configuration loading
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use connection::{AuthConfig, ConnectionContext, ConnectionOptions};
pub use http::{HttpClient, HttpClientConfig, ResponseEnvelope, Transport};
pub use pagination::{
    GetOptions, GetResponse, ListOptions, PaginatedResult, PaginationMetadata, RequestHelper,
};
pub use request::{build, BuildOptions, QueryEncoding, RequestBody, RequestDescriptor};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
