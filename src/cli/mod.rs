//! CLI module
//!
//! Command-line interface over `RequestHelper`.
//!
//! # Commands
//!
//! - `get` - List a resource, following pagination links
//! - `stream` - Download a raw body to stdout
//! - `post` / `put` - Write a resource from key=value fields
//! - `delete` - Delete a resource

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::{list_options, parse_params, Runner};
