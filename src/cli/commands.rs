//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Query paginated REST APIs from the command line
#[derive(Parser, Debug)]
#[command(name = "pagewalk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML or JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// API host (overrides config and PAGEWALK_URL)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Personal access token
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// OAuth token (wins over --token)
    #[arg(long, global = true)]
    pub oauth_token: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long, global = true)]
    pub insecure: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List a resource, following pagination links
    Get {
        /// Endpoint relative to the API base, e.g. `projects`
        endpoint: String,

        /// Fetch only this page
        #[arg(long)]
        page: Option<u32>,

        /// Stop following links once this page number is reached
        #[arg(long)]
        max_pages: Option<u32>,

        /// Include pagination metadata (requires --page)
        #[arg(long)]
        show_pagination: bool,

        /// Query parameter as key=value (repeatable)
        #[arg(short, long = "query")]
        query: Vec<String>,
    },

    /// Download an endpoint's raw body to stdout
    Stream {
        /// Endpoint relative to the API base
        endpoint: String,

        /// Query parameter as key=value (repeatable)
        #[arg(short, long = "query")]
        query: Vec<String>,
    },

    /// Create a resource
    Post {
        /// Endpoint relative to the API base
        endpoint: String,

        /// Body field as key=value (repeatable)
        #[arg(short, long = "data")]
        data: Vec<String>,

        /// Send the body form-encoded instead of JSON
        #[arg(long)]
        form: bool,
    },

    /// Update a resource
    Put {
        /// Endpoint relative to the API base
        endpoint: String,

        /// Body field as key=value (repeatable)
        #[arg(short, long = "data")]
        data: Vec<String>,
    },

    /// Delete a resource
    Delete {
        /// Endpoint relative to the API base
        endpoint: String,

        /// Query parameter as key=value (repeatable)
        #[arg(short, long = "query")]
        query: Vec<String>,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON on one line
    Json,
    /// Indented JSON
    Pretty,
}
