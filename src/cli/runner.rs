//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::pagination::{ListOptions, RequestHelper};
use crate::types::{JsonObject, JsonValue};
use futures::StreamExt;
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let helper = self.connect()?;

        match &self.cli.command {
            Commands::Get {
                endpoint,
                page,
                max_pages,
                show_pagination,
                query,
            } => {
                let options = list_options(query, *page, *max_pages, *show_pagination)?;
                self.get(&helper, endpoint, &options).await
            }
            Commands::Stream { endpoint, query } => {
                self.stream(&helper, endpoint, parse_params(query)?).await
            }
            Commands::Post {
                endpoint,
                data,
                form,
            } => {
                let body = helper.post(endpoint, parse_params(data)?, *form).await?;
                self.print(&body)
            }
            Commands::Put { endpoint, data } => {
                let body = helper.put(endpoint, parse_params(data)?).await?;
                self.print(&body)
            }
            Commands::Delete { endpoint, query } => {
                let body = helper.delete(endpoint, parse_params(query)?).await?;
                self.print(&body)
            }
        }
    }

    /// Resolve configuration: file, then environment, then flags
    pub fn resolve_config(&self) -> Result<ClientConfig> {
        let config = match &self.cli.config {
            Some(path) => ClientConfig::load(path)?,
            None => ClientConfig::default(),
        };
        let mut config = config.with_env();

        if let Some(url) = &self.cli.url {
            config.url.clone_from(url);
        }
        if let Some(token) = &self.cli.token {
            config.token = Some(token.clone());
        }
        if let Some(token) = &self.cli.oauth_token {
            config.oauth_token = Some(token.clone());
        }
        if self.cli.insecure {
            config.reject_unauthorized = false;
        }

        config.validate()?;
        Ok(config)
    }

    fn connect(&self) -> Result<RequestHelper> {
        let config = self.resolve_config()?;
        let helper = RequestHelper::connect(&config.connection_options(), config.http_client_config())?;
        debug!("Connected: {:?}", helper.context());
        Ok(helper)
    }

    async fn get(&self, helper: &RequestHelper, endpoint: &str, options: &ListOptions) -> Result<()> {
        let cancel = CancellationToken::new();
        let guard = cancel.clone();
        let ctrl_c = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupted, abandoning remaining pages");
                guard.cancel();
            }
        });

        let result = helper
            .get_paginated_with_cancel(endpoint, options, &cancel)
            .await;
        ctrl_c.abort();

        let result = result?;
        info!("Fetched {} records from {}", result.data().len(), endpoint);
        self.print(&result)
    }

    async fn stream(&self, helper: &RequestHelper, endpoint: &str, query: JsonObject) -> Result<()> {
        let mut stream = helper.stream(endpoint, query).await?;
        let mut stdout = tokio::io::stdout();
        let mut written = 0usize;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            written += chunk.len();
            stdout.write_all(&chunk).await?;
        }
        stdout.flush().await?;

        debug!("Streamed {} bytes from {}", written, endpoint);
        Ok(())
    }

    fn print<T: Serialize>(&self, value: &T) -> Result<()> {
        let output = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{output}");
        Ok(())
    }
}

/// Build list options from `-q` params, with flags taking precedence
///
/// `-q page=2` pins a page just like `--page 2`.
pub fn list_options(
    query: &[String],
    page: Option<u32>,
    max_pages: Option<u32>,
    show_pagination: bool,
) -> Result<ListOptions> {
    let mut options = ListOptions::from_object(parse_params(query)?);
    if page.is_some() {
        options.page = page;
    }
    if max_pages.is_some() {
        options.max_pages = max_pages;
    }
    options.show_pagination |= show_pagination;
    Ok(options)
}

/// Parse repeated `key=value` arguments into a record
///
/// Values that parse as JSON keep their type (`5`, `true`, `["a"]`);
/// anything else is a string.
pub fn parse_params(params: &[String]) -> Result<JsonObject> {
    let mut object = JsonObject::new();
    for param in params {
        let (key, value) = param.split_once('=').ok_or_else(|| {
            Error::invalid_value(param.as_str(), "expected key=value")
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(Error::invalid_value(param.as_str(), "empty key"));
        }
        let value = serde_json::from_str(value)
            .unwrap_or_else(|_| JsonValue::String(value.to_string()));
        object.insert(key.to_string(), value);
    }
    Ok(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serde_json::json;

    fn params(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_parse_params_types() {
        let object = parse_params(&params(&[
            "perPage=20",
            "archived=false",
            "search=my project",
            "labels=[\"bug\",\"ui\"]",
            "ref=v1.0=final",
        ]))
        .unwrap();

        assert_eq!(object["perPage"], json!(20));
        assert_eq!(object["archived"], json!(false));
        assert_eq!(object["search"], json!("my project"));
        assert_eq!(object["labels"], json!(["bug", "ui"]));
        assert_eq!(object["ref"], json!("v1.0=final"));
    }

    #[test]
    fn test_parse_params_rejects_malformed() {
        assert!(parse_params(&params(&["novalue"])).is_err());
        assert!(parse_params(&params(&["=value"])).is_err());
    }

    #[test]
    fn test_list_options_from_query_params() {
        let options = list_options(&params(&["page=2", "orderBy=id"]), None, None, true).unwrap();
        assert_eq!(options.page, Some(2));
        assert!(options.pins_page());
        assert!(options.show_pagination);
        assert_eq!(options.query.get("orderBy"), Some(&json!("id")));
        assert!(!options.query.contains_key("page"));

        let options = list_options(&params(&["page=2"]), Some(5), Some(3), false).unwrap();
        assert_eq!(options.page, Some(5));
        assert_eq!(options.max_pages, Some(3));
    }

    #[test]
    fn test_cli_parses_get() {
        let cli = Cli::try_parse_from([
            "pagewalk",
            "--url",
            "https://git.example.org",
            "get",
            "projects",
            "--page",
            "2",
            "--show-pagination",
            "-q",
            "orderBy=id",
        ])
        .unwrap();

        match cli.command {
            Commands::Get {
                ref endpoint,
                page,
                show_pagination,
                ref query,
                ..
            } => {
                assert_eq!(endpoint, "projects");
                assert_eq!(page, Some(2));
                assert!(show_pagination);
                assert_eq!(query, &vec!["orderBy=id".to_string()]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.url.as_deref(), Some("https://git.example.org"));
    }

    #[test]
    fn test_resolve_config_flags_win() {
        let cli = Cli::try_parse_from([
            "pagewalk",
            "--url",
            "https://git.example.org",
            "--token",
            "glpat-flag",
            "--insecure",
            "delete",
            "projects/1",
        ])
        .unwrap();

        let config = Runner::new(cli).resolve_config().unwrap();
        assert_eq!(config.url, "https://git.example.org");
        assert_eq!(config.token.as_deref(), Some("glpat-flag"));
        assert!(!config.reject_unauthorized);
    }
}
