//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::ConnectionConfig;
use crate::connection::Connection;
use crate::credentials::CredentialResolver;
use crate::endpoint;
use crate::error::{Error, Result};
use crate::filter::FilterBuilder;
use crate::pagination::{CallbackSink, ErrorPolicy};
use crate::query::ListQuery;
use crate::types::{mask_secret, JsonValue};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::time::Instant;

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
        match &self.cli.command {
            Commands::Check => self.check().await,
            Commands::Credentials => self.credentials(),
            Commands::Query {
                document,
                root,
                filter,
                limit,
                tolerate_errors,
            } => {
                self.query(document, root, filter.as_deref(), *limit, *tolerate_errors)
                    .await
            }
        }
    }

    /// Connection config from `--config`, overridden by command-line flags
    fn connection_config(&self) -> Result<ConnectionConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ConnectionConfig::load(path)?,
            None => ConnectionConfig::default(),
        };

        if let Some(profile) = &self.cli.profile {
            config.profile = Some(profile.clone());
        }
        if let Some(path) = &self.cli.credentials_file {
            config.credentials_file = Some(path.clone());
        }
        if let Some(workspace) = &self.cli.workspace {
            config.workspace = Some(workspace.clone());
        }
        if let Some(key) = &self.cli.access_key {
            config.access_key = Some(key.clone());
        }
        if let Some(key) = &self.cli.secret_key {
            config.secret_key = Some(key.clone());
        }
        Ok(config)
    }

    /// Build and validate the client
    async fn check(&self) -> Result<()> {
        let mut config = self.connection_config()?;
        config.validate = true;
        let connection = Connection::new("cli", config);

        self.log("INFO", "Checking workspace connection");

        match connection.client().await {
            Ok(client) => {
                self.output_message(&json!({
                    "type": "CONNECTION_STATUS",
                    "connectionStatus": {
                        "status": "SUCCEEDED",
                        "endpoint": client.endpoint().as_str(),
                        "message": "Connection successful"
                    }
                }));
            }
            Err(e) => {
                self.output_message(&json!({
                    "type": "CONNECTION_STATUS",
                    "connectionStatus": {
                        "status": "FAILED",
                        "transient": e.is_transient(),
                        "message": format!("Connection failed: {e}")
                    }
                }));
            }
        }

        Ok(())
    }

    /// Show which credentials resolve
    fn credentials(&self) -> Result<()> {
        let config = self.connection_config()?;
        let (creds, source) =
            CredentialResolver::new().resolve_with_source(&config.client_config())?;
        let endpoint = endpoint::normalize(&creds.workspace)?;

        self.output_message(&json!({
            "type": "CREDENTIALS",
            "credentials": {
                "source": source.to_string(),
                "workspace": creds.workspace,
                "endpoint": endpoint.as_str(),
                "accessKey": mask_secret(&creds.access_key),
                "secretKey": mask_secret(&creds.secret_key)
            }
        }));
        Ok(())
    }

    /// Run a list query and print every item
    async fn query(
        &self,
        document: &Path,
        root: &str,
        filter: Option<&str>,
        limit: Option<u64>,
        tolerate_errors: bool,
    ) -> Result<()> {
        let text = fs::read_to_string(document).map_err(|e| {
            Error::config(format!(
                "Failed to read query document '{}': {}",
                document.display(),
                e
            ))
        })?;
        let name = document
            .file_stem()
            .map_or_else(|| "query".to_string(), |s| s.to_string_lossy().to_string());
        let query = ListQuery::new(name, text, root)?;

        let mut builder = FilterBuilder::new().limit_hint(limit);
        if let Some(filter) = filter {
            builder = builder.free_text(filter);
        }
        let filter = builder.build();

        let policy = if tolerate_errors {
            ErrorPolicy::Tolerate
        } else {
            ErrorPolicy::Abort
        };

        let connection = Connection::new("cli", self.connection_config()?);
        let start = Instant::now();
        let mut sink = CallbackSink::new(|item: JsonValue| {
            self.output_message(&json!({
                "type": "RECORD",
                "record": {
                    "stream": query.name,
                    "data": item
                }
            }));
        })
        .with_limit(limit);

        let outcome = connection
            .list::<JsonValue, _>(&query, &filter, policy, &mut sink)
            .await?;

        if self.cli.verbose {
            self.output_message(&json!({
                "type": "SUMMARY",
                "summary": {
                    "filter": filter.to_string(),
                    "pages": outcome.pages,
                    "items": outcome.items,
                    "stop": outcome.stop,
                    "elapsedMs": start.elapsed().as_millis() as u64
                }
            }));
        }
        Ok(())
    }

    fn log(&self, level: &str, message: &str) {
        if self.cli.verbose {
            self.output_message(&json!({
                "type": "LOG",
                "log": {
                    "level": level,
                    "message": message
                }
            }));
        }
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

impl std::fmt::Debug for Runner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("command", &self.cli.command)
            .finish_non_exhaustive()
    }
}
