//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Turbot workspace access CLI
#[derive(Parser, Debug)]
#[command(name = "turbot-access")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Connection config file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Credentials profile
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Credentials file
    #[arg(long, global = true)]
    pub credentials_file: Option<String>,

    /// Workspace (e.g. acme.cloud.turbot.com)
    #[arg(short, long, global = true)]
    pub workspace: Option<String>,

    /// Access key
    #[arg(long, global = true)]
    pub access_key: Option<String>,

    /// Secret key
    #[arg(long, global = true)]
    pub secret_key: Option<String>,

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
    /// Build the client and run the validation query
    Check,

    /// Show resolved credentials (keys masked)
    Credentials,

    /// Run a paginated list query
    Query {
        /// File containing the GraphQL document
        #[arg(short, long)]
        document: PathBuf,

        /// Response field holding `items` and `paging`
        #[arg(short, long)]
        root: String,

        /// Free-text filter passed through to the service
        #[arg(long)]
        filter: Option<String>,

        /// Maximum number of items to return
        #[arg(short, long)]
        limit: Option<u64>,

        /// Log page failures and stop instead of failing
        #[arg(long)]
        tolerate_errors: bool,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
