//! CLI module
//!
//! Command-line interface for exercising a workspace connection.
//!
//! # Commands
//!
//! - `check` - Build and validate the client
//! - `credentials` - Show which credentials resolve, with keys masked
//! - `query` - Run a paginated list query and print its items

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
