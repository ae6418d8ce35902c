//! CLI module for persistd
//!
//! Provides command-line interface for:
//! - serve: Open the storage engine and serve HTTP (default)
//! - validate: Check a configuration file

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command, DEFAULT_CONFIG_PATH};
pub use commands::{run, run_command, serve, validate};
pub use errors::{CliError, CliErrorCode, CliResult};
