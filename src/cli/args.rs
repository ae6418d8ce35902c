//! CLI argument definitions using clap
//!
//! Commands:
//! - persistd [--conf <path>] serve
//! - persistd [--conf <path>] validate

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default configuration path
pub const DEFAULT_CONFIG_PATH: &str = "/etc/prestobloomfilterpersist.json";

/// persistd - key-value persistence service with pluggable storage engines
#[derive(Parser, Debug)]
#[command(name = "persistd")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration JSON
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub conf: PathBuf,

    /// Command to run (default: serve)
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open the configured engine and serve HTTP requests
    Serve,

    /// Load and validate the configuration, then print it
    Validate,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Selected command, `serve` when none is given
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }
}
