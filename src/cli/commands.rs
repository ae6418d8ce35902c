//! CLI command implementations
//!
//! Startup order for `serve`: load config, install logging, open the engine,
//! bind the listener. A failure at any step exits before a request is served.

use std::path::Path;

use crate::config::ServiceConfig;
use crate::engine::open_engine;
use crate::http_server::HttpServer;
use crate::logging::LogConfig;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command(), &cli.conf)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command, config_path: &Path) -> CliResult<()> {
    match cmd {
        Command::Serve => serve(config_path),
        Command::Validate => validate(config_path).map(|_| ()),
    }
}

/// Load the configuration, validate it and print the resolved result
pub fn validate(config_path: &Path) -> CliResult<ServiceConfig> {
    let config = ServiceConfig::load(config_path)?;
    let rendered = serde_json::to_string_pretty(&config)
        .map_err(|e| CliError::io_error(format!("JSON error: {}", e)))?;
    println!("{}", rendered);
    Ok(config)
}

/// Open the configured engine and serve HTTP until Ctrl-C
pub fn serve(config_path: &Path) -> CliResult<()> {
    let config = ServiceConfig::load(config_path)?;

    LogConfig::default()
        .with_level(config.log_level.as_str())
        .init()
        .map_err(CliError::config_error)?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        tracing::info!(
            engine = %config.engine.backend,
            config = %config_path.display(),
            "Opening storage engine"
        );
        let engine = open_engine(&config.engine).await?;
        tracing::info!(engine = ?engine, "Storage engine ready");

        let server = HttpServer::new(config.http.clone(), engine);
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}
