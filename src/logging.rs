//! Logging setup
//!
//! Uses the `tracing` framework. `RUST_LOG` takes precedence over the
//! configured level.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum log level filter
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LogConfig {
    /// Set log level filter
    pub fn with_level<S: Into<String>>(mut self, level: S) -> Self {
        self.level = level.into();
        self
    }

    /// Filter built from RUST_LOG, falling back to the configured level
    pub fn filter(&self) -> Result<EnvFilter, String> {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .map_err(|e| format!("Invalid log level '{}': {}", self.level, e))
    }

    /// Install the global subscriber.
    ///
    /// Fails if the level is not a valid filter or a subscriber is already set.
    pub fn init(self) -> Result<(), String> {
        let filter = self.filter()?;

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .try_init()
            .map_err(|e| format!("Failed to install logger: {}", e))
    }
}
