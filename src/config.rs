//! Service configuration
//!
//! A single JSON file read once at startup. Every field has a default, so
//! `{}` is a valid configuration (file engine on port 8081). Unrecognized
//! keys are rejected at validation, so a misspelled or foreign-format file
//! never starts the service on defaults.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::EngineConfig;
use crate::http_server::HttpServerConfig;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(flatten)]
    pub engine: EngineConfig,

    #[serde(flatten)]
    pub http: HttpServerConfig,

    /// Log filter used when RUST_LOG is unset (default: "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Top-level keys no section recognized; must stay last
    #[serde(flatten)]
    pub unknown: BTreeMap<String, serde_json::Value>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            http: HttpServerConfig::default(),
            log_level: default_log_level(),
            unknown: BTreeMap::new(),
        }
    }
}

impl ServiceConfig {
    /// Load and validate configuration from file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let config = Self::from_json(&content)?;
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration JSON without validating it
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.unknown.is_empty() {
            let keys: Vec<&str> = self.unknown.keys().map(String::as_str).collect();
            return Err(ConfigError::Invalid(format!(
                "Unknown configuration keys: {}",
                keys.join(", ")
            )));
        }

        if self.http.listen_port == 0 {
            return Err(ConfigError::Invalid("listen_port must be > 0".into()));
        }

        if self.http.max_value_bytes == 0 {
            return Err(ConfigError::Invalid("max_value_bytes must be > 0".into()));
        }

        self.engine
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}
