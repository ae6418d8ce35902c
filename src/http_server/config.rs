//! HTTP Server Configuration
//!
//! Listen address and request size limit.

use serde::{Deserialize, Serialize};

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub listen_host: String,

    /// Port to bind to (default: 8081)
    #[serde(default = "default_port")]
    pub listen_port: u16,

    /// Largest accepted value in bytes (default: 64 MiB)
    #[serde(default = "default_max_value_bytes")]
    pub max_value_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8081
}

fn default_max_value_bytes() -> usize {
    64 * 1024 * 1024
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            listen_host: default_host(),
            listen_port: default_port(),
            max_value_bytes: default_max_value_bytes(),
        }
    }
}

impl HttpServerConfig {
    /// Create a new config with specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            listen_port: port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        // An empty host binds every interface.
        let host = if self.listen_host.is_empty() {
            "0.0.0.0"
        } else {
            self.listen_host.as_str()
        };
        format!("{}:{}", host, self.listen_port)
    }
}
