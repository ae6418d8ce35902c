//! Engine Configuration
//!
//! Selects the engine kind and carries the parameters of every engine. Only
//! the section of the selected engine is validated.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::errors::{EngineError, EngineResult};

/// Which engine backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EngineKind {
    /// Embedded single-file store
    #[default]
    File,
    /// Cassandra-compatible cluster
    Cluster,
}

impl EngineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineKind::File => "file",
            EngineKind::Cluster => "cluster",
        }
    }

    /// Resolve a configured name. Anything unrecognized falls back to `File`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "cluster" | "cassandra" => EngineKind::Cluster,
            _ => EngineKind::File,
        }
    }
}

impl From<String> for EngineKind {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<EngineKind> for String {
    fn from(kind: EngineKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cluster read/write consistency level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsistencyLevel {
    Any,
    One,
    Two,
    Three,
    Quorum,
    All,
    LocalQuorum,
    EachQuorum,
    LocalOne,
}

impl FromStr for ConsistencyLevel {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let level = match s.trim().to_ascii_uppercase().as_str() {
            "ANY" => ConsistencyLevel::Any,
            "ONE" => ConsistencyLevel::One,
            "TWO" => ConsistencyLevel::Two,
            "THREE" => ConsistencyLevel::Three,
            "QUORUM" => ConsistencyLevel::Quorum,
            "ALL" => ConsistencyLevel::All,
            "LOCAL_QUORUM" => ConsistencyLevel::LocalQuorum,
            "EACH_QUORUM" => ConsistencyLevel::EachQuorum,
            "LOCAL_ONE" => ConsistencyLevel::LocalOne,
            other => {
                return Err(EngineError::InvalidConfig(format!(
                    "Unknown consistency level: '{}'",
                    other
                )))
            }
        };
        Ok(level)
    }
}

/// Embedded engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileEngineConfig {
    /// Database file (default: "my.db")
    #[serde(default = "default_file_path")]
    pub path: PathBuf,

    /// Bucket holding every record (default: "store")
    #[serde(default = "default_bucket")]
    pub bucket: String,
}

fn default_file_path() -> PathBuf {
    PathBuf::from("my.db")
}

fn default_bucket() -> String {
    "store".to_string()
}

impl Default for FileEngineConfig {
    fn default() -> Self {
        Self {
            path: default_file_path(),
            bucket: default_bucket(),
        }
    }
}

impl FileEngineConfig {
    /// Config for a database file at `path` with the default bucket
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.path.as_os_str().is_empty() {
            return Err(EngineError::InvalidConfig("file.path must not be empty".into()));
        }
        if self.bucket.is_empty() {
            return Err(EngineError::InvalidConfig("file.bucket must not be empty".into()));
        }
        Ok(())
    }
}

/// Cluster engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClusterEngineConfig {
    /// Seed hosts, `host` or `host:port`
    #[serde(default = "default_hosts")]
    pub hosts: Vec<String>,

    #[serde(default = "default_keyspace")]
    pub keyspace: String,

    /// Table name; interpolated into statement text
    #[serde(default = "default_table")]
    pub table: String,

    /// Native protocol version, checked at startup only (4, or 0 for
    /// "negotiate"). The driver always speaks CQL v4; this is never passed
    /// to it.
    #[serde(default = "default_proto_version")]
    pub proto_version: u8,

    #[serde(default = "default_consistency")]
    pub consistency: String,

    #[serde(default)]
    pub connect_timeout_ms: Option<u64>,

    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

fn default_hosts() -> Vec<String> {
    vec!["127.0.0.1".to_string()]
}

fn default_keyspace() -> String {
    "bloomfilter".to_string()
}

fn default_table() -> String {
    "filters".to_string()
}

fn default_proto_version() -> u8 {
    4
}

fn default_consistency() -> String {
    "quorum".to_string()
}

impl Default for ClusterEngineConfig {
    fn default() -> Self {
        Self {
            hosts: default_hosts(),
            keyspace: default_keyspace(),
            table: default_table(),
            proto_version: default_proto_version(),
            consistency: default_consistency(),
            connect_timeout_ms: None,
            request_timeout_ms: None,
        }
    }
}

/// Protocol versions the cluster driver can speak
const SUPPORTED_PROTO_VERSIONS: [u8; 2] = [0, 4];

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"))
}

/// Check a keyspace or table identifier
pub fn validate_identifier(field: &str, value: &str) -> EngineResult<()> {
    if identifier_pattern().is_match(value) {
        Ok(())
    } else {
        Err(EngineError::InvalidConfig(format!(
            "{} '{}' is not a valid identifier",
            field, value
        )))
    }
}

impl ClusterEngineConfig {
    /// Parsed consistency level
    pub fn consistency_level(&self) -> EngineResult<ConsistencyLevel> {
        self.consistency.parse()
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.hosts.iter().all(|h| h.trim().is_empty()) {
            return Err(EngineError::InvalidConfig(
                "cluster.hosts must list at least one host".into(),
            ));
        }
        validate_identifier("cluster.keyspace", &self.keyspace)?;
        validate_identifier("cluster.table", &self.table)?;
        self.consistency_level()?;

        if !SUPPORTED_PROTO_VERSIONS.contains(&self.proto_version) {
            return Err(EngineError::InvalidConfig(format!(
                "Unsupported cluster.proto_version: {}. Use 4, or 0 to negotiate.",
                self.proto_version
            )));
        }

        if self.connect_timeout_ms == Some(0) || self.request_timeout_ms == Some(0) {
            return Err(EngineError::InvalidConfig("cluster timeouts must be > 0".into()));
        }

        Ok(())
    }
}

/// Everything the engine selector needs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Engine kind (default: file)
    #[serde(default)]
    pub backend: EngineKind,

    #[serde(default)]
    pub file: FileEngineConfig,

    #[serde(default)]
    pub cluster: ClusterEngineConfig,
}

impl EngineConfig {
    /// Validate the section of the selected engine
    pub fn validate(&self) -> EngineResult<()> {
        match self.backend {
            EngineKind::File => self.file.validate(),
            EngineKind::Cluster => self.cluster.validate(),
        }
    }
}
