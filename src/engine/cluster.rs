//! # Cluster Engine
//!
//! Stores records in a Cassandra-compatible cluster through one long-lived
//! driver session. The driver owns connection pooling, retries and request
//! timeouts; this engine adds none of its own.
//!
//! Expected schema:
//!
//! ```text
//! CREATE TABLE <keyspace>.<table> (key blob PRIMARY KEY, value blob);
//! ```

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use scylla::execution_profile::ExecutionProfile;
use scylla::prepared_statement::PreparedStatement;
use scylla::statement::Consistency;
use scylla::{Session, SessionBuilder};

use super::config::{ClusterEngineConfig, ConsistencyLevel, EngineKind};
use super::errors::{EngineError, EngineResult};
use super::StorageEngine;

impl From<ConsistencyLevel> for Consistency {
    fn from(level: ConsistencyLevel) -> Self {
        match level {
            ConsistencyLevel::Any => Consistency::Any,
            ConsistencyLevel::One => Consistency::One,
            ConsistencyLevel::Two => Consistency::Two,
            ConsistencyLevel::Three => Consistency::Three,
            ConsistencyLevel::Quorum => Consistency::Quorum,
            ConsistencyLevel::All => Consistency::All,
            ConsistencyLevel::LocalQuorum => Consistency::LocalQuorum,
            ConsistencyLevel::EachQuorum => Consistency::EachQuorum,
            ConsistencyLevel::LocalOne => Consistency::LocalOne,
        }
    }
}

/// Insert statement for `table`.
///
/// The table name is spliced into the text, so it must come from validated
/// startup configuration.
pub fn insert_statement(table: &str) -> String {
    format!("INSERT INTO {} (key, value) VALUES (?, ?)", table)
}

/// Single-row lookup statement for `table`
pub fn select_statement(table: &str) -> String {
    format!("SELECT value FROM {} WHERE key = ? LIMIT 1", table)
}

/// Cluster-backed storage engine
pub struct ClusterEngine {
    session: Session,
    insert: PreparedStatement,
    select: PreparedStatement,
    config: ClusterEngineConfig,
}

impl ClusterEngine {
    /// Open a session against the configured cluster and prepare both
    /// statements. Any failure here means the service cannot start.
    pub async fn connect(config: &ClusterEngineConfig) -> EngineResult<Self> {
        config.validate()?;
        let consistency: Consistency = config.consistency_level()?.into();

        let profile = ExecutionProfile::builder()
            .consistency(consistency)
            .request_timeout(config.request_timeout_ms.map(Duration::from_millis))
            .build();

        let mut builder = SessionBuilder::new()
            .known_nodes(&config.hosts)
            .use_keyspace(config.keyspace.as_str(), false)
            .default_execution_profile_handle(profile.into_handle());

        if let Some(ms) = config.connect_timeout_ms {
            builder = builder.connection_timeout(Duration::from_millis(ms));
        }

        let session = builder
            .build()
            .await
            .map_err(|e| EngineError::Connect(e.to_string()))?;

        let insert = session
            .prepare(insert_statement(&config.table))
            .await
            .map_err(|e| EngineError::Connect(format!("Failed to prepare insert: {}", e)))?;

        let select = session
            .prepare(select_statement(&config.table))
            .await
            .map_err(|e| EngineError::Connect(format!("Failed to prepare select: {}", e)))?;

        Ok(Self {
            session,
            insert,
            select,
            config: config.clone(),
        })
    }
}

impl fmt::Debug for ClusterEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusterEngine")
            .field("hosts", &self.config.hosts)
            .field("keyspace", &self.config.keyspace)
            .field("table", &self.config.table)
            .field("consistency", &self.config.consistency)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl StorageEngine for ClusterEngine {
    async fn put(&self, key: &[u8], value: &[u8]) -> EngineResult<()> {
        self.session
            .execute(&self.insert, (key.to_vec(), value.to_vec()))
            .await
            .map_err(|e| EngineError::Query(e.to_string()))?;
        Ok(())
    }

    async fn get(&self, key: &[u8]) -> EngineResult<Option<Vec<u8>>> {
        let result = self
            .session
            .execute(&self.select, (key.to_vec(),))
            .await
            .map_err(|e| EngineError::Query(e.to_string()))?;

        // No row is an absent key; a null column is a stored empty blob.
        let row = result
            .maybe_first_row_typed::<(Option<Vec<u8>>,)>()
            .map_err(|e| EngineError::Query(e.to_string()))?;

        Ok(row.map(|(value,)| value.unwrap_or_default()))
    }

    fn kind(&self) -> EngineKind {
        EngineKind::Cluster
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_text() {
        assert_eq!(
            insert_statement("filters"),
            "INSERT INTO filters (key, value) VALUES (?, ?)"
        );
        assert_eq!(
            select_statement("filters"),
            "SELECT value FROM filters WHERE key = ? LIMIT 1"
        );
    }

    #[test]
    fn test_consistency_mapping() {
        assert_eq!(Consistency::from(ConsistencyLevel::One), Consistency::One);
        assert_eq!(Consistency::from(ConsistencyLevel::Quorum), Consistency::Quorum);
        assert_eq!(
            Consistency::from(ConsistencyLevel::LocalQuorum),
            Consistency::LocalQuorum
        );
        assert_eq!(Consistency::from(ConsistencyLevel::All), Consistency::All);
    }

    #[tokio::test]
    async fn test_connect_rejects_invalid_config_before_dialing() {
        let config = ClusterEngineConfig {
            table: "filters WHERE 1=1".into(),
            ..Default::default()
        };

        let result = ClusterEngine::connect(&config).await;
        assert!(matches!(result, Err(EngineError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_connect_failure_is_startup_fatal() {
        // Nothing listens on port 1.
        let config = ClusterEngineConfig {
            hosts: vec!["127.0.0.1:1".into()],
            connect_timeout_ms: Some(500),
            ..Default::default()
        };

        let err = ClusterEngine::connect(&config).await.unwrap_err();
        assert!(matches!(err, EngineError::Connect(_)));
        assert!(err.is_startup_fatal());
    }
}
