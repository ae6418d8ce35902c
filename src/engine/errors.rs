//! # Engine Errors

use thiserror::Error;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Storage engine errors
///
/// The first group can only occur while an engine is being constructed and
/// must stop the process before it serves anything. The second group is
/// returned from individual `put`/`get` calls.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    // Startup
    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to open backing store at {path}: {reason}")]
    Open { path: String, reason: String },

    #[error("Failed to create bucket '{bucket}': {reason}")]
    BucketCreation { bucket: String, reason: String },

    #[error("Failed to connect to cluster: {0}")]
    Connect(String),

    // Per call
    #[error("Transaction failed: {0}")]
    Transaction(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Cluster query failed: {0}")]
    Query(String),

    #[error("Engine worker failed: {0}")]
    Task(String),
}

impl EngineError {
    /// Whether this error belongs to engine construction
    pub fn is_startup_fatal(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidConfig(_)
                | EngineError::Open { .. }
                | EngineError::BucketCreation { .. }
                | EngineError::Connect(_)
        )
    }

    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            EngineError::Query(_) => 503,
            EngineError::Connect(_) => 503,
            _ => 500,
        }
    }
}

impl From<redb::TransactionError> for EngineError {
    fn from(e: redb::TransactionError) -> Self {
        EngineError::Transaction(e.to_string())
    }
}

impl From<redb::CommitError> for EngineError {
    fn from(e: redb::CommitError) -> Self {
        EngineError::Transaction(e.to_string())
    }
}

impl From<redb::TableError> for EngineError {
    fn from(e: redb::TableError) -> Self {
        EngineError::Storage(e.to_string())
    }
}

impl From<redb::StorageError> for EngineError {
    fn from(e: redb::StorageError) -> Self {
        EngineError::Storage(e.to_string())
    }
}

impl From<tokio::task::JoinError> for EngineError {
    fn from(e: tokio::task::JoinError) -> Self {
        EngineError::Task(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_classification() {
        assert!(EngineError::Connect("down".into()).is_startup_fatal());
        assert!(EngineError::BucketCreation {
            bucket: "store".into(),
            reason: "read-only".into()
        }
        .is_startup_fatal());
        assert!(!EngineError::Transaction("disk full".into()).is_startup_fatal());
        assert!(!EngineError::Query("timeout".into()).is_startup_fatal());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(EngineError::Storage("corrupt".into()).status_code(), 500);
        assert_eq!(EngineError::Query("timeout".into()).status_code(), 503);
    }

    #[test]
    fn test_display_names_bucket() {
        let err = EngineError::BucketCreation {
            bucket: "store".into(),
            reason: "read-only file".into(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to create bucket 'store': read-only file"
        );
    }
}
