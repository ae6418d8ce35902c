//! # Storage Engines
//!
//! Every backend implements [`StorageEngine`], a two-operation contract:
//!
//! - `put(key, value)` stores `value` under `key`, overwriting what was there
//! - `get(key)` returns the latest value, or `None` if the key was never written
//!
//! Both engines report a missing key as `Ok(None)`. `Err` always means the
//! backing store failed. Engines never log; the HTTP layer does.
//!
//! The concrete engine is chosen once at startup by [`open_engine`].

pub mod cluster;
pub mod config;
pub mod errors;
pub mod file;
pub mod selector;

use std::fmt::Debug;

use async_trait::async_trait;

pub use cluster::ClusterEngine;
pub use config::{ClusterEngineConfig, ConsistencyLevel, EngineConfig, EngineKind, FileEngineConfig};
pub use errors::{EngineError, EngineResult};
pub use file::FileEngine;
pub use selector::open_engine;

/// Key-value storage contract shared by all engines
///
/// Implementations must be safe to call from many tasks at once without any
/// locking by the caller.
#[async_trait]
pub trait StorageEngine: Send + Sync + Debug {
    /// Store `value` under `key`, returning once the write is durable
    async fn put(&self, key: &[u8], value: &[u8]) -> EngineResult<()>;

    /// Latest value for `key`, `None` if it was never written
    async fn get(&self, key: &[u8]) -> EngineResult<Option<Vec<u8>>>;

    /// Which engine this is
    fn kind(&self) -> EngineKind;
}
