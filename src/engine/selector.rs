//! # Engine Selector
//!
//! The only place concrete engine types are named. Called once at startup.

use std::sync::Arc;

use super::cluster::ClusterEngine;
use super::config::{EngineConfig, EngineKind};
use super::errors::EngineResult;
use super::file::FileEngine;
use super::StorageEngine;

/// Build the configured engine.
///
/// An error from here is always startup-fatal: the caller must not begin
/// serving requests.
pub async fn open_engine(config: &EngineConfig) -> EngineResult<Arc<dyn StorageEngine>> {
    let engine: Arc<dyn StorageEngine> = match config.backend {
        EngineKind::Cluster => Arc::new(ClusterEngine::connect(&config.cluster).await?),
        EngineKind::File => {
            let file_config = config.file.clone();
            let engine =
                tokio::task::spawn_blocking(move || FileEngine::open(&file_config)).await??;
            Arc::new(engine)
        }
    };

    Ok(engine)
}
