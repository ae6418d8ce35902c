//! # Embedded File Engine
//!
//! A single redb database file holding one table (the bucket). redb keeps
//! its own commit log, so a committed write survives a crash.
//!
//! redb transactions are blocking. Each call runs its transaction on tokio's
//! blocking pool and awaits the join handle, so `put` resolves only after
//! the commit has finished and yields the commit's own result.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use redb::{Database, Durability, TableDefinition};

use super::config::{EngineKind, FileEngineConfig};
use super::errors::{EngineError, EngineResult};
use super::StorageEngine;

/// Embedded single-file storage engine
#[derive(Clone)]
pub struct FileEngine {
    db: Arc<Database>,
    bucket: Arc<str>,
    path: PathBuf,
}

fn table(bucket: &str) -> TableDefinition<'_, &'static [u8], &'static [u8]> {
    TableDefinition::new(bucket)
}

impl FileEngine {
    /// Open (or create) the database file and make sure the bucket exists.
    ///
    /// A bucket left by a previous run is reused.
    pub fn open(config: &FileEngineConfig) -> EngineResult<Self> {
        config.validate()?;
        let path = config.path.clone();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| EngineError::Open {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?;
            }
        }

        let db = Database::create(&path).map_err(|e| EngineError::Open {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let engine = Self {
            db: Arc::new(db),
            bucket: Arc::from(config.bucket.as_str()),
            path,
        };
        engine.ensure_bucket()?;

        Ok(engine)
    }

    fn ensure_bucket(&self) -> EngineResult<()> {
        let bucket_error = |reason: String| EngineError::BucketCreation {
            bucket: self.bucket.to_string(),
            reason,
        };

        let txn = self.db.begin_write().map_err(|e| bucket_error(e.to_string()))?;
        // Opening a table in a write transaction creates it if missing.
        txn.open_table(table(&self.bucket))
            .map_err(|e| bucket_error(e.to_string()))?;
        txn.commit().map_err(|e| bucket_error(e.to_string()))
    }

    /// Path of the database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name of the bucket holding the records
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn write(db: &Database, bucket: &str, key: &[u8], value: &[u8]) -> EngineResult<()> {
        let mut txn = db.begin_write()?;
        txn.set_durability(Durability::Immediate);
        {
            let mut records = txn.open_table(table(bucket))?;
            records.insert(key, value)?;
        }
        txn.commit()?;
        Ok(())
    }

    fn read(db: &Database, bucket: &str, key: &[u8]) -> EngineResult<Option<Vec<u8>>> {
        let txn = db.begin_read()?;
        let records = txn.open_table(table(bucket))?;
        let value = records.get(key)?.map(|guard| guard.value().to_vec());
        Ok(value)
    }
}

impl fmt::Debug for FileEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileEngine")
            .field("path", &self.path)
            .field("bucket", &self.bucket)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl StorageEngine for FileEngine {
    async fn put(&self, key: &[u8], value: &[u8]) -> EngineResult<()> {
        let db = Arc::clone(&self.db);
        let bucket = Arc::clone(&self.bucket);
        let key = key.to_vec();
        let value = value.to_vec();

        tokio::task::spawn_blocking(move || Self::write(&db, &bucket, &key, &value)).await?
    }

    async fn get(&self, key: &[u8]) -> EngineResult<Option<Vec<u8>>> {
        let db = Arc::clone(&self.db);
        let bucket = Arc::clone(&self.bucket);
        let key = key.to_vec();

        tokio::task::spawn_blocking(move || Self::read(&db, &bucket, &key)).await?
    }

    fn kind(&self) -> EngineKind {
        EngineKind::File
    }
}
