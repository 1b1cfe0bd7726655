//! Storage abstraction trait
//!
//! This module defines the Storage trait that every Output Store backend implements.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A persisted output image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifact {
    pub id: Uuid,
    pub filename: String,
    pub created_at: DateTime<Utc>,
    pub size_bytes: u64,
}

impl OutputArtifact {
    /// Whether this artifact is older than `retention` at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>, retention: chrono::Duration) -> bool {
        now.signed_duration_since(self.created_at) > retention
    }
}

/// Storage abstraction trait
///
/// Artifacts are only ever created whole, read, or deleted; nothing is
/// updated in place. Operations on distinct filenames never interfere, so no
/// cross-operation locking is needed.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Persist a complete encoded buffer under a fresh, never-reused filename.
    async fn put(&self, data: Bytes) -> StorageResult<OutputArtifact>;

    /// Read an artifact by filename. Unknown or malformed names are `NotFound`.
    async fn get(&self, filename: &str) -> StorageResult<Bytes>;

    /// Enumerate the artifacts present right now.
    ///
    /// The listing is not a snapshot: artifacts may appear or vanish while it
    /// is being built, and those that vanish are simply left out.
    async fn list(&self) -> StorageResult<Vec<OutputArtifact>>;

    /// Delete an artifact. Deleting something already gone succeeds.
    async fn delete(&self, filename: &str) -> StorageResult<()>;

    /// Remove leftovers of writes that never completed and were last touched
    /// before `cutoff`. Returns how many were removed.
    ///
    /// Backends without partial writes have nothing to do.
    async fn purge_incomplete(&self, _cutoff: DateTime<Utc>) -> StorageResult<usize> {
        Ok(0)
    }
}
