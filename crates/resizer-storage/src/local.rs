use crate::keys::{artifact_filename, parse_artifact_filename, parse_temp_filename, temp_filename};
use crate::traits::{OutputArtifact, Storage, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Local filesystem storage implementation
///
/// Artifacts live directly under `base_path` (no subdirectories). Each write
/// goes to a hidden temporary file that is renamed into place once complete,
/// so readers and listings never see a partial artifact.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for artifacts (e.g., "public/outputs"), created if missing
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve an artifact filename to its path, rejecting anything that is
    /// not an artifact name.
    fn artifact_path(&self, filename: &str) -> Option<PathBuf> {
        parse_artifact_filename(filename).map(|_| self.base_path.join(filename))
    }

    async fn write_new(&self, id: Uuid, data: &[u8]) -> StorageResult<PathBuf> {
        // Recreated on every write in case the directory was removed underneath us.
        fs::create_dir_all(&self.base_path).await?;

        let temp_path = self.base_path.join(temp_filename(id));
        let final_path = self.base_path.join(artifact_filename(id));

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path)
            .await
            .map_err(|e| {
                StorageError::WriteFailed(format!(
                    "Failed to create file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
        // Removes the temp file on error and when this future is dropped mid-write.
        let mut partial = PartialFile::new(temp_path.clone());

        let written = async {
            file.write_all(data).await?;
            file.sync_all().await?;
            drop(file);
            if fs::try_exists(&final_path).await? {
                return Err(std::io::Error::new(
                    ErrorKind::AlreadyExists,
                    "artifact name already taken",
                ));
            }
            fs::rename(&temp_path, &final_path).await
        }
        .await;

        if let Err(e) = written {
            return Err(StorageError::WriteFailed(format!(
                "Failed to write file {}: {}",
                final_path.display(),
                e
            )));
        }
        partial.disarm();

        Ok(final_path)
    }
}

/// A temp file that is deleted on drop unless the write completed.
struct PartialFile {
    path: Option<PathBuf>,
}

impl PartialFile {
    fn new(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    fn disarm(&mut self) {
        self.path = None;
    }
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        let Some(path) = self.path.take() else {
            return;
        };
        match std::fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Removed incomplete write");
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    path = %path.display(),
                    "Failed to remove incomplete write"
                );
            }
        }
    }
}

fn modified_at(metadata: &std::fs::Metadata) -> DateTime<Utc> {
    metadata
        .modified()
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now())
}

#[async_trait]
impl Storage for LocalStorage {
    async fn put(&self, data: Bytes) -> StorageResult<OutputArtifact> {
        let id = Uuid::new_v4();
        let size = data.len();
        let start = std::time::Instant::now();

        let path = self.write_new(id, &data).await?;

        let created_at = match fs::metadata(&path).await {
            Ok(meta) => modified_at(&meta),
            Err(_) => Utc::now(),
        };

        let artifact = OutputArtifact {
            id,
            filename: artifact_filename(id),
            created_at,
            size_bytes: size as u64,
        };

        tracing::info!(
            path = %path.display(),
            key = %artifact.filename,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage write successful"
        );

        Ok(artifact)
    }

    async fn get(&self, filename: &str) -> StorageResult<Bytes> {
        let path = self
            .artifact_path(filename)
            .ok_or_else(|| StorageError::NotFound(filename.to_string()))?;
        let start = std::time::Instant::now();

        let data = match fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::NotFound(filename.to_string()))
            }
            Err(e) => {
                return Err(StorageError::ReadFailed(format!(
                    "Failed to read file {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        tracing::debug!(
            key = %filename,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage read successful"
        );

        Ok(Bytes::from(data))
    }

    async fn list(&self) -> StorageResult<Vec<OutputArtifact>> {
        let mut entries = match fs::read_dir(&self.base_path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::IoError(e)),
        };

        let mut artifacts = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let Some(filename) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            let Some(id) = parse_artifact_filename(&filename) else {
                continue;
            };

            match entry.metadata().await {
                Ok(meta) if meta.is_file() => artifacts.push(OutputArtifact {
                    id,
                    created_at: modified_at(&meta),
                    size_bytes: meta.len(),
                    filename,
                }),
                Ok(_) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    tracing::debug!(key = %filename, "Artifact vanished while listing");
                }
                Err(e) => {
                    tracing::warn!(error = %e, key = %filename, "Failed to stat artifact, skipping");
                }
            }
        }

        Ok(artifacts)
    }

    async fn delete(&self, filename: &str) -> StorageResult<()> {
        let path = self
            .artifact_path(filename)
            .ok_or_else(|| StorageError::InvalidKey(filename.to_string()))?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), key = %filename, "Local storage delete successful");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::DeleteFailed(format!(
                "Failed to delete file {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn purge_incomplete(&self, cutoff: DateTime<Utc>) -> StorageResult<usize> {
        let mut entries = match fs::read_dir(&self.base_path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(StorageError::IoError(e)),
        };

        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await? {
            let Some(filename) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if parse_temp_filename(&filename).is_none() {
                continue;
            }

            let stale = match entry.metadata().await {
                Ok(meta) => meta.is_file() && modified_at(&meta) < cutoff,
                Err(_) => false,
            };
            if !stale {
                continue;
            }

            match fs::remove_file(entry.path()).await {
                Ok(()) => {
                    removed += 1;
                    tracing::info!(key = %filename, "Removed stale temporary file");
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(error = %e, key = %filename, "Failed to remove stale temporary file");
                }
            }
        }

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_put_get() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let data = Bytes::from_static(b"jpeg bytes");
        let artifact = storage.put(data.clone()).await.unwrap();

        assert_eq!(artifact.filename, artifact_filename(artifact.id));
        assert_eq!(artifact.size_bytes, data.len() as u64);
        assert!(dir.path().join(&artifact.filename).exists());

        let read = storage.get(&artifact.filename).await.unwrap();
        assert_eq!(read, data);
    }

    #[tokio::test]
    async fn test_creates_missing_root() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("nested").join("outputs");
        let storage = LocalStorage::new(&root).await.unwrap();
        assert!(root.is_dir());

        // Idempotent on an existing directory.
        LocalStorage::new(&root).await.unwrap();

        std::fs::remove_dir_all(&root).unwrap();
        let artifact = storage.put(Bytes::from_static(b"x")).await.unwrap();
        assert!(root.join(artifact.filename).exists());
    }

    #[tokio::test]
    async fn test_identical_puts_get_distinct_names() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let data = Bytes::from_static(b"same");
        let first = storage.put(data.clone()).await.unwrap();
        let second = storage.put(data).await.unwrap();

        assert_ne!(first.filename, second.filename);
        assert!(storage.get(&first.filename).await.is_ok());
        assert!(storage.get(&second.filename).await.is_ok());
    }

    #[tokio::test]
    async fn test_concurrent_puts_are_distinct() {
        let dir = tempdir().unwrap();
        let storage = Arc::new(LocalStorage::new(dir.path()).await.unwrap());

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let storage = storage.clone();
                tokio::spawn(async move { storage.put(Bytes::from(vec![i as u8; 64])).await })
            })
            .collect();

        let results = futures::future::join_all(handles).await;
        let names: HashSet<String> = results
            .into_iter()
            .map(|r| r.unwrap().unwrap().filename)
            .collect();
        assert_eq!(names.len(), 32);
        assert_eq!(storage.list().await.unwrap().len(), 32);
    }

    #[tokio::test]
    async fn test_get_unknown_is_not_found() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let missing = artifact_filename(Uuid::new_v4());
        assert!(matches!(
            storage.get(&missing).await,
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(
            storage.get("../../../etc/passwd").await,
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(
            storage.get("output.jpg").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let artifact = storage.put(Bytes::from_static(b"bye")).await.unwrap();
        storage.delete(&artifact.filename).await.unwrap();
        storage.delete(&artifact.filename).await.unwrap();

        assert!(matches!(
            storage.get(&artifact.filename).await,
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(
            storage.delete("../escape.jpg").await,
            Err(StorageError::InvalidKey(_))
        ));
    }

    #[tokio::test]
    async fn test_list_ignores_foreign_and_temp_files() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let artifact = storage.put(Bytes::from_static(b"keep")).await.unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"hello").unwrap();
        std::fs::write(dir.path().join(temp_filename(Uuid::new_v4())), b"partial").unwrap();

        let listed = storage.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].filename, artifact.filename);
        assert_eq!(listed[0].id, artifact.id);
        assert_eq!(listed[0].size_bytes, 4);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        // The final name is taken, so the rename step refuses.
        let id = Uuid::new_v4();
        std::fs::write(dir.path().join(artifact_filename(id)), b"existing").unwrap();
        let result = storage.write_new(id, b"new").await;

        assert!(matches!(result, Err(StorageError::WriteFailed(_))));
        assert!(!dir.path().join(temp_filename(id)).exists());
        assert_eq!(
            std::fs::read(dir.path().join(artifact_filename(id))).unwrap(),
            b"existing"
        );
    }

    #[tokio::test]
    async fn test_dropped_write_removes_temp_file() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let mut put = Box::pin(storage.put(Bytes::from(vec![0u8; 64 * 1024 * 1024])));
        let mut saw_temp = false;
        for _ in 0..10_000 {
            tokio::select! {
                biased;
                _ = &mut put => break,
                _ = tokio::time::sleep(std::time::Duration::from_millis(1)) => {}
            }
            saw_temp = std::fs::read_dir(dir.path())
                .unwrap()
                .any(|e| parse_temp_filename(&e.unwrap().file_name().to_string_lossy()).is_some());
            if saw_temp {
                break;
            }
        }
        drop(put);

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| parse_temp_filename(name).is_some())
            .collect();
        assert!(saw_temp, "write finished before it could be interrupted");
        assert!(leftovers.is_empty(), "{:?}", leftovers);
    }

    #[tokio::test]
    async fn test_purge_incomplete_removes_only_stale_temp_files() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let artifact = storage.put(Bytes::from_static(b"keep")).await.unwrap();
        let leftover = dir.path().join(temp_filename(Uuid::new_v4()));
        std::fs::write(&leftover, b"partial").unwrap();
        std::fs::write(dir.path().join("notes.tmp"), b"foreign").unwrap();

        // Not old enough yet.
        let past = Utc::now() - chrono::Duration::hours(1);
        assert_eq!(storage.purge_incomplete(past).await.unwrap(), 0);
        assert!(leftover.exists());

        let future = Utc::now() + chrono::Duration::hours(1);
        assert_eq!(storage.purge_incomplete(future).await.unwrap(), 1);
        assert!(!leftover.exists());
        assert!(dir.path().join("notes.tmp").exists());
        assert!(storage.get(&artifact.filename).await.is_ok());
    }
}
