use std::io;
use std::path::Path;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed document {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode document: {0}")]
    Encode(#[source] serde_json::Error),
}

/// A flat JSON array of records, cached in memory and rewritten in full on
/// every mutation.
///
/// Reads share the lock. Writes hold the write lock across the file rewrite,
/// so concurrent mutations are serialized and the cache never runs ahead of
/// the file.
pub struct JsonDocument<T> {
    path: PathBuf,
    records: RwLock<Vec<T>>,
}

impl<T> JsonDocument<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync,
{
    /// Load the document at `path`. A missing file is an empty collection; an
    /// existing file must hold a JSON array, even when it has no records.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| StorageError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        let records = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                serde_json::from_slice(&bytes).map_err(|source| StorageError::Malformed {
                    path: path.clone(),
                    source,
                })?
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(source) => return Err(StorageError::Read { path, source }),
        };

        tracing::debug!(path = %path.display(), records = records.len(), "Document loaded");

        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn read<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        let records = self.records.read().await;
        f(&records)
    }

    /// Apply `mutate` to a copy of the records, persist the copy and only then
    /// make it visible. A failed mutation or write leaves both cache and file
    /// untouched.
    pub async fn write<R, E>(
        &self,
        mutate: impl FnOnce(&mut Vec<T>) -> Result<R, E>,
    ) -> Result<R, E>
    where
        E: From<StorageError>,
    {
        let mut records = self.records.write().await;
        let mut next = records.clone();

        let outcome = mutate(&mut next)?;
        self.persist(&next).await?;
        *records = next;

        Ok(outcome)
    }

    async fn persist(&self, records: &[T]) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(records).map_err(StorageError::Encode)?;
        let staging = self.path.with_extension("json.tmp");

        let write_error = |source| StorageError::Write {
            path: staging.clone(),
            source,
        };

        let mut file = tokio::fs::File::create(&staging)
            .await
            .map_err(write_error)?;
        file.write_all(&bytes).await.map_err(write_error)?;
        // Durable before the rename, so a crash never leaves a truncated target.
        file.sync_all().await.map_err(write_error)?;
        drop(file);

        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(|source| StorageError::Write {
                path: self.path.clone(),
                source,
            })
    }
}
