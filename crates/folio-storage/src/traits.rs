//! Storage abstraction trait
//!
//! This module defines the Storage trait that both photo backends implement.

use crate::StorageBackend;
use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A successfully written photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub backend: StorageBackend,
    pub key: String,
    pub url: String,
}

/// Storage abstraction trait
///
/// Backends keep no index of what they store: the URL handed back from
/// [`Storage::put`] is the only reference, and the backend that produced it
/// must be able to turn it back into a key via [`Storage::key_from_url`].
#[async_trait]
pub trait Storage: Send + Sync {
    /// Generate a fresh, unique key for an owner's photo.
    fn generate_key(&self, owner: &str, photo_type: &str, filename: &str)
        -> StorageResult<String>;

    /// Write `data` under `storage_key` and return its public URL.
    async fn put(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<String>;

    /// Delete a file by its storage key. Deleting a missing file succeeds.
    async fn delete_key(&self, storage_key: &str) -> StorageResult<()>;

    /// Check if a file exists
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Recover the storage key from a URL previously returned by `put`.
    fn key_from_url(&self, file_url: &str) -> Option<String>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;

    /// Generate a key and write the file in one step.
    async fn upload(
        &self,
        owner: &str,
        photo_type: &str,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<StoredFile> {
        let key = self.generate_key(owner, photo_type, filename)?;
        let url = self.put(&key, data, content_type).await?;
        Ok(StoredFile {
            backend: self.backend_type(),
            key,
            url,
        })
    }

    /// Best-effort delete by URL. Unparsable URLs, missing files and backend
    /// failures are logged and otherwise ignored.
    async fn delete(&self, file_url: &str) {
        let Some(key) = self.key_from_url(file_url) else {
            tracing::warn!(
                backend = %self.backend_type(),
                file_url = %file_url,
                "Cannot derive storage key from URL, skipping delete"
            );
            return;
        };

        if let Err(e) = self.delete_key(&key).await {
            tracing::warn!(
                error = %e,
                backend = %self.backend_type(),
                key = %key,
                "Best-effort delete failed"
            );
        }
    }
}
