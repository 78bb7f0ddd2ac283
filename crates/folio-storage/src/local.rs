use crate::keys::{generate_photo_key, validate_key};
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
///
/// Files live under `base_path` and are addressed by root-relative URLs under
/// `url_prefix`, which the HTTP layer serves as static files.
#[derive(Clone, Debug)]
pub struct LocalStorage {
    base_path: PathBuf,
    url_prefix: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "uploads/photos")
    /// * `url_prefix` - Root-relative URL the directory is served under (e.g., "/uploads/photos")
    pub async fn new(base_path: impl Into<PathBuf>, url_prefix: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            url_prefix: format!("/{}", url_prefix.trim_matches('/')),
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    /// Convert storage key to filesystem path with security validation
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        validate_key(storage_key)?;
        Ok(self.base_path.join(storage_key))
    }

    /// Generate public URL for file
    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.url_prefix.trim_end_matches('/'), key)
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    fn generate_key(
        &self,
        owner: &str,
        photo_type: &str,
        filename: &str,
    ) -> StorageResult<String> {
        generate_photo_key(None, owner, photo_type, filename)
    }

    async fn put(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        _content_type: &str,
    ) -> StorageResult<String> {
        let path = self.key_to_path(storage_key)?;
        let size = data.len();

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        let url = self.generate_url(storage_key);

        tracing::info!(
            path = %path.display(),
            key = %storage_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(url)
    }

    async fn delete_key(&self, storage_key: &str) -> StorageResult<()> {
        let path = self.key_to_path(storage_key)?;
        let start = std::time::Instant::now();

        if !fs::try_exists(&path).await.unwrap_or(false) {
            tracing::debug!(key = %storage_key, "Local file already absent, nothing to delete");
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %storage_key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage delete successful"
        );

        Ok(())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(storage_key)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    fn key_from_url(&self, file_url: &str) -> Option<String> {
        // Absolute URLs pointing at this server are accepted too; only the path matters.
        let path = match file_url.split_once("://") {
            Some((_, rest)) => &rest[rest.find('/')?..],
            None => file_url,
        };
        let path = path.split(['?', '#']).next()?;

        let prefix = self.url_prefix.trim_end_matches('/');
        let key = path.strip_prefix(prefix)?.strip_prefix('/')?;
        let key = urlencoding::decode(key).ok()?.into_owned();

        validate_key(&key).ok()?;
        Some(key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
