#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{Storage, StorageBackend, StorageError, StorageResult};
use folio_core::StorageConfig;
use std::sync::Arc;

/// The backends wired for this deployment, resolved once at startup.
#[derive(Clone, Default)]
pub struct StorageBackends {
    object_store: Option<Arc<dyn Storage>>,
    local: Option<Arc<dyn Storage>>,
}

impl StorageBackends {
    pub fn new(object_store: Option<Arc<dyn Storage>>, local: Option<Arc<dyn Storage>>) -> Self {
        Self {
            object_store,
            local,
        }
    }

    /// The backend every upload goes to, if any.
    pub fn active(&self) -> Option<Arc<dyn Storage>> {
        select_backend(self.object_store.as_ref(), self.local.as_ref())
    }

    pub fn active_type(&self) -> Option<StorageBackend> {
        self.active().map(|storage| storage.backend_type())
    }

    pub fn has_object_store(&self) -> bool {
        self.object_store.is_some()
    }

    pub fn has_local(&self) -> bool {
        self.local.is_some()
    }
}

impl std::fmt::Debug for StorageBackends {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageBackends")
            .field("object_store", &self.has_object_store())
            .field("local", &self.has_local())
            .finish()
    }
}

/// Object storage wins whenever it is wired; local disk is the fallback.
pub fn select_backend(
    object_store: Option<&Arc<dyn Storage>>,
    local: Option<&Arc<dyn Storage>>,
) -> Option<Arc<dyn Storage>> {
    object_store.or(local).cloned()
}

/// Create the storage backends enabled in configuration
pub async fn create_storage_backends(config: &StorageConfig) -> StorageResult<StorageBackends> {
    let object_store = if config.s3_enabled {
        Some(create_s3(config).await?)
    } else {
        None
    };

    let local = if config.local_enabled {
        Some(create_local(config).await?)
    } else {
        None
    };

    let backends = StorageBackends::new(object_store, local);

    match backends.active_type() {
        Some(backend) => tracing::info!(
            backend = %backend,
            s3_available = backends.has_object_store(),
            local_available = backends.has_local(),
            "Storage backends initialized"
        ),
        None => tracing::warn!("No storage backend configured; uploads will fail"),
    }

    Ok(backends)
}

#[cfg(feature = "storage-s3")]
async fn create_s3(config: &StorageConfig) -> StorageResult<Arc<dyn Storage>> {
    let bucket = config
        .s3_bucket
        .clone()
        .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?;
    let region = config.s3_region.clone().ok_or_else(|| {
        StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
    })?;

    let storage = S3Storage::new(
        bucket,
        region,
        config.s3_endpoint.clone(),
        config.s3_key_prefix.clone(),
    )
    .await?;
    Ok(Arc::new(storage))
}

#[cfg(not(feature = "storage-s3"))]
async fn create_s3(_config: &StorageConfig) -> StorageResult<Arc<dyn Storage>> {
    Err(StorageError::ConfigError(
        "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
    ))
}

#[cfg(feature = "storage-local")]
async fn create_local(config: &StorageConfig) -> StorageResult<Arc<dyn Storage>> {
    let storage = LocalStorage::new(
        config.local_storage_path.clone(),
        config.local_storage_url_prefix.clone(),
    )
    .await?;
    Ok(Arc::new(storage))
}

#[cfg(not(feature = "storage-local"))]
async fn create_local(_config: &StorageConfig) -> StorageResult<Arc<dyn Storage>> {
    Err(StorageError::ConfigError(
        "Local storage backend not available (storage-local feature not enabled)".to_string(),
    ))
}
