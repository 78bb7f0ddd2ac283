//! Types used by the upload coordinator

use folio_core::{AppError, PhotoCategory, StorageBackend, ValidationError};
use folio_storage::StorageError;
use serde::Serialize;

/// File bytes plus what the client declared about them.
#[derive(Debug, Clone)]
pub struct PhotoFile {
    pub data: Vec<u8>,
    pub filename: String,
    pub content_type: String,
    /// Size announced by the client; checked alongside the real byte count.
    pub declared_size: usize,
}

impl PhotoFile {
    pub fn new(data: Vec<u8>, filename: impl Into<String>, content_type: impl Into<String>) -> Self {
        let declared_size = data.len();
        Self {
            data,
            filename: filename.into(),
            content_type: content_type.into(),
            declared_size,
        }
    }

    pub fn with_declared_size(mut self, declared_size: usize) -> Self {
        self.declared_size = declared_size;
        self
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// One upload call. Transient, never persisted.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file: PhotoFile,
    pub category: PhotoCategory,
}

impl UploadRequest {
    pub fn new(file: PhotoFile, category: PhotoCategory) -> Self {
        Self { file, category }
    }
}

/// A photo that was written and, for profile photos, recorded on the profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub file_url: String,
    pub key: String,
    pub original_filename: String,
    pub size: usize,
    pub storage_type: StorageBackend,
    pub photo_type: String,
    /// Previous profile photo handed to best-effort cleanup, if any.
    pub replaced_url: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    InvalidCategory(AppError),

    #[error("No storage backend configured")]
    NoBackendConfigured,

    #[error("Upload failed: {0}")]
    WriteFailed(#[source] StorageError),

    #[error("Storage write timed out after {0}s")]
    Timeout(u64),

    #[error("Failed to update profile record: {0}")]
    RecordUpdateFailed(#[source] AppError),
}

/// Active backend and static upload limits, as reported to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageInfo {
    pub current_storage_type: String,
    pub s3_available: bool,
    pub local_storage_available: bool,
    pub max_file_size: String,
    pub max_file_size_bytes: usize,
    pub allowed_extensions: Vec<String>,
}

impl StorageInfo {
    pub(crate) fn storage_type_name(backend: Option<StorageBackend>) -> String {
        backend
            .map(|b| b.display_name())
            .unwrap_or(StorageBackend::NONE_DISPLAY_NAME)
            .to_string()
    }
}
