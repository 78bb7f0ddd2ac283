use std::sync::Arc;
use std::time::{Duration, Instant};

use folio_core::constants::MAX_FILE_SIZE_LABEL;
use folio_core::{Identity, PhotoCategory, PhotoValidator, PortfolioPhotoType, Profile};
use folio_db::ProfileRepository;
use folio_storage::{Storage, StorageBackends};

use super::types::{PhotoFile, StorageInfo, UploadError, UploadOutcome, UploadRequest};

/// Coordinates photo uploads for authenticated owners.
///
/// Holds no per-request state; the caller's [`Identity`] is passed into every
/// entry point. Two concurrent profile-photo uploads from the same owner are
/// not serialized: either may win, and the loser's file is left orphaned.
#[derive(Clone)]
pub struct UploadCoordinator {
    backends: StorageBackends,
    profiles: Arc<dyn ProfileRepository>,
    validator: PhotoValidator,
    write_timeout: Duration,
}

impl UploadCoordinator {
    pub fn new(
        backends: StorageBackends,
        profiles: Arc<dyn ProfileRepository>,
        write_timeout: Duration,
    ) -> Self {
        Self {
            backends,
            profiles,
            validator: PhotoValidator::default(),
            write_timeout,
        }
    }

    /// Replace the owner's profile photo; the previous one is deleted afterwards.
    pub async fn upload_profile_photo(
        &self,
        identity: &Identity,
        file: PhotoFile,
    ) -> Result<UploadOutcome, UploadError> {
        self.upload(identity, UploadRequest::new(file, PhotoCategory::Profile))
            .await
    }

    /// Add a photo to one of the portfolio sections.
    pub async fn upload_portfolio_photo(
        &self,
        identity: &Identity,
        kind: PortfolioPhotoType,
        file: PhotoFile,
    ) -> Result<UploadOutcome, UploadError> {
        self.upload(identity, UploadRequest::new(file, PhotoCategory::Portfolio(kind)))
            .await
    }

    /// Store a photo under a caller-chosen path segment.
    pub async fn upload_file(
        &self,
        identity: &Identity,
        path: &str,
        file: PhotoFile,
    ) -> Result<UploadOutcome, UploadError> {
        require_owner(identity)?;
        let category = PhotoCategory::custom(path).map_err(UploadError::InvalidCategory)?;
        self.upload(identity, UploadRequest::new(file, category)).await
    }

    #[tracing::instrument(
        skip(self, identity, request),
        fields(
            owner = %identity.subject(),
            photo_type = %request.category.photo_type(),
            size_bytes = request.file.size(),
        )
    )]
    pub async fn upload(
        &self,
        identity: &Identity,
        request: UploadRequest,
    ) -> Result<UploadOutcome, UploadError> {
        let owner = require_owner(identity)?;
        let UploadRequest { file, category } = request;

        // Validate
        self.validator.validate_all(
            &file.filename,
            &file.content_type,
            file.declared_size,
            file.size(),
        )?;

        // SelectBackend
        let backend = self
            .backends
            .active()
            .ok_or(UploadError::NoBackendConfigured)?;

        // Write
        let photo_type = category.photo_type();
        let key = backend
            .generate_key(owner, &photo_type, &file.filename)
            .map_err(UploadError::WriteFailed)?;
        let size = file.size();
        let file_url = self.write(backend.as_ref(), &key, file.data, &file.content_type).await?;

        // ReconcileOwnerRecord
        let replaced_url = if category.replaces_existing() {
            self.replace_profile_photo(backend.as_ref(), owner, &file_url)
                .await?
        } else {
            None
        };

        tracing::info!(
            owner = %owner,
            key = %key,
            backend = %backend.backend_type(),
            replaced = replaced_url.is_some(),
            "Photo uploaded"
        );

        Ok(UploadOutcome {
            file_url,
            key,
            original_filename: file.filename,
            size,
            storage_type: backend.backend_type(),
            photo_type: category.label().to_string(),
            replaced_url,
        })
    }

    /// Best-effort delete of a previously uploaded file. Missing files and
    /// URLs the active backend cannot parse are ignored.
    pub async fn delete_file(&self, identity: &Identity, file_url: &str) -> Result<(), UploadError> {
        let owner = require_owner(identity)?;
        let backend = self
            .backends
            .active()
            .ok_or(UploadError::NoBackendConfigured)?;

        tracing::info!(owner = %owner, file_url = %file_url, "File deletion requested");
        self.cleanup(backend.as_ref(), file_url).await;
        Ok(())
    }

    pub fn storage_info(&self) -> StorageInfo {
        StorageInfo {
            current_storage_type: StorageInfo::storage_type_name(self.backends.active_type()),
            s3_available: self.backends.has_object_store(),
            local_storage_available: self.backends.has_local(),
            max_file_size: MAX_FILE_SIZE_LABEL.to_string(),
            max_file_size_bytes: self.validator.max_file_size(),
            allowed_extensions: self.validator.allowed_extensions().to_vec(),
        }
    }

    async fn write(
        &self,
        backend: &dyn Storage,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, UploadError> {
        let start = Instant::now();
        match tokio::time::timeout(self.write_timeout, backend.put(key, data, content_type)).await
        {
            Ok(Ok(url)) => Ok(url),
            Ok(Err(e)) => {
                tracing::error!(error = %e, key = %key, "Storage write failed");
                Err(UploadError::WriteFailed(e))
            }
            Err(_) => {
                tracing::error!(
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Storage write timed out"
                );
                Err(UploadError::Timeout(self.write_timeout.as_secs()))
            }
        }
    }

    /// Point the owner's profile at `new_url`, then drop the old photo from
    /// the same backend. Returns the URL that was replaced.
    async fn replace_profile_photo(
        &self,
        backend: &dyn Storage,
        owner: &str,
        new_url: &str,
    ) -> Result<Option<String>, UploadError> {
        let mut profile = self
            .profiles
            .find_by_owner(owner)
            .await
            .map_err(UploadError::RecordUpdateFailed)?
            .unwrap_or_else(|| Profile {
                username: owner.to_string(),
                ..Profile::default()
            });

        let old_url = profile
            .current_photo()
            .filter(|old| *old != new_url)
            .map(String::from);

        profile.profile_photo = Some(new_url.to_string());
        if let Err(e) = self.profiles.save(profile).await {
            // The new file stays in storage unreferenced.
            tracing::warn!(
                error = %e,
                owner = %owner,
                file_url = %new_url,
                "Profile update failed after upload, new photo is orphaned"
            );
            return Err(UploadError::RecordUpdateFailed(e));
        }

        if let Some(ref old_url) = old_url {
            self.cleanup(backend, old_url).await;
        }

        Ok(old_url)
    }

    async fn cleanup(&self, backend: &dyn Storage, file_url: &str) {
        if tokio::time::timeout(self.write_timeout, backend.delete(file_url))
            .await
            .is_err()
        {
            tracing::warn!(file_url = %file_url, "Best-effort delete timed out");
        }
    }
}

fn require_owner(identity: &Identity) -> Result<&str, UploadError> {
    identity
        .require_subject()
        .map_err(|_| UploadError::Unauthenticated)
}
