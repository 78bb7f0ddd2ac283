//! Folio Storage Library
//!
//! This crate provides the storage abstraction used for uploaded photos and
//! its two implementations: S3-compatible object storage and the local
//! filesystem.
//!
//! # Storage key format
//!
//! - **S3**: `{prefix}/{owner}/{photo_type}_{random8hex}{ext}` (prefix defaults to `profiles`)
//! - **Local**: `{owner}/{photo_type}_{random8hex}{ext}` under the storage root
//!
//! Keys never contain `..` segments or a leading `/`. Key generation is
//! centralized in the `keys` module so both backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::{create_storage_backends, select_backend, StorageBackends};
pub use folio_core::StorageBackend;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult, StoredFile};
