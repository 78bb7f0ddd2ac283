//! Photo upload pipeline
//!
//! `Validate -> SelectBackend -> Write -> ReconcileOwnerRecord`. Identity is
//! checked before anything else; validation and backend selection can reject
//! the upload before any I/O happens.

mod coordinator;
mod types;

pub use coordinator::UploadCoordinator;
pub use types::{PhotoFile, StorageInfo, UploadError, UploadOutcome, UploadRequest};
