//! Folio Core Library
//!
//! This crate provides the domain models, error types, configuration and upload
//! validation shared by the storage, persistence and API crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use config::{AppConfig, BaseConfig, Config, StorageConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    Identity, LoginRequest, LoginResponse, PhotoCategory, PortfolioPhotoType, Profile,
    RegisterRequest, TemplateUpdateRequest, UserRecord,
};
pub use storage_types::StorageBackend;
pub use validation::{PhotoValidator, ValidationError};
