//! Domain models shared across crates

pub mod auth;
pub mod identity;
pub mod photo;
pub mod profile;
pub mod user;

pub use auth::{LoginRequest, LoginResponse, RegisterRequest, TemplateUpdateRequest};
pub use identity::Identity;
pub use photo::{PhotoCategory, PortfolioPhotoType};
pub use profile::Profile;
pub use user::UserRecord;
