//! Folio API
//!
//! HTTP surface of the portfolio backend: account registration and login,
//! profile documents, and photo uploads to object storage or local disk.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;
pub mod utils;

pub use error::{ErrorResponse, HttpAppError, ValidatedJson};
pub use state::AppState;
