//! Application setup and initialization
//!
//! Everything `main` needs to go from a loaded [`Config`] to a router that can
//! be served.

pub mod database;
pub mod routes;
pub mod server;
pub mod services;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use folio_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry(config.environment())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    config
        .validate()
        .context("Configuration validation failed")?;
    tracing::info!(config = ?config, "Configuration loaded and validated successfully");

    let (users, profiles) = database::setup_repositories(&config).await?;
    let backends = storage::setup_storage(&config).await?;

    let state = services::initialize_services(&config, users, profiles, backends)?;
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
