//! Storage setup and initialization

use anyhow::{Context, Result};
use folio_core::Config;
use folio_storage::{create_storage_backends, StorageBackends};

pub async fn setup_storage(config: &Config) -> Result<StorageBackends> {
    tracing::info!("Initializing storage backends...");
    let backends = create_storage_backends(config.storage())
        .await
        .context("Failed to initialize storage")?;
    tracing::info!(backends = ?backends, "Storage backends ready");
    Ok(backends)
}
