//! Service initialization and application state setup

use crate::auth::TokenCodec;
use crate::services::upload::UploadCoordinator;
use crate::state::AppState;
use anyhow::Result;
use folio_core::Config;
use folio_db::{ProfileRepository, UserRepository};
use folio_storage::StorageBackends;
use std::sync::Arc;
use std::time::Duration;

/// Wire repositories and storage into the shared application state.
pub fn initialize_services(
    config: &Config,
    users: Arc<dyn UserRepository>,
    profiles: Arc<dyn ProfileRepository>,
    backends: StorageBackends,
) -> Result<Arc<AppState>> {
    let codec = Arc::new(TokenCodec::from_config(config)?);
    tracing::debug!(codec = ?codec, "Token codec ready");

    let uploads = UploadCoordinator::new(
        backends,
        profiles.clone(),
        Duration::from_secs(config.storage_timeout_secs()),
    );

    Ok(Arc::new(AppState {
        config: config.clone(),
        codec,
        users,
        profiles,
        uploads,
    }))
}
