//! Application state shared by every handler.

use crate::auth::{AuthState, TokenCodec};
use crate::services::upload::UploadCoordinator;
use folio_core::Config;
use folio_db::{ProfileRepository, UserRepository};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub codec: Arc<TokenCodec>,
    pub users: Arc<dyn UserRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub uploads: UploadCoordinator,
}

impl AppState {
    /// State consumed by the authentication middleware.
    pub fn auth_state(&self) -> AuthState {
        AuthState {
            codec: self.codec.clone(),
            users: self.users.clone(),
        }
    }
}
