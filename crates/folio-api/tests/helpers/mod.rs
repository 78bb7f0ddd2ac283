//! Test helpers: build AppState and router for integration tests.
//!
//! Accounts and profiles live in memory; photos go to a temporary directory
//! (or an in-memory object store for the S3 cases).

#![allow(dead_code)]

pub mod auth;
pub mod fixtures;

use axum_test::TestServer;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use folio_api::setup::{routes, services};
use folio_api::AppState;
use folio_core::{AppConfig, BaseConfig, Config, StorageConfig};
use folio_db::{InMemoryProfileRepository, InMemoryUserRepository};
use folio_storage::{LocalStorage, S3Storage, Storage, StorageBackends};
use object_store::memory::InMemory;
use std::sync::Arc;
use tempfile::TempDir;

pub const LOCAL_URL_PREFIX: &str = "/uploads/photos";

/// Test application: server, shared state and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub storage_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn test_config(storage_dir: &TempDir, local_enabled: bool) -> Config {
    Config(Box::new(AppConfig {
        base: BaseConfig {
            server_host: "127.0.0.1".to_string(),
            server_port: 0,
            cors_origins: vec!["*".to_string()],
            environment: "test".to_string(),
            database_url: None,
            db_max_connections: 1,
            db_timeout_seconds: 5,
            jwt_secret: STANDARD.encode([42u8; 64]),
            jwt_expiry_hours: 24,
        },
        storage: StorageConfig {
            local_enabled,
            local_storage_path: storage_dir.path().to_string_lossy().into_owned(),
            local_storage_url_prefix: LOCAL_URL_PREFIX.to_string(),
            timeout_secs: 5,
            ..StorageConfig::default()
        },
    }))
}

async fn build_app(local_enabled: bool, with_s3: bool) -> TestApp {
    let storage_dir = tempfile::tempdir().unwrap();
    let config = test_config(&storage_dir, local_enabled);

    let local: Option<Arc<dyn Storage>> = if local_enabled {
        let storage = LocalStorage::new(storage_dir.path(), LOCAL_URL_PREFIX.to_string())
            .await
            .unwrap();
        Some(Arc::new(storage))
    } else {
        None
    };
    let s3: Option<Arc<dyn Storage>> = with_s3.then(|| {
        Arc::new(S3Storage::with_store(
            Arc::new(InMemory::new()),
            "portfolio-photos".to_string(),
            "us-east-1".to_string(),
            None,
            "profiles".to_string(),
        )) as Arc<dyn Storage>
    });

    let state = services::initialize_services(
        &config,
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemoryProfileRepository::new()),
        StorageBackends::new(s3, local),
    )
    .unwrap();
    let router = routes::setup_routes(&config, state.clone()).unwrap();

    TestApp {
        server: TestServer::new(router).unwrap(),
        state,
        storage_dir,
    }
}

/// Local disk only.
pub async fn setup_test_app() -> TestApp {
    build_app(true, false).await
}

/// Object storage and local disk both wired.
pub async fn setup_test_app_with_s3() -> TestApp {
    build_app(true, true).await
}

/// No storage backend at all.
pub async fn setup_test_app_without_storage() -> TestApp {
    build_app(false, false).await
}
