//! Configuration module
//!
//! This module provides the configuration structures for the API: server,
//! database, token signing and the two storage backends. Everything is read
//! from the environment (optionally seeded from a `.env` file).

use std::env;
use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};

// Common constants
const SERVER_HOST: &str = "0.0.0.0";
const SERVER_PORT: u16 = 8080;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const JWT_EXPIRY_HOURS: i64 = 24;
const STORAGE_TIMEOUT_SECS: u64 = 30;
const S3_KEY_PREFIX: &str = "profiles";
const LOCAL_STORAGE_PATH: &str = "uploads/photos";
const LOCAL_STORAGE_URL_PREFIX: &str = "/uploads/photos";

/// Upper bound on the token lifetime (one year).
pub const MAX_JWT_EXPIRY_HOURS: i64 = 24 * 365;

/// Minimum amount of decoded key material for the token signing secret (512 bits).
pub const MIN_JWT_SECRET_BYTES: usize = 64;

/// Server, database and authentication settings
#[derive(Clone)]
pub struct BaseConfig {
    pub server_host: String,
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    /// Base64-encoded signing key. Never logged.
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
}

impl fmt::Debug for BaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseConfig")
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("cors_origins", &self.cors_origins)
            .field("environment", &self.environment)
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("db_max_connections", &self.db_max_connections)
            .field("db_timeout_seconds", &self.db_timeout_seconds)
            .field("jwt_secret", &"<redacted>")
            .field("jwt_expiry_hours", &self.jwt_expiry_hours)
            .finish()
    }
}

/// Storage backend settings
///
/// Either backend may be wired independently; when both are, object storage wins.
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub s3_enabled: bool,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub s3_key_prefix: String,
    pub local_enabled: bool,
    pub local_storage_path: String,
    pub local_storage_url_prefix: String,
    pub timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            s3_enabled: false,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            s3_key_prefix: S3_KEY_PREFIX.to_string(),
            local_enabled: true,
            local_storage_path: LOCAL_STORAGE_PATH.to_string(),
            local_storage_url_prefix: LOCAL_STORAGE_URL_PREFIX.to_string(),
            timeout_secs: STORAGE_TIMEOUT_SECS,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub base: BaseConfig,
    pub storage: StorageConfig,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<AppConfig>);

impl Config {
    fn inner(&self) -> &AppConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let environment = self.inner().base.environment.to_lowercase();
        environment == "production" || environment == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = AppConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    // Convenience getters for common fields
    pub fn server_host(&self) -> &str {
        &self.inner().base.server_host
    }

    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn database_url(&self) -> Option<&str> {
        self.inner().base.database_url.as_deref()
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().base.db_timeout_seconds
    }

    /// Decoded signing key material.
    pub fn jwt_secret_bytes(&self) -> Result<Vec<u8>, anyhow::Error> {
        decode_jwt_secret(&self.inner().base.jwt_secret)
    }

    pub fn jwt_expiry_hours(&self) -> i64 {
        self.inner().base.jwt_expiry_hours
    }

    pub fn storage(&self) -> &StorageConfig {
        &self.inner().storage
    }

    pub fn storage_timeout_secs(&self) -> u64 {
        self.inner().storage.timeout_secs
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| SERVER_HOST.to_string()),
            server_port: env::var("SERVER_PORT")
                .or_else(|_| env::var("PORT"))
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("SERVER_PORT must be a valid number"))?,
            cors_origins,
            environment,
            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.trim().is_empty()),
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            jwt_expiry_hours: env::var("JWT_EXPIRY_HOURS")
                .unwrap_or_else(|_| JWT_EXPIRY_HOURS.to_string())
                .parse()
                .unwrap_or(JWT_EXPIRY_HOURS),
        };

        let s3_enabled = env_flag("S3_ENABLED", false);

        let storage = StorageConfig {
            s3_enabled,
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION")
                .or_else(|_| env::var("AWS_REGION"))
                .ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            s3_key_prefix: env::var("S3_KEY_PREFIX")
                .unwrap_or_else(|_| S3_KEY_PREFIX.to_string()),
            // Local disk is the fallback: wired by default only when S3 is off.
            local_enabled: env_flag("LOCAL_STORAGE_ENABLED", !s3_enabled),
            local_storage_path: env::var("LOCAL_STORAGE_PATH")
                .unwrap_or_else(|_| LOCAL_STORAGE_PATH.to_string()),
            local_storage_url_prefix: env::var("LOCAL_STORAGE_URL_PREFIX")
                .unwrap_or_else(|_| LOCAL_STORAGE_URL_PREFIX.to_string()),
            timeout_secs: env::var("STORAGE_TIMEOUT_SECS")
                .unwrap_or_else(|_| STORAGE_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(STORAGE_TIMEOUT_SECS),
        };

        let config = AppConfig { base, storage };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let key = decode_jwt_secret(&self.base.jwt_secret)?;
        if key.len() < MIN_JWT_SECRET_BYTES {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must decode to at least {} bytes (got {}). Run generate_key to create one.",
                MIN_JWT_SECRET_BYTES,
                key.len()
            ));
        }

        if self.base.jwt_expiry_hours <= 0 {
            return Err(anyhow::anyhow!("JWT_EXPIRY_HOURS must be positive"));
        }
        if self.base.jwt_expiry_hours > MAX_JWT_EXPIRY_HOURS {
            return Err(anyhow::anyhow!(
                "JWT_EXPIRY_HOURS must not exceed {} (one year)",
                MAX_JWT_EXPIRY_HOURS
            ));
        }

        if let Some(url) = &self.base.database_url {
            if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
                return Err(anyhow::anyhow!(
                    "DATABASE_URL must be a valid PostgreSQL connection string"
                ));
            }
        }

        if self.storage.s3_enabled {
            if self.storage.s3_bucket.is_none() {
                return Err(anyhow::anyhow!(
                    "S3_BUCKET must be set when S3_ENABLED=true"
                ));
            }
            if self.storage.s3_region.is_none() {
                return Err(anyhow::anyhow!(
                    "S3_REGION or AWS_REGION must be set when S3_ENABLED=true"
                ));
            }
        }

        if self.storage.local_enabled {
            if self.storage.local_storage_path.trim().is_empty() {
                return Err(anyhow::anyhow!(
                    "LOCAL_STORAGE_PATH must not be empty when local storage is enabled"
                ));
            }
            if !self.storage.local_storage_url_prefix.starts_with('/') {
                return Err(anyhow::anyhow!(
                    "LOCAL_STORAGE_URL_PREFIX must be a root-relative path starting with '/'"
                ));
            }
        }

        if self.storage.timeout_secs == 0 {
            return Err(anyhow::anyhow!("STORAGE_TIMEOUT_SECS must be positive"));
        }

        if !self.storage.s3_enabled && !self.storage.local_enabled {
            tracing::warn!("No storage backend enabled; uploads will be rejected");
        }

        Ok(())
    }
}

/// Decode the base64 signing secret as produced by the key generator.
pub fn decode_jwt_secret(secret: &str) -> Result<Vec<u8>, anyhow::Error> {
    STANDARD
        .decode(secret.trim())
        .map_err(|e| anyhow::anyhow!("JWT_SECRET must be base64 encoded: {}", e))
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().to_lowercase().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret_of(len: usize) -> String {
        STANDARD.encode(vec![7u8; len])
    }

    fn test_config() -> AppConfig {
        AppConfig {
            base: BaseConfig {
                server_host: "127.0.0.1".to_string(),
                server_port: 8080,
                cors_origins: vec!["*".to_string()],
                environment: "development".to_string(),
                database_url: None,
                db_max_connections: 5,
                db_timeout_seconds: 5,
                jwt_secret: secret_of(64),
                jwt_expiry_hours: 24,
            },
            storage: StorageConfig::default(),
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn short_secret_is_rejected() {
        let mut config = test_config();
        config.base.jwt_secret = secret_of(32);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("at least 64 bytes"));
    }

    #[test]
    fn non_base64_secret_is_rejected() {
        let mut config = test_config();
        config.base.jwt_secret = "not base64 at all!!".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn token_lifetime_is_bounded() {
        let mut config = test_config();
        config.base.jwt_expiry_hours = 0;
        assert!(config.validate().is_err());

        config.base.jwt_expiry_hours = i64::MAX;
        assert!(config.validate().is_err());

        config.base.jwt_expiry_hours = MAX_JWT_EXPIRY_HOURS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn s3_requires_bucket_and_region() {
        let mut config = test_config();
        config.storage.s3_enabled = true;
        assert!(config.validate().is_err());

        config.storage.s3_bucket = Some("portfolio-photos".to_string());
        assert!(config.validate().is_err());

        config.storage.s3_region = Some("us-east-1".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn local_url_prefix_must_be_root_relative() {
        let mut config = test_config();
        config.storage.local_storage_url_prefix = "uploads/photos".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn debug_output_redacts_secret() {
        let config = Config(Box::new(test_config()));
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains(&secret_of(64)));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn production_detection() {
        let mut inner = test_config();
        inner.base.environment = "Production".to_string();
        assert!(Config(Box::new(inner)).is_production());
        assert!(!Config(Box::new(test_config())).is_production());
    }
}
