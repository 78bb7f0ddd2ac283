//! Database setup and initialization

use anyhow::{Context, Result};
use folio_core::Config;
use folio_db::{
    InMemoryProfileRepository, InMemoryUserRepository, PostgresProfileRepository,
    PostgresUserRepository, ProfileRepository, UserRepository,
};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub type Repositories = (Arc<dyn UserRepository>, Arc<dyn ProfileRepository>);

/// PostgreSQL-backed repositories when `DATABASE_URL` is set, in-memory ones otherwise.
pub async fn setup_repositories(config: &Config) -> Result<Repositories> {
    let Some(database_url) = config.database_url() else {
        tracing::warn!("DATABASE_URL not set; accounts and profiles are kept in memory only");
        return Ok((
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryProfileRepository::new()),
        ));
    };

    let pool = setup_database(config, database_url).await?;
    Ok((
        Arc::new(PostgresUserRepository::new(pool.clone())),
        Arc::new(PostgresProfileRepository::new(pool)),
    ))
}

/// Setup database connection pool and run migrations
pub async fn setup_database(config: &Config, database_url: &str) -> Result<PgPool> {
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections())
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds()))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!(
        max_connections = config.db_max_connections(),
        "Database connected successfully"
    );

    // Workspace migrations/ relative to this crate
    let migrations_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../migrations");
    let migrator = sqlx::migrate::Migrator::new(migrations_dir)
        .await
        .context("Failed to load migrations")?;
    migrator
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    Ok(pool)
}
