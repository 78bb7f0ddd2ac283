use folio_core::{AppError, Profile};
use sqlx::{PgPool, Postgres};

/// Profile documents keyed by owner username.
#[async_trait::async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find_by_owner(&self, username: &str) -> Result<Option<Profile>, AppError>;

    /// Insert or replace the owner's profile document.
    async fn save(&self, profile: Profile) -> Result<Profile, AppError>;

    /// Returns whether a profile was removed.
    async fn delete_by_owner(&self, username: &str) -> Result<bool, AppError>;

    async fn exists_by_owner(&self, username: &str) -> Result<bool, AppError>;
}

/// PostgreSQL-backed profile repository; the document is stored as JSONB
#[derive(Clone)]
pub struct PostgresProfileRepository {
    pool: PgPool,
}

impl PostgresProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn decode_profile(document: serde_json::Value) -> Result<Profile, AppError> {
    serde_json::from_value(document).map_err(|e| {
        tracing::error!(error = %e, "Stored profile document is not readable");
        AppError::Internal(format!("Corrupt profile document: {}", e))
    })
}

#[async_trait::async_trait]
impl ProfileRepository for PostgresProfileRepository {
    #[tracing::instrument(skip(self), fields(db.table = "profiles", db.operation = "select"))]
    async fn find_by_owner(&self, username: &str) -> Result<Option<Profile>, AppError> {
        let document = sqlx::query_scalar::<Postgres, serde_json::Value>(
            "SELECT document FROM profiles WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        document.map(decode_profile).transpose()
    }

    #[tracing::instrument(skip(self, profile), fields(db.table = "profiles", db.operation = "upsert", username = %profile.username))]
    async fn save(&self, profile: Profile) -> Result<Profile, AppError> {
        let document = serde_json::to_value(&profile)
            .map_err(|e| AppError::Internal(format!("Failed to encode profile: {}", e)))?;

        let stored = sqlx::query_scalar::<Postgres, serde_json::Value>(
            r#"
            INSERT INTO profiles (username, user_id, document)
            VALUES ($1, $2, $3)
            ON CONFLICT (username) DO UPDATE
            SET user_id = EXCLUDED.user_id, document = EXCLUDED.document, updated_at = NOW()
            RETURNING document
            "#,
        )
        .bind(&profile.username)
        .bind(&profile.user_id)
        .bind(document)
        .fetch_one(&self.pool)
        .await?;

        decode_profile(stored)
    }

    #[tracing::instrument(skip(self), fields(db.table = "profiles", db.operation = "delete"))]
    async fn delete_by_owner(&self, username: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM profiles WHERE username = $1")
            .bind(username)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self), fields(db.table = "profiles", db.operation = "select"))]
    async fn exists_by_owner(&self, username: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<Postgres, bool>(
            "SELECT EXISTS(SELECT 1 FROM profiles WHERE username = $1)",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}
