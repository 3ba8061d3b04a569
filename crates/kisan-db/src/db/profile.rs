//! Farmer profile repository: upsert and lookup on the farmer_profiles table.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kisan_core::models::{DocumentMap, FarmerProfile, RegistrationDraft, StoredProfile};
use kisan_core::{AppError, Config};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use super::memory::InMemoryProfileStore;
use super::setup::setup_database;

/// Persistence for submitted profiles, keyed by user.
///
/// Implementations must keep at most one profile per `user_id`; a second
/// `upsert` for the same user replaces the stored fields but keeps `id` and
/// `created_at`.
#[async_trait::async_trait]
pub trait ProfileStore: Send + Sync {
    async fn upsert(&self, profile: &FarmerProfile) -> Result<StoredProfile, AppError>;

    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<StoredProfile>, AppError>;
}

/// Row type for farmer_profiles table (for FromRow).
#[derive(Debug, sqlx::FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub full_name: String,
    pub details: Json<RegistrationDraft>,
    pub documents: Json<DocumentMap>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileRow {
    pub fn to_stored_profile(self) -> Result<StoredProfile, AppError> {
        Ok(StoredProfile {
            id: self.id,
            profile: FarmerProfile {
                user_id: self.user_id,
                full_name: self.full_name,
                details: self.details.0,
                documents: self.documents.0,
                status: self.status.parse()?,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
        })
    }
}

const PROFILE_COLUMNS: &str =
    "id, user_id, full_name, details, documents, status, created_at, updated_at";

#[derive(Clone)]
pub struct PostgresProfileRepository {
    pool: PgPool,
}

impl PostgresProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ProfileStore for PostgresProfileRepository {
    #[tracing::instrument(skip(self, profile), fields(
        db.table = "farmer_profiles",
        db.operation = "upsert",
        user_id = %profile.user_id
    ))]
    async fn upsert(&self, profile: &FarmerProfile) -> Result<StoredProfile, AppError> {
        let query = format!(
            r#"
            INSERT INTO farmer_profiles
                (user_id, full_name, details, documents, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id) DO UPDATE SET
                full_name = EXCLUDED.full_name,
                details = EXCLUDED.details,
                documents = EXCLUDED.documents,
                status = EXCLUDED.status,
                updated_at = EXCLUDED.updated_at
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        );

        let row: ProfileRow = sqlx::query_as::<Postgres, ProfileRow>(&query)
            .bind(profile.user_id)
            .bind(&profile.full_name)
            .bind(Json(&profile.details))
            .bind(Json(&profile.documents))
            .bind(profile.status.as_str())
            .bind(profile.created_at)
            .bind(profile.updated_at)
            .fetch_one(&self.pool)
            .await?;

        let stored = row.to_stored_profile()?;
        tracing::info!(profile_id = %stored.id, "Farmer profile saved");
        Ok(stored)
    }

    #[tracing::instrument(skip(self), fields(
        db.table = "farmer_profiles",
        db.operation = "select",
        user_id = %user_id
    ))]
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<StoredProfile>, AppError> {
        let query = format!(
            "SELECT {} FROM farmer_profiles WHERE user_id = $1",
            PROFILE_COLUMNS
        );
        let row: Option<ProfileRow> = sqlx::query_as::<Postgres, ProfileRow>(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(ProfileRow::to_stored_profile).transpose()
    }
}

/// Factory function to create the profile store based on configuration
///
/// Uses PostgreSQL when `DATABASE_URL` is set. Without it, development runs
/// fall back to an in-memory store; production refuses to start.
pub async fn create_profile_store(config: &Config) -> Result<Arc<dyn ProfileStore>, AppError> {
    match &config.database_url {
        Some(url) => {
            tracing::info!("Initializing PostgreSQL profile store");
            let pool =
                setup_database(url, config.db_max_connections, config.db_timeout_seconds).await?;
            Ok(Arc::new(PostgresProfileRepository::new(pool)))
        }
        None if config.is_production() => Err(AppError::Configuration(
            "DATABASE_URL must be set in production".to_string(),
        )),
        None => {
            tracing::warn!("DATABASE_URL not set, profiles are kept in memory");
            Ok(Arc::new(InMemoryProfileStore::new()))
        }
    }
}
