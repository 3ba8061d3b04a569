//! Configuration module
//!
//! Environment-driven settings for storage, the profile database and document
//! limits. `.env` is loaded first when present.

use std::env;

use crate::constants::{ALLOWED_DOCUMENT_CONTENT_TYPES, DEFAULT_DOCUMENT_BUCKET};
use crate::storage_types::StorageBackend;
use crate::validation::FileValidator;

const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MAX_DOCUMENT_SIZE_MB: u64 = 5;

#[derive(Clone, Debug)]
pub struct Config {
    pub environment: String,
    // Profile database
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    // Document storage
    pub storage_backend: StorageBackend,
    pub storage_bucket: String,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // S3-compatible providers (MinIO, Supabase storage, ...)
    pub public_url_base: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Document limits
    pub max_document_size_bytes: u64,
    pub allowed_document_content_types: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => StorageBackend::S3,
        };

        let max_document_size_mb = env::var("MAX_DOCUMENT_SIZE_MB")
            .unwrap_or_else(|_| MAX_DOCUMENT_SIZE_MB.to_string())
            .parse::<u64>()
            .unwrap_or(MAX_DOCUMENT_SIZE_MB);

        let allowed_document_content_types = env::var("ALLOWED_DOCUMENT_CONTENT_TYPES")
            .unwrap_or_else(|_| ALLOWED_DOCUMENT_CONTENT_TYPES.join(","))
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        let config = Config {
            environment,
            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            storage_backend,
            storage_bucket: env::var("STORAGE_BUCKET")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_DOCUMENT_BUCKET.to_string()),
            s3_region: env::var("S3_REGION")
                .or_else(|_| env::var("AWS_REGION"))
                .ok()
                .filter(|s| !s.is_empty()),
            s3_endpoint: env::var("S3_ENDPOINT").ok().filter(|s| !s.is_empty()),
            public_url_base: env::var("PUBLIC_URL_BASE").ok().filter(|s| !s.is_empty()),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok().filter(|s| !s.is_empty()),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL")
                .ok()
                .filter(|s| !s.is_empty()),
            max_document_size_bytes: max_document_size_mb * 1024 * 1024,
            allowed_document_content_types,
        };

        config.validate()?;
        Ok(config)
    }

    /// Defaults for local development: in-memory storage, no database.
    pub fn development() -> Self {
        Config {
            environment: "development".to_string(),
            database_url: None,
            db_max_connections: MAX_CONNECTIONS,
            db_timeout_seconds: CONNECTION_TIMEOUT_SECS,
            storage_backend: StorageBackend::Memory,
            storage_bucket: DEFAULT_DOCUMENT_BUCKET.to_string(),
            s3_region: None,
            s3_endpoint: None,
            public_url_base: Some("http://localhost:3000/storage".to_string()),
            local_storage_path: None,
            local_storage_base_url: None,
            max_document_size_bytes: MAX_DOCUMENT_SIZE_MB * 1024 * 1024,
            allowed_document_content_types: ALLOWED_DOCUMENT_CONTENT_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if let Some(url) = &self.database_url {
            if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
                return Err(anyhow::anyhow!(
                    "DATABASE_URL must be a valid PostgreSQL connection string"
                ));
            }
        }

        if self.max_document_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_DOCUMENT_SIZE_MB must be greater than 0"));
        }

        if self.allowed_document_content_types.is_empty() {
            return Err(anyhow::anyhow!(
                "ALLOWED_DOCUMENT_CONTENT_TYPES must list at least one content type"
            ));
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_region.is_none() && self.s3_endpoint.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION, AWS_REGION or S3_ENDPOINT must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
            StorageBackend::Memory => {
                if self.is_production() {
                    return Err(anyhow::anyhow!(
                        "In-memory storage cannot be used in production"
                    ));
                }
            }
        }

        Ok(())
    }

    pub fn file_validator(&self) -> FileValidator {
        FileValidator::new(
            self.max_document_size_bytes,
            self.allowed_document_content_types.clone(),
        )
    }
}
