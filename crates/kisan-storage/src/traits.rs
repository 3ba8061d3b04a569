//! Storage abstraction trait
//!
//! Every document backend implements `Storage`; the upload flow only ever
//! talks to this trait.

use async_trait::async_trait;
use bytes::Bytes;
use kisan_core::AppError;
use thiserror::Error;

use crate::StorageBackend;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Object already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(key) => AppError::NotFound(key),
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            StorageError::ConfigError(msg) => AppError::Configuration(msg),
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Where a stored object landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Key of the object inside the bucket.
    pub path: String,
}

/// Storage abstraction trait
///
/// **Key format:** `{user_id}/{document_type}_{timestamp_millis}.{ext}`. See the
/// crate root documentation.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store `data` under `key`.
    ///
    /// With `upsert` an existing object is overwritten; without it an existing
    /// object yields `StorageError::AlreadyExists`.
    async fn store(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
        upsert: bool,
    ) -> StorageResult<StoredObject>;

    /// Publicly retrievable URL for a stored path. Pure: no I/O.
    fn public_url(&self, path: &str) -> String;

    async fn download(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Deleting a missing object is not an error.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Verify the bucket is reachable.
    async fn health_check(&self) -> StorageResult<()>;

    fn bucket(&self) -> &str;

    fn backend_type(&self) -> StorageBackend;
}
