#[cfg(feature = "storage-local")]
use crate::LocalStorage;
use crate::{ObjectStoreStorage, Storage, StorageBackend, StorageError, StorageResult};
use kisan_core::Config;
use std::sync::Arc;

/// Create the document storage backend selected by configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    let bucket = config.storage_bucket.clone();

    match config.storage_backend {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let storage = ObjectStoreStorage::s3(
                &bucket,
                config.s3_region.as_deref(),
                config.s3_endpoint.as_deref(),
                config.public_url_base.as_deref(),
            )?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = config.local_storage_path.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
            })?;
            let base_url = config.local_storage_base_url.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_BASE_URL not configured".to_string())
            })?;

            let storage = LocalStorage::new(base_path, base_url, bucket).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),

        StorageBackend::Memory => {
            let public_base = match &config.public_url_base {
                Some(base) => format!("{}/{}", base.trim_end_matches('/'), bucket),
                None => format!("memory://{}", bucket),
            };
            Ok(Arc::new(ObjectStoreStorage::in_memory(bucket, public_base)))
        }
    }
}
