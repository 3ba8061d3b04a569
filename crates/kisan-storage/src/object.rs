//! `object_store`-backed storage: S3 and S3-compatible buckets, plus an
//! in-memory store for development and tests.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::{
    Attribute, Attributes, GetOptions, ObjectStore, ObjectStoreExt, PutMode, PutOptions,
};

use crate::keys::validate_key;
use crate::traits::{Storage, StorageError, StorageResult, StoredObject};
use crate::StorageBackend;

#[derive(Clone)]
pub struct ObjectStoreStorage {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    public_base: String,
    backend: StorageBackend,
}

impl ObjectStoreStorage {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        bucket: String,
        public_base: String,
        backend: StorageBackend,
    ) -> Self {
        Self {
            store,
            bucket,
            public_base,
            backend,
        }
    }

    /// Process-local bucket. Contents are lost on drop.
    pub fn in_memory(bucket: impl Into<String>, public_base: impl Into<String>) -> Self {
        Self::new(
            Arc::new(InMemory::new()),
            bucket.into(),
            public_base.into(),
            StorageBackend::Memory,
        )
    }

    /// S3 bucket configured from the standard `AWS_*` environment variables.
    ///
    /// `endpoint` targets S3-compatible providers. When `public_base` is
    /// absent, URLs are derived from the endpoint or the AWS virtual-host form.
    pub fn s3(
        bucket: &str,
        region: Option<&str>,
        endpoint: Option<&str>,
        public_base: Option<&str>,
    ) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);
        if let Some(region) = region {
            builder = builder.with_region(region);
        }
        if let Some(endpoint) = endpoint {
            builder = builder
                .with_endpoint(endpoint)
                .with_allow_http(endpoint.starts_with("http://"));
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(format!("Failed to build S3 client: {}", e)))?;

        let public_base = match (public_base, endpoint) {
            (Some(base), _) => base.to_string(),
            (None, Some(endpoint)) => format!("{}/{}", endpoint.trim_end_matches('/'), bucket),
            (None, None) => format!("https://{}.s3.amazonaws.com", bucket),
        };

        Ok(Self::new(
            Arc::new(store),
            bucket.to_string(),
            public_base,
            StorageBackend::S3,
        ))
    }

    fn location(key: &str) -> StorageResult<Path> {
        validate_key(key)?;
        Ok(Path::from(key.to_string()))
    }
}

#[async_trait]
impl Storage for ObjectStoreStorage {
    #[tracing::instrument(skip(self, data), fields(
        storage.bucket = %self.bucket,
        storage.key = %key,
        storage.operation = "PutObject"
    ))]
    async fn store(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
        upsert: bool,
    ) -> StorageResult<StoredObject> {
        let location = Self::location(key)?;
        let size = data.len() as u64;
        let start = std::time::Instant::now();

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        let opts = PutOptions {
            mode: if upsert {
                PutMode::Overwrite
            } else {
                PutMode::Create
            },
            attributes,
            ..Default::default()
        };

        let result = self.store.put_opts(&location, data.into(), opts).await;
        let duration = start.elapsed().as_secs_f64();

        match result {
            Ok(_) => {
                tracing::info!(
                    size_bytes = size,
                    duration_ms = duration * 1000.0,
                    "Object upload successful"
                );
                Ok(StoredObject {
                    path: key.to_string(),
                })
            }
            Err(object_store::Error::AlreadyExists { .. }) => {
                Err(StorageError::AlreadyExists(key.to_string()))
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    size_bytes = size,
                    duration_ms = duration * 1000.0,
                    "Object upload failed"
                );
                Err(StorageError::UploadFailed(e.to_string()))
            }
        }
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.public_base.trim_end_matches('/'), path)
    }

    async fn download(&self, key: &str) -> StorageResult<Vec<u8>> {
        let location = Self::location(key)?;
        match self.store.get(&location).await {
            Ok(response) => {
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| StorageError::DownloadFailed(e.to_string()))?;
                Ok(bytes.to_vec())
            }
            Err(object_store::Error::NotFound { .. }) => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(StorageError::DownloadFailed(e.to_string())),
        }
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let location = Self::location(key)?;
        match self.store.delete(&location).await {
            Ok(()) | Err(object_store::Error::NotFound { .. }) => {
                tracing::info!(key = %key, "Object delete successful");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, key = %key, "Object delete failed");
                Err(StorageError::DeleteFailed(e.to_string()))
            }
        }
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let location = Self::location(key)?;
        let opts = GetOptions {
            head: true,
            ..Default::default()
        };
        match self.store.get_opts(&location, opts).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::BackendError(e.to_string())),
        }
    }

    async fn health_check(&self) -> StorageResult<()> {
        self.store
            .list_with_delimiter(None)
            .await
            .map(|_| ())
            .map_err(|e| {
                StorageError::BackendError(format!(
                    "Bucket {} unreachable: {}",
                    self.bucket, e
                ))
            })
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn backend_type(&self) -> StorageBackend {
        self.backend
    }
}
