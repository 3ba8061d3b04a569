//! In-memory `Storage` with call recording, failure injection and upload
//! gating for ordering tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use kisan_storage::{Storage, StorageBackend, StorageError, StorageResult, StoredObject};
use tokio::sync::oneshot;

#[derive(Clone, Default)]
pub struct MockStorage {
    objects: Arc<Mutex<HashMap<String, Bytes>>>,
    store_calls: Arc<AtomicUsize>,
    last_upsert: Arc<Mutex<Option<bool>>>,
    fail_uploads: Arc<AtomicBool>,
    unreachable: Arc<AtomicBool>,
    holds: Arc<Mutex<HashMap<Bytes, oneshot::Receiver<()>>>>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `store` calls made so far, counted when the call starts.
    pub fn store_calls(&self) -> usize {
        self.store_calls.load(Ordering::SeqCst)
    }

    pub fn last_upsert(&self) -> Option<bool> {
        *self.last_upsert.lock().unwrap()
    }

    pub fn set_fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    pub fn object(&self, key: &str) -> Option<Bytes> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    /// Park the next `store` whose payload equals `payload` until the
    /// returned sender fires.
    pub fn hold(&self, payload: &'static [u8]) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.holds
            .lock()
            .unwrap()
            .insert(Bytes::from_static(payload), rx);
        tx
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn store(
        &self,
        key: &str,
        data: Bytes,
        _content_type: &str,
        upsert: bool,
    ) -> StorageResult<StoredObject> {
        self.store_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_upsert.lock().unwrap() = Some(upsert);

        let hold = self.holds.lock().unwrap().remove(&data);
        if let Some(rx) = hold {
            let _ = rx.await;
        }

        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed("mock upload failure".to_string()));
        }

        let mut objects = self.objects.lock().unwrap();
        if !upsert && objects.contains_key(key) {
            return Err(StorageError::AlreadyExists(key.to_string()));
        }
        objects.insert(key.to_string(), data);

        Ok(StoredObject {
            path: key.to_string(),
        })
    }

    fn public_url(&self, path: &str) -> String {
        format!("https://storage.test/documents/{}", path)
    }

    async fn download(&self, key: &str) -> StorageResult<Vec<u8>> {
        self.object(key)
            .map(|b| b.to_vec())
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        Ok(self.objects.lock().unwrap().contains_key(key))
    }

    async fn health_check(&self) -> StorageResult<()> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(StorageError::BackendError("mock bucket unreachable".to_string()));
        }
        Ok(())
    }

    fn bucket(&self) -> &str {
        "documents"
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}
