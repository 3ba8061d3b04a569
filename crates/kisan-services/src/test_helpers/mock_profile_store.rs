//! Recording `ProfileStore` backed by the in-memory store.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use kisan_core::models::{FarmerProfile, StoredProfile};
use kisan_core::AppError;
use kisan_db::{InMemoryProfileStore, ProfileStore};
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct MockProfileStore {
    inner: InMemoryProfileStore,
    upserts: Arc<Mutex<Vec<FarmerProfile>>>,
    fail: Arc<AtomicBool>,
}

impl MockProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every profile passed to `upsert`, including failed attempts.
    pub fn upserts(&self) -> Vec<FarmerProfile> {
        self.upserts.lock().unwrap().clone()
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub async fn row_count(&self) -> usize {
        self.inner.len().await
    }
}

#[async_trait]
impl ProfileStore for MockProfileStore {
    async fn upsert(&self, profile: &FarmerProfile) -> Result<StoredProfile, AppError> {
        self.upserts.lock().unwrap().push(profile.clone());
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Internal("mock profile store failure".to_string()));
        }
        self.inner.upsert(profile).await
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<StoredProfile>, AppError> {
        self.inner.find_by_user(user_id).await
    }
}
