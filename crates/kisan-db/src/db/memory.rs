//! In-memory profile store.

use std::collections::HashMap;
use std::sync::Arc;

use kisan_core::models::{FarmerProfile, StoredProfile};
use kisan_core::AppError;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::profile::ProfileStore;

/// Profiles held in a map keyed by user. Same upsert semantics as the
/// PostgreSQL repository.
#[derive(Clone, Default)]
pub struct InMemoryProfileStore {
    profiles: Arc<RwLock<HashMap<Uuid, StoredProfile>>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.profiles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.profiles.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn upsert(&self, profile: &FarmerProfile) -> Result<StoredProfile, AppError> {
        let mut profiles = self.profiles.write().await;

        let stored = match profiles.get(&profile.user_id) {
            Some(existing) => {
                let mut updated = profile.clone();
                updated.created_at = existing.profile.created_at;
                StoredProfile {
                    id: existing.id,
                    profile: updated,
                }
            }
            None => StoredProfile {
                id: Uuid::new_v4(),
                profile: profile.clone(),
            },
        };

        profiles.insert(profile.user_id, stored.clone());
        Ok(stored)
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<StoredProfile>, AppError> {
        Ok(self.profiles.read().await.get(&user_id).cloned())
    }
}
