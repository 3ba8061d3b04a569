//! Test helpers for registration flow integration tests
//!
//! Wires the workflow against the in-memory `object_store` bucket and a
//! recording profile store.

use std::sync::Arc;

use kisan_core::Config;
use kisan_services::test_helpers::{test_user, MockProfileStore};
use kisan_services::{DocumentTracker, RegistrationController};
use kisan_storage::{create_storage, Storage};

pub struct TestApp {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub store: MockProfileStore,
    pub tracker: Arc<DocumentTracker>,
}

impl TestApp {
    pub fn controller(&self) -> RegistrationController {
        RegistrationController::new(
            test_user(),
            Arc::clone(&self.tracker),
            Arc::new(self.store.clone()),
        )
        .expect("tracker belongs to the test user")
    }
}

pub async fn setup_test_app() -> TestApp {
    let config = Config::development();
    let storage = create_storage(&config)
        .await
        .expect("Failed to create in-memory storage");
    let tracker = Arc::new(DocumentTracker::new(
        test_user().user_id,
        Arc::clone(&storage),
        config.file_validator(),
    ));

    TestApp {
        config,
        storage,
        store: MockProfileStore::new(),
        tracker,
    }
}
