//! Test helpers for service unit and integration tests
//!
//! Mock implementations of `Storage`, `ProfileStore` and `IdentityGate` plus
//! fixtures, so the workflow can be exercised without a bucket, a database or
//! an identity provider.

pub mod fixtures;
pub mod mock_identity;
pub mod mock_profile_store;
pub mod mock_storage;

pub use fixtures::*;
pub use mock_identity::MockIdentityGate;
pub use mock_profile_store::MockProfileStore;
pub use mock_storage::MockStorage;
