//! Kisan Storage Library
//!
//! Upload gateway for registration documents: the `Storage` trait plus a
//! local-filesystem backend and an `object_store` backend (S3 or in-memory).
//!
//! # Storage key format
//!
//! Keys are user-scoped: `{user_id}/{document_type}_{timestamp_millis}.{ext}`.
//! Keys must not contain `..` or a leading `/`. Key generation lives in the
//! `keys` module so every caller produces the same layout.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod object;
pub mod traits;

pub use factory::create_storage;
pub use kisan_core::StorageBackend;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use object::ObjectStoreStorage;
pub use traits::{Storage, StorageError, StorageResult, StoredObject};
