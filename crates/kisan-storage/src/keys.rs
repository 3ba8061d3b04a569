//! Shared key generation for storage backends.
//!
//! Key format: `{user_id}/{document_type}_{timestamp_millis}.{ext}`.

use kisan_core::models::DocumentType;
use uuid::Uuid;

use crate::{StorageError, StorageResult};

/// Key for an uploaded registration document.
pub fn document_key(
    user_id: Uuid,
    document_type: DocumentType,
    timestamp_millis: i64,
    extension: &str,
) -> String {
    format!(
        "{}/{}_{}.{}",
        user_id,
        document_type.as_str(),
        timestamp_millis,
        extension
    )
}

/// Key for the throwaway object written by the storage self-check.
pub fn probe_key(user_id: Uuid, timestamp_millis: i64) -> String {
    format!("{}/test_{}.txt", user_id, timestamp_millis)
}

/// Reject keys that could escape the bucket prefix.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    if key.contains("..") || key.starts_with('/') || key.contains('\\') {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}
