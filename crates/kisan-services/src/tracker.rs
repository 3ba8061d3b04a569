//! Per-document-type upload tracking
//!
//! Each document type has its own slot holding the latest upload state, the
//! current record and a generation counter. Every accepted selection bumps
//! the generation; a storage result is applied only if its generation is
//! still the latest for that type, so the newest selection wins no matter
//! which request resolves last.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use kisan_core::models::{missing_required_documents, DocumentMap, DocumentRecord, DocumentType};
use kisan_core::validation::{document_extension, FileValidationError, FileValidator};
use kisan_core::AppError;
use kisan_storage::keys::document_key;
use kisan_storage::{Storage, StorageError};
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

/// A file selected by the user for one document slot.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl UploadFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UploadState {
    #[default]
    Idle,
    Uploading {
        generation: u64,
    },
    Uploaded,
    Failed {
        reason: String,
    },
}

impl UploadState {
    pub fn is_uploading(&self) -> bool {
        matches!(self, UploadState::Uploading { .. })
    }
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("{0}")]
    Validation(#[from] FileValidationError),

    #[error("Error uploading file: {0}")]
    Storage(#[from] StorageError),

    #[error("Upload of {document_type} was replaced by a newer selection")]
    Superseded { document_type: DocumentType },
}

impl UploadError {
    /// Message suitable for showing next to the file input.
    pub fn user_message(&self) -> String {
        match self {
            UploadError::Validation(e) => e.user_message(),
            UploadError::Storage(e) => format!("Error uploading file: {}", e),
            UploadError::Superseded { .. } => self.to_string(),
        }
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Validation(e) => e.into(),
            UploadError::Storage(e) => e.into(),
            UploadError::Superseded { .. } => AppError::InvalidInput(err.to_string()),
        }
    }
}

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    last_timestamp: i64,
    state: UploadState,
    record: Option<DocumentRecord>,
}

/// Upload state machine and record keeper for one user's documents.
pub struct DocumentTracker {
    user_id: Uuid,
    storage: Arc<dyn Storage>,
    validator: FileValidator,
    slots: Mutex<HashMap<DocumentType, Slot>>,
}

impl DocumentTracker {
    pub fn new(user_id: Uuid, storage: Arc<dyn Storage>, validator: FileValidator) -> Self {
        Self {
            user_id,
            storage,
            validator,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// Validate, store and record `file` as the document for `document_type`.
    ///
    /// Invalid files are rejected before storage is contacted and leave the
    /// slot untouched. A storage failure leaves any previous record in place.
    #[tracing::instrument(skip_all, fields(
        user_id = %self.user_id,
        document_type = %document_type,
        size_bytes = file.size()
    ))]
    pub async fn upload(
        &self,
        document_type: DocumentType,
        file: UploadFile,
    ) -> Result<DocumentRecord, UploadError> {
        if let Err(e) = self.validator.validate_all(&file.content_type, file.size()) {
            tracing::debug!(error = %e, "Document rejected before upload");
            return Err(e.into());
        }

        let extension = document_extension(&file.file_name, &file.content_type);
        let (generation, key) = {
            let mut slots = self.slots.lock().await;
            let slot = slots.entry(document_type).or_default();
            slot.generation += 1;
            slot.state = UploadState::Uploading {
                generation: slot.generation,
            };
            // strictly increasing per slot so no two selections share a key
            let timestamp = Utc::now().timestamp_millis().max(slot.last_timestamp + 1);
            slot.last_timestamp = timestamp;
            (
                slot.generation,
                document_key(self.user_id, document_type, timestamp, &extension),
            )
        };

        let size = file.size();
        let start = std::time::Instant::now();

        let result = self
            .storage
            .store(&key, file.data, &file.content_type, true)
            .await;

        let mut slots = self.slots.lock().await;
        let slot = slots.entry(document_type).or_default();
        let is_latest = slot.generation == generation;

        match result {
            Ok(stored) => {
                if !is_latest {
                    tracing::info!(
                        key = %key,
                        generation,
                        latest_generation = slot.generation,
                        "Discarding upload replaced by a newer selection"
                    );
                    return Err(UploadError::Superseded { document_type });
                }

                let record = DocumentRecord {
                    public_url: self.storage.public_url(&stored.path),
                    file_path: stored.path,
                    file_name: file.file_name,
                    uploaded_at: Utc::now(),
                    file_size: size,
                    file_type: file.content_type,
                };
                slot.record = Some(record.clone());
                slot.state = UploadState::Uploaded;

                tracing::info!(
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Document uploaded"
                );
                Ok(record)
            }
            Err(e) if !is_latest => {
                tracing::debug!(
                    error = %e,
                    key = %key,
                    generation,
                    latest_generation = slot.generation,
                    "Ignoring failure of upload replaced by a newer selection"
                );
                Err(UploadError::Superseded { document_type })
            }
            Err(e) => {
                tracing::error!(error = %e, key = %key, "Document upload failed");
                slot.state = UploadState::Failed {
                    reason: e.to_string(),
                };
                Err(e.into())
            }
        }
    }

    pub async fn state(&self, document_type: DocumentType) -> UploadState {
        self.slots
            .lock()
            .await
            .get(&document_type)
            .map(|slot| slot.state.clone())
            .unwrap_or_default()
    }

    pub async fn record(&self, document_type: DocumentType) -> Option<DocumentRecord> {
        self.slots
            .lock()
            .await
            .get(&document_type)
            .and_then(|slot| slot.record.clone())
    }

    /// Snapshot of every uploaded document.
    pub async fn records(&self) -> DocumentMap {
        self.slots
            .lock()
            .await
            .iter()
            .filter_map(|(t, slot)| slot.record.clone().map(|r| (*t, r)))
            .collect()
    }

    pub async fn missing_required(&self) -> Vec<DocumentType> {
        missing_required_documents(&self.records().await)
    }

    /// Forget every record and state. Uploads still in flight are discarded
    /// when they resolve.
    pub async fn clear(&self) {
        let mut slots = self.slots.lock().await;
        for slot in slots.values_mut() {
            slot.generation += 1;
            slot.state = UploadState::Idle;
            slot.record = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    fn tracker(storage: &MockStorage) -> DocumentTracker {
        DocumentTracker::new(
            test_user_id(),
            Arc::new(storage.clone()),
            FileValidator::default(),
        )
    }

    #[tokio::test]
    async fn test_oversized_file_never_reaches_storage() {
        let storage = MockStorage::new();
        let tracker = tracker(&storage);

        let file = UploadFile::new(
            "passbook.pdf",
            "application/pdf",
            vec![0u8; 5 * 1024 * 1024 + 1],
        );
        let result = tracker.upload(DocumentType::Passbook, file).await;

        assert!(matches!(
            result,
            Err(UploadError::Validation(FileValidationError::FileTooLarge { .. }))
        ));
        assert_eq!(storage.store_calls(), 0);
        assert_eq!(tracker.state(DocumentType::Passbook).await, UploadState::Idle);
        assert!(tracker.record(DocumentType::Passbook).await.is_none());
    }

    #[tokio::test]
    async fn test_file_at_size_limit_is_accepted() {
        let storage = MockStorage::new();
        let tracker = tracker(&storage);

        let file = UploadFile::new("passbook.pdf", "application/pdf", vec![0u8; 5_242_880]);
        assert!(tracker.upload(DocumentType::Passbook, file).await.is_ok());
    }

    #[tokio::test]
    async fn test_disallowed_type_never_reaches_storage() {
        let storage = MockStorage::new();
        let tracker = tracker(&storage);

        let result = tracker
            .upload(DocumentType::Photo, UploadFile::new("photo.gif", "image/gif", &b"GIF89a"[..]))
            .await;

        assert!(matches!(
            result,
            Err(UploadError::Validation(FileValidationError::InvalidContentType { .. }))
        ));
        assert_eq!(storage.store_calls(), 0);
    }

    #[tokio::test]
    async fn test_successful_upload_builds_record() {
        let storage = MockStorage::new();
        let tracker = tracker(&storage);

        let record = tracker
            .upload(DocumentType::SevenTwelve, pdf_file("Extract.PDF"))
            .await
            .unwrap();

        let prefix = format!("{}/seven_twelve_", test_user_id());
        assert!(record.file_path.starts_with(&prefix));
        assert!(record.file_path.ends_with(".pdf"));
        assert_eq!(record.public_url, storage.public_url(&record.file_path));
        assert_eq!(record.file_name, "Extract.PDF");
        assert_eq!(record.file_type, "application/pdf");
        assert_eq!(record.file_size, PDF_BYTES.len() as u64);

        assert_eq!(
            tracker.state(DocumentType::SevenTwelve).await,
            UploadState::Uploaded
        );
        assert_eq!(storage.last_upsert(), Some(true));
    }

    #[tokio::test]
    async fn test_reupload_replaces_record() {
        let storage = MockStorage::new();
        let tracker = tracker(&storage);

        tracker
            .upload(DocumentType::Photo, jpeg_file("first.jpg"))
            .await
            .unwrap();
        let second = tracker
            .upload(DocumentType::Photo, jpeg_file("second.jpg"))
            .await
            .unwrap();

        let records = tracker.records().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records.get(&DocumentType::Photo), Some(&second));
    }

    #[tokio::test]
    async fn test_storage_failure_keeps_previous_record() {
        let storage = MockStorage::new();
        let tracker = tracker(&storage);

        let first = tracker
            .upload(DocumentType::Pan, pdf_file("pan.pdf"))
            .await
            .unwrap();

        storage.set_fail_uploads(true);
        let result = tracker.upload(DocumentType::Pan, pdf_file("pan-new.pdf")).await;

        assert!(matches!(result, Err(UploadError::Storage(_))));
        assert_eq!(tracker.record(DocumentType::Pan).await, Some(first));
        assert!(matches!(
            tracker.state(DocumentType::Pan).await,
            UploadState::Failed { .. }
        ));
    }

    #[tokio::test]
    async fn test_stale_completion_is_discarded() {
        let storage = MockStorage::new();
        let tracker = Arc::new(tracker(&storage));

        let release_first = storage.hold(b"first-photo");
        let pending = {
            let tracker = Arc::clone(&tracker);
            tokio::spawn(async move {
                tracker
                    .upload(
                        DocumentType::Photo,
                        UploadFile::new("first.jpg", "image/jpeg", &b"first-photo"[..]),
                    )
                    .await
            })
        };
        while storage.store_calls() < 1 {
            tokio::task::yield_now().await;
        }
        assert!(tracker.state(DocumentType::Photo).await.is_uploading());

        let second = tracker
            .upload(
                DocumentType::Photo,
                UploadFile::new("second.jpg", "image/jpeg", &b"second-photo"[..]),
            )
            .await
            .unwrap();

        release_first.send(()).unwrap();
        let first = pending.await.unwrap();

        assert!(matches!(
            first,
            Err(UploadError::Superseded {
                document_type: DocumentType::Photo
            })
        ));
        assert_eq!(tracker.record(DocumentType::Photo).await, Some(second));
        assert_eq!(tracker.state(DocumentType::Photo).await, UploadState::Uploaded);
    }

    fn spawn_upload(
        tracker: &Arc<DocumentTracker>,
        document_type: DocumentType,
        file: UploadFile,
    ) -> tokio::task::JoinHandle<Result<DocumentRecord, UploadError>> {
        let tracker = Arc::clone(tracker);
        tokio::spawn(async move { tracker.upload(document_type, file).await })
    }

    async fn wait_for_store_calls(storage: &MockStorage, calls: usize) {
        while storage.store_calls() < calls {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_back_to_back_uploads_get_distinct_keys() {
        let storage = MockStorage::new();
        let tracker = tracker(&storage);

        let first = tracker
            .upload(DocumentType::Photo, jpeg_file("a.jpg"))
            .await
            .unwrap();
        let second = tracker
            .upload(DocumentType::Photo, jpeg_file("b.jpg"))
            .await
            .unwrap();

        assert_ne!(first.file_path, second.file_path);
        assert_eq!(storage.object_count(), 2);
    }

    #[tokio::test]
    async fn test_stale_completion_does_not_overwrite_newer_object() {
        let storage = MockStorage::new();
        let tracker = Arc::new(tracker(&storage));

        let release_first = storage.hold(b"first-photo");
        let pending = spawn_upload(
            &tracker,
            DocumentType::Photo,
            UploadFile::new("first.jpg", "image/jpeg", &b"first-photo"[..]),
        );
        wait_for_store_calls(&storage, 1).await;

        let second = tracker
            .upload(
                DocumentType::Photo,
                UploadFile::new("second.jpg", "image/jpeg", &b"second-photo"[..]),
            )
            .await
            .unwrap();

        release_first.send(()).unwrap();
        assert!(matches!(
            pending.await.unwrap(),
            Err(UploadError::Superseded { .. })
        ));

        let record = tracker.record(DocumentType::Photo).await.unwrap();
        assert_eq!(record, second);
        assert_eq!(
            storage.object(&record.file_path).as_deref(),
            Some(&b"second-photo"[..])
        );
    }

    #[tokio::test]
    async fn test_stale_failure_reports_superseded() {
        let storage = MockStorage::new();
        let tracker = Arc::new(tracker(&storage));

        let release_first = storage.hold(b"first-photo");
        let pending = spawn_upload(
            &tracker,
            DocumentType::Photo,
            UploadFile::new("first.jpg", "image/jpeg", &b"first-photo"[..]),
        );
        wait_for_store_calls(&storage, 1).await;

        let second = tracker
            .upload(
                DocumentType::Photo,
                UploadFile::new("second.jpg", "image/jpeg", &b"second-photo"[..]),
            )
            .await
            .unwrap();

        storage.set_fail_uploads(true);
        release_first.send(()).unwrap();

        assert!(matches!(
            pending.await.unwrap(),
            Err(UploadError::Superseded {
                document_type: DocumentType::Photo
            })
        ));
        assert_eq!(tracker.record(DocumentType::Photo).await, Some(second));
        assert_eq!(tracker.state(DocumentType::Photo).await, UploadState::Uploaded);
    }

    #[tokio::test]
    async fn test_clear_discards_in_flight_upload() {
        let storage = MockStorage::new();
        let tracker = Arc::new(tracker(&storage));

        let release = storage.hold(b"pan-scan");
        let pending = spawn_upload(
            &tracker,
            DocumentType::Pan,
            UploadFile::new("pan.pdf", "application/pdf", &b"pan-scan"[..]),
        );
        wait_for_store_calls(&storage, 1).await;

        tracker.clear().await;
        release.send(()).unwrap();

        assert!(matches!(
            pending.await.unwrap(),
            Err(UploadError::Superseded {
                document_type: DocumentType::Pan
            })
        ));
        assert!(tracker.record(DocumentType::Pan).await.is_none());
        assert!(tracker.records().await.is_empty());
        assert_eq!(tracker.state(DocumentType::Pan).await, UploadState::Idle);
    }

    #[tokio::test]
    async fn test_missing_required_and_clear() {
        let storage = MockStorage::new();
        let tracker = tracker(&storage);

        assert_eq!(tracker.missing_required().await.len(), 6);

        tracker
            .upload(DocumentType::Aadhaar, pdf_file("aadhaar.pdf"))
            .await
            .unwrap();
        tracker
            .upload(DocumentType::LandRecords, pdf_file("land.pdf"))
            .await
            .unwrap();

        let missing = tracker.missing_required().await;
        assert_eq!(missing.len(), 5);
        assert!(!missing.contains(&DocumentType::Aadhaar));

        tracker.clear().await;
        assert!(tracker.records().await.is_empty());
        assert_eq!(tracker.state(DocumentType::Aadhaar).await, UploadState::Idle);
    }
}
