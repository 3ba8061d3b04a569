//! Registration form controller
//!
//! Owns the draft for one signed-in user, delegates document uploads to the
//! tracker and turns a complete draft into a single profile upsert.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kisan_core::models::{
    DocumentMap, DocumentRecord, DocumentType, FarmerProfile, FormField, FormFlag,
    ProfileStatus, RegistrationDraft, UserContext,
};
use kisan_core::validation::{required_sweep, SubmissionErrors};
use kisan_core::AppError;
use kisan_db::ProfileStore;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::tracker::{DocumentTracker, UploadError, UploadFile};

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("{0}")]
    Incomplete(SubmissionErrors),

    #[error("Error submitting application: {0}")]
    Store(AppError),
}

impl From<SubmitError> for AppError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Incomplete(errors) => errors.into(),
            SubmitError::Store(e) => e,
        }
    }
}

/// Acknowledgement of a stored submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionReceipt {
    /// Id assigned by the profile store.
    pub profile_id: Uuid,
    pub user_id: Uuid,
    pub status: ProfileStatus,
    pub submitted_at: DateTime<Utc>,
}

pub struct RegistrationController {
    user: UserContext,
    draft: RegistrationDraft,
    tracker: Arc<DocumentTracker>,
    store: Arc<dyn ProfileStore>,
}

impl RegistrationController {
    /// Start a registration for `user`, pre-filling name, phone and email.
    ///
    /// `tracker` must have been created for the same user.
    pub fn new(
        user: UserContext,
        tracker: Arc<DocumentTracker>,
        store: Arc<dyn ProfileStore>,
    ) -> Result<Self, AppError> {
        if tracker.user_id() != user.user_id {
            return Err(AppError::InvalidInput(format!(
                "Document tracker belongs to user {}, not {}",
                tracker.user_id(),
                user.user_id
            )));
        }

        Ok(Self {
            draft: RegistrationDraft::for_user(&user),
            user,
            tracker,
            store,
        })
    }

    pub fn user(&self) -> &UserContext {
        &self.user
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        self.draft.set(field, value);
    }

    pub fn field(&self, field: FormField) -> &str {
        self.draft.get(field)
    }

    pub fn set_flag(&mut self, flag: FormFlag, value: bool) {
        self.draft.set_flag(flag, value);
    }

    pub fn flag(&self, flag: FormFlag) -> bool {
        self.draft.flag(flag)
    }

    pub fn draft(&self) -> &RegistrationDraft {
        &self.draft
    }

    pub async fn upload_document(
        &self,
        document_type: DocumentType,
        file: UploadFile,
    ) -> Result<DocumentRecord, UploadError> {
        self.tracker.upload(document_type, file).await
    }

    pub async fn documents(&self) -> DocumentMap {
        self.tracker.records().await
    }

    /// Abandon the registration. Uploaded objects stay in the bucket; only
    /// the local records are dropped.
    pub async fn discard(self) {
        self.tracker.clear().await;
        tracing::info!(user_id = %self.user.user_id, "Registration discarded");
    }

    /// Validate the whole draft and upsert it as the user's profile.
    ///
    /// Nothing is written unless every required field and document is
    /// present. On any failure the draft is left as it was.
    #[tracing::instrument(skip(self), fields(user_id = %self.user.user_id))]
    pub async fn submit(&self) -> Result<SubmissionReceipt, SubmitError> {
        let documents = self.tracker.records().await;

        if let Err(errors) = required_sweep(&self.draft, &documents) {
            tracing::debug!(
                missing_documents = errors.missing_documents.len(),
                missing_fields = errors.missing_fields.len(),
                invalid_fields = errors.invalid_fields.len(),
                "Submission incomplete"
            );
            return Err(SubmitError::Incomplete(errors));
        }

        let now = Utc::now();
        let profile = FarmerProfile::from_draft(self.user.user_id, &self.draft, documents, now);

        let stored = self.store.upsert(&profile).await.map_err(|e| {
            tracing::error!(error = %e, "Profile upsert failed");
            SubmitError::Store(e)
        })?;

        tracing::info!(profile_id = %stored.id, "Registration submitted");

        Ok(SubmissionReceipt {
            profile_id: stored.id,
            user_id: stored.profile.user_id,
            status: stored.profile.status,
            submitted_at: now,
        })
    }
}
