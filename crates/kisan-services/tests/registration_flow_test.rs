mod helpers;

use helpers::setup_test_app;
use kisan_core::models::{DocumentType, FormField, FormFlag, ProfileStatus};
use kisan_core::validation::FileValidationError;
use kisan_db::ProfileStore;
use kisan_services::test_helpers::*;
use kisan_services::{SubmitError, UploadError, UploadFile};
use kisan_storage::Storage;

#[tokio::test]
async fn test_oversized_document_rejected_without_record() {
    let app = setup_test_app().await;
    let controller = app.controller();

    let file = UploadFile::new("aadhaar.pdf", "application/pdf", vec![7u8; 6 * 1024 * 1024]);
    let result = controller.upload_document(DocumentType::Aadhaar, file).await;

    assert!(matches!(
        result,
        Err(UploadError::Validation(FileValidationError::FileTooLarge { .. }))
    ));
    assert!(controller.documents().await.is_empty());
}

#[tokio::test]
async fn test_document_lands_in_bucket_under_user_prefix() {
    let app = setup_test_app().await;
    let controller = app.controller();

    let record = controller
        .upload_document(DocumentType::EightA, pdf_file("8a.pdf"))
        .await
        .unwrap();

    assert!(record
        .file_path
        .starts_with(&format!("{}/eight_a_", test_user_id())));
    assert_eq!(
        record.public_url,
        format!("http://localhost:3000/storage/documents/{}", record.file_path)
    );
    assert_eq!(app.storage.download(&record.file_path).await.unwrap(), PDF_BYTES);
}

#[tokio::test]
async fn test_photo_reupload_keeps_latest() {
    let app = setup_test_app().await;
    let controller = app.controller();

    controller
        .upload_document(DocumentType::Photo, jpeg_file("old.jpg"))
        .await
        .unwrap();
    let latest = controller
        .upload_document(
            DocumentType::Photo,
            UploadFile::new("new.png", "image/png", &b"\x89PNG\r\n\x1a\n"[..]),
        )
        .await
        .unwrap();

    let documents = controller.documents().await;
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[&DocumentType::Photo], latest);
    assert!(latest.file_path.ends_with(".png"));
}

#[tokio::test]
async fn test_full_registration_and_resubmission() {
    let app = setup_test_app().await;
    let mut controller = app.controller();

    for (field, value) in required_field_values() {
        controller.set_field(field, value);
    }
    controller.set_field(FormField::State, "Maharashtra");
    controller.set_flag(FormFlag::BelongsToFpo, true);
    controller.set_field(FormField::FpoName, "Sahyadri Farms");
    upload_required_documents(&app.tracker).await;

    let first = controller.submit().await.unwrap();
    assert_eq!(first.status, ProfileStatus::PendingVerification);

    let stored = app.store.find_by_user(test_user_id()).await.unwrap().unwrap();
    assert_eq!(stored.id, first.profile_id);
    assert_eq!(stored.profile.full_name, "Ramesh Patil");
    assert_eq!(stored.profile.details.fpo_name, "Sahyadri Farms");
    assert_eq!(stored.profile.documents.len(), 6);

    controller.set_field(FormField::BankName, "Bank of Maharashtra");
    controller.set_flag(FormFlag::BelongsToFpo, false);
    let second = controller.submit().await.unwrap();

    assert_eq!(second.profile_id, first.profile_id);
    assert_eq!(app.store.row_count().await, 1);
    assert_eq!(app.store.upserts().len(), 2);

    let stored = app.store.find_by_user(test_user_id()).await.unwrap().unwrap();
    assert_eq!(stored.profile.details.bank_name, "Bank of Maharashtra");
    assert!(stored.profile.details.fpo_name.is_empty());
    assert_eq!(stored.profile.created_at, app.store.upserts()[0].created_at);
}

#[tokio::test]
async fn test_incomplete_submission_lists_everything_missing() {
    let app = setup_test_app().await;
    let controller = app.controller();

    let err = controller.submit().await.unwrap_err();
    let SubmitError::Incomplete(errors) = err else {
        panic!("expected incomplete submission");
    };

    assert_eq!(errors.missing_documents.len(), 6);
    // first and last name come from the identity profile
    assert_eq!(errors.missing_fields.len(), 11);
    assert!(!errors.missing_fields.contains(&FormField::FirstName));
    assert!(app.store.upserts().is_empty());
}

#[tokio::test]
async fn test_discard_drops_records() {
    let app = setup_test_app().await;
    let controller = app.controller();

    controller
        .upload_document(DocumentType::Passbook, pdf_file("passbook.pdf"))
        .await
        .unwrap();
    controller.discard().await;

    assert!(app.tracker.records().await.is_empty());
    assert_eq!(app.config.storage_bucket, "documents");
}
