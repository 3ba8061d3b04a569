//! Shared fixtures for workflow tests.

use bytes::Bytes;
use kisan_core::models::{DocumentType, FormField, RegistrationDraft, UserContext};
use uuid::Uuid;

use crate::tracker::{DocumentTracker, UploadFile};

pub const PDF_BYTES: &[u8] = b"%PDF-1.4\n%test document\n";
pub const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

pub fn test_user_id() -> Uuid {
    Uuid::from_u128(0x6f1c_1c2e_0000_4000_8000_0000_0000_0001)
}

pub fn test_user() -> UserContext {
    UserContext {
        user_id: test_user_id(),
        display_name: Some("Ramesh Kumar Patil".to_string()),
        email: Some("ramesh@example.com".to_string()),
        phone: Some("9876543210".to_string()),
    }
}

pub fn pdf_file(file_name: &str) -> UploadFile {
    UploadFile::new(file_name, "application/pdf", Bytes::from_static(PDF_BYTES))
}

pub fn jpeg_file(file_name: &str) -> UploadFile {
    UploadFile::new(file_name, "image/jpeg", Bytes::from_static(JPEG_BYTES))
}

/// Values for every required field, all well-formed.
pub fn required_field_values() -> Vec<(FormField, &'static str)> {
    vec![
        (FormField::FirstName, "Ramesh"),
        (FormField::LastName, "Patil"),
        (FormField::FatherName, "Suresh Patil"),
        (FormField::DateOfBirth, "1980-04-12"),
        (FormField::Gender, "Male"),
        (FormField::Address, "At Post Wagholi, Pune"),
        (FormField::Pincode, "412207"),
        (FormField::TotalLandArea, "3.5"),
        (FormField::PrimaryCrop, "Sugarcane"),
        (FormField::BankName, "State Bank of India"),
        (FormField::BranchName, "Wagholi"),
        (FormField::AccountNumber, "30012345678"),
        (FormField::IfscCode, "SBIN0001234"),
    ]
}

pub fn complete_draft() -> RegistrationDraft {
    let mut draft = RegistrationDraft::default();
    for (field, value) in required_field_values() {
        draft.set(field, value);
    }
    draft
}

/// Upload a small valid file for every required document type.
pub async fn upload_required_documents(tracker: &DocumentTracker) {
    for document_type in DocumentType::required() {
        let file = if document_type == DocumentType::Photo {
            jpeg_file("photo.jpg")
        } else {
            pdf_file(&format!("{}.pdf", document_type.as_str()))
        };
        tracker
            .upload(document_type, file)
            .await
            .expect("fixture upload should succeed");
    }
}
