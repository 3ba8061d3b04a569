//! Limits and fixed identifiers shared across the workspace.

/// Largest document accepted for upload (5 MiB).
pub const MAX_DOCUMENT_SIZE_BYTES: u64 = 5 * 1024 * 1024;

pub const ALLOWED_DOCUMENT_CONTENT_TYPES: [&str; 4] =
    ["application/pdf", "image/jpeg", "image/jpg", "image/png"];

/// Bucket holding uploaded registration documents.
pub const DEFAULT_DOCUMENT_BUCKET: &str = "documents";

pub const PHONE_DIGITS: usize = 10;
pub const PINCODE_DIGITS: usize = 6;

/// Prefix applied to 10-digit mobile numbers when requesting an OTP.
pub const OTP_COUNTRY_CODE: &str = "+91";

/// Prefix of quick-registration reference ids (`PMK-2024-AB12CD34`).
pub const REFERENCE_ID_PREFIX: &str = "PMK";

/// Length of an Aadhaar number on the quick registration form.
pub const AADHAAR_DIGITS: usize = 12;
