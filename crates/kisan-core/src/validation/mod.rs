//! Validation modules

pub mod field;
pub mod file;
pub mod submission;

pub use field::{validate_field, validate_required, FieldError};
pub use file::{document_extension, FileValidationError, FileValidator};
pub use submission::{required_sweep, SubmissionErrors};
