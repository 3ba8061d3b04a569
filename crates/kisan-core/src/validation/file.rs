use std::path::Path;

use crate::constants::{ALLOWED_DOCUMENT_CONTENT_TYPES, MAX_DOCUMENT_SIZE_BYTES};

/// Rejections raised before a document is handed to storage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FileValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Invalid content type: {content_type} (allowed: {allowed:?})")]
    InvalidContentType {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("Empty file")]
    EmptyFile,
}

impl FileValidationError {
    /// Message suitable for showing next to the file input.
    pub fn user_message(&self) -> String {
        match self {
            FileValidationError::FileTooLarge { max, .. } => {
                format!("File size must be less than {}MB", max / (1024 * 1024))
            }
            FileValidationError::InvalidContentType { .. } => {
                "Please upload only PDF, JPG, JPEG, or PNG files".to_string()
            }
            FileValidationError::EmptyFile => "The selected file is empty".to_string(),
        }
    }
}

/// Document file validator
///
/// Checks declared MIME type and size; the bytes themselves are not sniffed.
#[derive(Debug, Clone)]
pub struct FileValidator {
    max_file_size: u64,
    allowed_content_types: Vec<String>,
}

impl Default for FileValidator {
    fn default() -> Self {
        Self::new(
            MAX_DOCUMENT_SIZE_BYTES,
            ALLOWED_DOCUMENT_CONTENT_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }
}

impl FileValidator {
    pub fn new(max_file_size: u64, allowed_content_types: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_content_types: allowed_content_types
                .into_iter()
                .map(|ct| ct.trim().to_lowercase())
                .collect(),
        }
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    pub fn validate_file_size(&self, size: u64) -> Result<(), FileValidationError> {
        if size == 0 {
            return Err(FileValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(FileValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    pub fn validate_content_type(&self, content_type: &str) -> Result<(), FileValidationError> {
        let normalized = content_type.trim().to_lowercase();

        if !self
            .allowed_content_types
            .iter()
            .any(|ct| ct == &normalized)
        {
            return Err(FileValidationError::InvalidContentType {
                content_type: content_type.to_string(),
                allowed: self.allowed_content_types.clone(),
            });
        }

        Ok(())
    }

    /// Type first, then size.
    pub fn validate_all(&self, content_type: &str, size: u64) -> Result<(), FileValidationError> {
        self.validate_content_type(content_type)?;
        self.validate_file_size(size)?;
        Ok(())
    }
}

/// Extension used in the storage key for an uploaded document.
///
/// Takes the lower-cased suffix of the original file name, falling back to
/// the canonical extension of the content type when the name has none.
pub fn document_extension(file_name: &str, content_type: &str) -> String {
    if let Some(ext) = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
    {
        return ext.to_lowercase();
    }

    match content_type.trim().to_lowercase().as_str() {
        "application/pdf" => "pdf",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        _ => "bin",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let validator = FileValidator::default();
        assert_eq!(validator.max_file_size(), 5_242_880);
        assert!(validator.validate_file_size(5_242_880).is_ok());
        assert!(matches!(
            validator.validate_file_size(5_242_881),
            Err(FileValidationError::FileTooLarge { .. })
        ));
    }

    #[test]
    fn test_empty_file() {
        let validator = FileValidator::default();
        assert_eq!(
            validator.validate_file_size(0),
            Err(FileValidationError::EmptyFile)
        );
    }

    #[test]
    fn test_allowed_content_types() {
        let validator = FileValidator::default();
        for ct in ["application/pdf", "image/jpeg", "image/jpg", "image/png", "IMAGE/PNG"] {
            assert!(validator.validate_content_type(ct).is_ok(), "{}", ct);
        }
    }

    #[test]
    fn test_rejected_content_types() {
        let validator = FileValidator::default();
        for ct in ["image/gif", "text/plain", "application/msword", ""] {
            assert!(validator.validate_content_type(ct).is_err(), "{}", ct);
        }
    }

    #[test]
    fn test_validate_all() {
        let validator = FileValidator::default();
        assert!(validator.validate_all("application/pdf", 1024).is_ok());
        assert!(validator.validate_all("image/gif", 1024).is_err());
        assert!(validator.validate_all("image/png", 6 * 1024 * 1024).is_err());
    }

    #[test]
    fn test_user_messages() {
        let err = FileValidationError::FileTooLarge {
            size: 6_000_000,
            max: 5_242_880,
        };
        assert_eq!(err.user_message(), "File size must be less than 5MB");
    }

    #[test]
    fn test_document_extension() {
        assert_eq!(document_extension("Aadhaar.PDF", "application/pdf"), "pdf");
        assert_eq!(document_extension("scan.final.jpeg", "image/jpeg"), "jpeg");
        assert_eq!(document_extension("photo", "image/png"), "png");
        assert_eq!(document_extension("photo", "image/jpg"), "jpg");
    }
}
