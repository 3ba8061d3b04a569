use crate::constants::{PHONE_DIGITS, PINCODE_DIGITS};
use crate::models::FormField;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("{} is required", .field.label())]
    Required { field: FormField },

    #[error("{} must be exactly {expected} digits", .field.label())]
    DigitCount { field: FormField, expected: usize },
}

impl FieldError {
    pub fn field(&self) -> FormField {
        match self {
            FieldError::Required { field } | FieldError::DigitCount { field, .. } => *field,
        }
    }
}

/// Check the format of a single field value.
///
/// Blank values pass: whether a field may be blank is decided by the
/// submit-time required sweep, not here.
pub fn validate_field(field: FormField, value: &str) -> Result<(), FieldError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(());
    }

    match field {
        FormField::Phone => expect_digits(field, value, PHONE_DIGITS),
        FormField::Pincode => expect_digits(field, value, PINCODE_DIGITS),
        _ => Ok(()),
    }
}

/// Like [`validate_field`], but a blank value is an error.
pub fn validate_required(field: FormField, value: &str) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::Required { field });
    }
    validate_field(field, value)
}

fn expect_digits(field: FormField, value: &str, expected: usize) -> Result<(), FieldError> {
    if value.len() == expected && value.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(FieldError::DigitCount { field, expected })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_ok() {
        assert!(validate_field(FormField::Phone, "9876543210").is_ok());
        assert!(validate_field(FormField::Phone, " 9876543210 ").is_ok());
    }

    #[test]
    fn test_phone_wrong_length() {
        assert_eq!(
            validate_field(FormField::Phone, "98765"),
            Err(FieldError::DigitCount {
                field: FormField::Phone,
                expected: 10
            })
        );
        assert!(validate_field(FormField::Phone, "98765432100").is_err());
    }

    #[test]
    fn test_phone_non_digits_rejected() {
        assert!(validate_field(FormField::Phone, "98765-4321").is_err());
        assert!(validate_field(FormField::Phone, "+919876543").is_err());
    }

    #[test]
    fn test_pincode() {
        assert!(validate_field(FormField::Pincode, "411001").is_ok());
        assert!(validate_field(FormField::Pincode, "41100").is_err());
        assert!(validate_field(FormField::Pincode, "41100a").is_err());
    }

    #[test]
    fn test_blank_passes_format_check() {
        assert!(validate_field(FormField::Phone, "").is_ok());
        assert!(validate_field(FormField::Pincode, "   ").is_ok());
    }

    #[test]
    fn test_free_text_accepted() {
        assert!(validate_field(FormField::Village, "Wagholi").is_ok());
        assert!(validate_field(FormField::IfscCode, "anything").is_ok());
    }

    #[test]
    fn test_validate_required() {
        assert_eq!(
            validate_required(FormField::BankName, "  "),
            Err(FieldError::Required {
                field: FormField::BankName
            })
        );
        assert!(validate_required(FormField::BankName, "SBI").is_ok());
        assert!(validate_required(FormField::Pincode, "12").is_err());
    }

    #[test]
    fn test_error_message() {
        let err = FieldError::DigitCount {
            field: FormField::Pincode,
            expected: 6,
        };
        assert_eq!(err.to_string(), "Pincode must be exactly 6 digits");
        assert_eq!(err.field(), FormField::Pincode);
    }
}
