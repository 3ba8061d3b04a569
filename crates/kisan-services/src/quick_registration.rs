//! Landing-page quick registration
//!
//! A short form that only needs a verified mobile number. Submitting it
//! yields a reference id of the form `PMK-{year}-XXXXXXXX`.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};
use kisan_core::constants::{AADHAAR_DIGITS, PHONE_DIGITS, REFERENCE_ID_PREFIX};
use kisan_core::models::catalog::{is_known_crop, is_known_state};
use kisan_core::AppError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::identity::{otp_destination, IdentityError, IdentityGate};

const REFERENCE_SUFFIX_LEN: usize = 8;
const REFERENCE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct QuickRegistrationForm {
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    #[validate(custom(function = "validate_mobile"))]
    pub phone: String,
    #[validate(custom(function = "validate_state"))]
    pub state: String,
    #[validate(length(min = 1, message = "District is required"))]
    pub district: String,
    #[validate(length(min = 1, message = "Village is required"))]
    pub village: String,
    #[validate(length(min = 1, message = "Land size is required"))]
    pub land_size: String,
    #[validate(custom(function = "validate_crop"))]
    pub primary_crop: String,
    #[validate(custom(function = "validate_aadhaar"))]
    pub aadhaar: String,
}

fn digits_only(value: &str, expected: usize) -> bool {
    value.len() == expected && value.bytes().all(|b| b.is_ascii_digit())
}

fn validate_mobile(phone: &str) -> Result<(), ValidationError> {
    if digits_only(phone.trim(), PHONE_DIGITS) {
        Ok(())
    } else {
        Err(ValidationError::new("phone").with_message("Enter a valid 10-digit mobile number".into()))
    }
}

fn validate_aadhaar(aadhaar: &str) -> Result<(), ValidationError> {
    if digits_only(aadhaar.trim(), AADHAAR_DIGITS) {
        Ok(())
    } else {
        Err(ValidationError::new("aadhaar").with_message("Aadhaar number must be 12 digits".into()))
    }
}

fn validate_state(state: &str) -> Result<(), ValidationError> {
    if is_known_state(state) {
        Ok(())
    } else {
        Err(ValidationError::new("state").with_message("Select a state from the list".into()))
    }
}

fn validate_crop(crop: &str) -> Result<(), ValidationError> {
    if is_known_crop(crop) {
        Ok(())
    } else {
        Err(ValidationError::new("primary_crop").with_message("Select a crop from the list".into()))
    }
}

#[derive(Debug, Error)]
pub enum QuickRegistrationError {
    #[error("Please verify your mobile number with OTP first")]
    OtpRequired,

    #[error("Invalid registration: {0}")]
    Invalid(#[from] ValidationErrors),

    #[error(transparent)]
    Identity(#[from] IdentityError),
}

impl From<QuickRegistrationError> for AppError {
    fn from(err: QuickRegistrationError) -> Self {
        match err {
            QuickRegistrationError::OtpRequired => AppError::InvalidInput(err.to_string()),
            QuickRegistrationError::Invalid(e) => e.into(),
            QuickRegistrationError::Identity(e) => e.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuickRegistrationReceipt {
    pub reference_id: String,
    pub submitted_at: DateTime<Utc>,
}

/// `PMK-{year}-` followed by eight upper-case alphanumerics.
pub fn generate_reference_id<R: Rng>(year: i32, rng: &mut R) -> String {
    let suffix: String = (0..REFERENCE_SUFFIX_LEN)
        .map(|_| REFERENCE_ALPHABET[rng.random_range(0..REFERENCE_ALPHABET.len())] as char)
        .collect();
    format!("{}-{}-{}", REFERENCE_ID_PREFIX, year, suffix)
}

/// Quick registration session: request an OTP, then submit once.
pub struct QuickRegistration {
    gate: Arc<dyn IdentityGate>,
    otp_sent_to: Mutex<Option<String>>,
}

impl QuickRegistration {
    pub fn new(gate: Arc<dyn IdentityGate>) -> Self {
        Self {
            gate,
            otp_sent_to: Mutex::new(None),
        }
    }

    pub async fn request_otp(&self, phone: &str) -> Result<(), QuickRegistrationError> {
        let destination = otp_destination(phone)?;
        self.gate.request_otp(&destination).await?;
        tracing::info!("Quick registration OTP requested");
        *self.otp_sent_to.lock().await = Some(destination);
        Ok(())
    }

    /// Submit `form`. The OTP must have been requested for the same number;
    /// a successful submission resets it.
    pub async fn submit(
        &self,
        form: &QuickRegistrationForm,
    ) -> Result<QuickRegistrationReceipt, QuickRegistrationError> {
        let destination = otp_destination(&form.phone).ok();
        {
            let sent_to = self.otp_sent_to.lock().await;
            if sent_to.is_none() || *sent_to != destination {
                return Err(QuickRegistrationError::OtpRequired);
            }
        }

        form.validate()?;

        let submitted_at = Utc::now();
        let reference_id = generate_reference_id(submitted_at.year(), &mut rand::rng());
        *self.otp_sent_to.lock().await = None;

        tracing::info!(reference_id = %reference_id, "Quick registration submitted");
        Ok(QuickRegistrationReceipt {
            reference_id,
            submitted_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    fn form() -> QuickRegistrationForm {
        QuickRegistrationForm {
            full_name: "Lakshmi Devi".to_string(),
            phone: "9988776655".to_string(),
            state: "Karnataka".to_string(),
            district: "Mandya".to_string(),
            village: "Maddur".to_string(),
            land_size: "2".to_string(),
            primary_crop: "Rice".to_string(),
            aadhaar: "123412341234".to_string(),
        }
    }

    #[test]
    fn test_reference_id_format() {
        let id = generate_reference_id(2024, &mut rand::rng());
        assert!(id.starts_with("PMK-2024-"));
        let suffix = &id["PMK-2024-".len()..];
        assert_eq!(suffix.len(), 8);
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_form_validation() {
        assert!(form().validate().is_ok());

        let mut bad = form();
        bad.state = "Atlantis".to_string();
        bad.aadhaar = "1234".to_string();
        bad.primary_crop = "Quinoa".to_string();
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("state"));
        assert!(fields.contains_key("aadhaar"));
        assert!(fields.contains_key("primary_crop"));

        let mut blank = form();
        blank.primary_crop = String::new();
        assert!(blank.validate().is_err());
    }

    #[tokio::test]
    async fn test_submit_requires_otp() {
        let gate = MockIdentityGate::new();
        let quick = QuickRegistration::new(Arc::new(gate.clone()));

        assert!(matches!(
            quick.submit(&form()).await,
            Err(QuickRegistrationError::OtpRequired)
        ));

        quick.request_otp("9988776655").await.unwrap();
        assert_eq!(gate.otp_requests(), vec!["+919988776655".to_string()]);

        let receipt = quick.submit(&form()).await.unwrap();
        assert!(receipt.reference_id.starts_with("PMK-"));

        // the OTP is consumed by a successful submission
        assert!(matches!(
            quick.submit(&form()).await,
            Err(QuickRegistrationError::OtpRequired)
        ));
    }

    #[tokio::test]
    async fn test_otp_for_other_number_does_not_count() {
        let quick = QuickRegistration::new(Arc::new(MockIdentityGate::new()));
        quick.request_otp("9000000000").await.unwrap();

        assert!(matches!(
            quick.submit(&form()).await,
            Err(QuickRegistrationError::OtpRequired)
        ));
    }

    #[tokio::test]
    async fn test_short_phone_rejected_before_gate() {
        let gate = MockIdentityGate::new();
        let quick = QuickRegistration::new(Arc::new(gate.clone()));

        let result = quick.request_otp("99887").await;
        assert!(matches!(
            result,
            Err(QuickRegistrationError::Identity(IdentityError::InvalidPhone))
        ));
        assert!(gate.otp_requests().is_empty());
    }
}
