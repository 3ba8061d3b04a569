//! Identity gate seam
//!
//! The identity provider is an external collaborator. The workflow only
//! needs it to establish a session and hand back the user's identity; the
//! helpers here cover the parts of the sign-in screen that are pure.

use async_trait::async_trait;
use kisan_core::constants::{OTP_COUNTRY_CODE, PHONE_DIGITS};
use kisan_core::models::{Session, SignInRequest, SignUpRequest, UserContext};
use kisan_core::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Invalid login credentials")]
    InvalidCredentials,

    #[error("Email not confirmed")]
    EmailNotVerified,

    #[error("Please enter a valid 10-digit mobile number")]
    InvalidPhone,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Identity provider error: {0}")]
    Provider(String),
}

impl From<validator::ValidationErrors> for IdentityError {
    fn from(err: validator::ValidationErrors) -> Self {
        IdentityError::InvalidRequest(err.to_string())
    }
}

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::InvalidCredentials | IdentityError::EmailNotVerified => {
                AppError::Unauthorized(err.to_string())
            }
            IdentityError::InvalidPhone | IdentityError::InvalidRequest(_) => {
                AppError::InvalidInput(err.to_string())
            }
            IdentityError::Provider(msg) => AppError::Identity(msg),
        }
    }
}

/// Result of creating an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// The provider sent a verification link; no session yet.
    PendingVerification,
    SignedIn(UserContext),
}

/// Authentication provider consumed by the portal.
#[async_trait]
pub trait IdentityGate: Send + Sync {
    /// Create an account. Implementations store `request.metadata()` as the
    /// profile metadata of the new user.
    async fn sign_up(&self, request: &SignUpRequest) -> Result<SignUpOutcome, IdentityError>;

    async fn sign_in(&self, request: &SignInRequest) -> Result<Session, IdentityError>;

    /// Send a one-time password to `destination`, an E.164 number as built
    /// by [`otp_destination`].
    async fn request_otp(&self, destination: &str) -> Result<(), IdentityError>;

    async fn sign_out(&self) -> Result<(), IdentityError>;

    async fn current_user(&self) -> Result<Option<Session>, IdentityError>;
}

/// E.164 destination for a 10-digit Indian mobile number.
pub fn otp_destination(phone: &str) -> Result<String, IdentityError> {
    let phone = phone.trim();
    if phone.len() != PHONE_DIGITS || !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(IdentityError::InvalidPhone);
    }
    Ok(format!("{}{}", OTP_COUNTRY_CODE, phone))
}

/// Which screen the portal shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortalView {
    SignIn,
    Dashboard,
    Registration,
}

pub fn select_view(session: Option<&Session>, registration_in_progress: bool) -> PortalView {
    match session {
        None => PortalView::SignIn,
        Some(_) if registration_in_progress => PortalView::Registration,
        Some(_) => PortalView::Dashboard,
    }
}
