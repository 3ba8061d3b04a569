//! Kisan Services Library
//!
//! The registration workflow: per-document upload tracking, the registration
//! form controller, the identity gate seam, the landing-page quick
//! registration and the storage self-check.

pub mod diagnostics;
pub mod identity;
pub mod quick_registration;
pub mod registration;
pub mod tracker;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use diagnostics::{DiagnosticReport, DiagnosticStep, StorageDiagnostics};
pub use identity::{
    otp_destination, select_view, IdentityError, IdentityGate, PortalView, SignUpOutcome,
};
pub use quick_registration::{
    QuickRegistration, QuickRegistrationError, QuickRegistrationForm, QuickRegistrationReceipt,
};
pub use registration::{RegistrationController, SubmissionReceipt, SubmitError};
pub use tracker::{DocumentTracker, UploadError, UploadFile, UploadState};
