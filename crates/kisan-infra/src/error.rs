//! Error presentation
//!
//! Turns an `AppError` into what a user should see and logs it at the level
//! its metadata asks for.

use kisan_core::{AppError, ErrorMetadata, LogLevel};
use serde::Serialize;

/// User-facing error summary
#[derive(Debug, Serialize)]
pub struct ErrorReport {
    pub error: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<&'static str>,
    pub recoverable: bool,
}

impl From<&AppError> for ErrorReport {
    fn from(err: &AppError) -> Self {
        Self {
            error: err.client_message(),
            code: err.error_code(),
            details: (!err.is_sensitive()).then(|| err.to_string()),
            suggested_action: err.suggested_action(),
            recoverable: err.is_recoverable(),
        }
    }
}

/// Log `err` with its source chain at the level from its metadata.
pub fn log_error(err: &AppError) {
    let details = err.detailed_message();
    match err.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error_type = err.error_type(), code = err.error_code(), "{}", details)
        }
        LogLevel::Warn => {
            tracing::warn!(error_type = err.error_type(), code = err.error_code(), "{}", details)
        }
        LogLevel::Error => {
            tracing::error!(error_type = err.error_type(), code = err.error_code(), "{}", details)
        }
    }
}
