//! Kisan Infrastructure Library
//!
//! Shared infrastructure for the binaries:
//! - Telemetry initialization (tracing subscriber)
//! - Error reporting

pub mod error;
pub mod telemetry;

pub use error::{log_error, ErrorReport};
pub use telemetry::{init_telemetry, shutdown_telemetry};
