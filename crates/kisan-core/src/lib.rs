//! Kisan Core Library
//!
//! Domain models, validation, error types and configuration shared by every
//! crate of the farmer registration workflow.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;
pub mod validation;

pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::StorageBackend;
