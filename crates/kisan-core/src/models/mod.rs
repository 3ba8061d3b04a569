//! Data models for the registration workflow.

pub mod catalog;
mod document;
mod profile;
mod registration;
mod user;

pub use document::*;
pub use profile::*;
pub use registration::*;
pub use user::*;
