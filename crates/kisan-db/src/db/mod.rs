//! Database repositories for submitted farmer profiles
//
// Profile store trait, PostgreSQL repository and factory
pub mod profile;
//
// Process-local store used when no database is configured
pub mod memory;
//
// Pool creation and migrations
pub mod setup;

pub use memory::InMemoryProfileStore;
pub use profile::{create_profile_store, PostgresProfileRepository, ProfileStore};
pub use setup::setup_database;
