//! Kisan DB Library
//!
//! Profile store for submitted registrations: the `ProfileStore` trait, its
//! PostgreSQL repository and an in-memory store for development.

pub mod db;

pub use db::{
    create_profile_store, setup_database, InMemoryProfileStore, PostgresProfileRepository,
    ProfileStore,
};
