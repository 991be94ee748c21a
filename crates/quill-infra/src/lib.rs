//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL store via SeaORM
//!
//! Without `postgres` only the in-memory and disconnected stores are built.

pub mod database;
pub mod media;

// Re-exports
pub use database::{
    DatabaseConfig, DisconnectedStore, InMemoryCategoryRepository, InMemoryPostRepository,
};
pub use media::LocalMediaStore;

#[cfg(feature = "postgres")]
pub use database::{PostgresCategoryRepository, PostgresPostRepository};
