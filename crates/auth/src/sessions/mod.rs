//! Session storage implementations.
//!
//! Provides `SessionRepository` implementations for:
//! - In-memory (always available)
//! - SQLite (with `sqlite` feature)

mod inmemory;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use inmemory::MemorySessionStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteSessionStore;
