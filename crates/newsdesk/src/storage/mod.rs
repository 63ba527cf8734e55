//! Storage backend implementations.
//!
//! This module provides concrete implementations of the repository traits
//! defined in `newsdesk_core::storage`. The implementations are selected
//! at compile time via feature flags.
//!
//! # Feature Flags
//!
//! - `inmemory` (default): HashMaps behind `tokio::sync::RwLock`, nothing persisted
//! - `sqlite`: SQLite storage backend using `rusqlite` and `tokio-rusqlite`
//!
//! These features are mutually exclusive - only one storage backend can be
//! enabled at a time.
//!
//! # Examples
//!
//! Build with the in-memory backend (default):
//! ```bash
//! cargo build -p newsdesk
//! ```
//!
//! Build with SQLite:
//! ```bash
//! cargo build -p newsdesk --no-default-features --features sqlite,memory
//! ```

pub mod cached;

#[cfg(any(feature = "inmemory", test))]
pub mod inmemory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(any(feature = "inmemory", test))]
pub use inmemory::InMemoryRepository;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepository;
