//! In-memory storage backend.
//!
//! This module provides an in-memory implementation of the repository traits
//! that stores all data in HashMaps wrapped in `Arc<RwLock<_>>`. This is useful
//! for testing and development scenarios where persistence is not required.
//!
//! # Example
//!
//! ```rust,ignore
//! use newsdesk::storage::inmemory::InMemoryRepository;
//!
//! let repo = InMemoryRepository::new();
//! let sports = repo.create_category("Sports").await?;
//! ```

mod repository;

pub use repository::InMemoryRepository;
