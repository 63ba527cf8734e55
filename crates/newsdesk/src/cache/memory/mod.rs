//! In-memory cache backend implementation.
//!
//! Provides a thread-safe in-memory cache with LRU eviction and optional TTL
//! for single-instance deployments.

mod cache;

pub use cache::MemoryCache;
