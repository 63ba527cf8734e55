//! Cache backend implementations.
//!
//! This module provides concrete implementations of the cache trait
//! defined in `newsdesk_core::cache`. The implementation is selected
//! at compile time via feature flags.
//!
//! # Feature Flags
//!
//! - `memory` (default): In-memory LRU cache using tokio synchronization primitives

#[cfg(not(feature = "memory"))]
compile_error!(
    "No cache backend selected. Enable the 'memory' feature. \
    Example: cargo build -p newsdesk --features memory"
);

#[cfg(feature = "memory")]
pub mod memory;

#[cfg(feature = "memory")]
pub use memory::MemoryCache;
