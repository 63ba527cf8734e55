//! Cached repository decorators.
//!
//! This module provides decorator implementations that wrap repository traits
//! with caching behavior. The decorators implement the cache-aside pattern:
//!
//! - **Reads**: Check cache first, on miss fetch from repository and populate cache
//! - **Writes**: Persist to repository, then apply the configured write policy
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! let repo = Arc::new(SqliteRepository::new("newsdesk.db").await?);
//! let cache = Arc::new(MemoryCache::new(10_000)?);
//!
//! let cached_repo = CachedNewsRepository::new(repo, cache, None, CacheWritePolicy::Retain);
//! ```

mod news;

pub use news::CachedNewsRepository;
