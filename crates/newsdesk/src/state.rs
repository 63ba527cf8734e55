//! Application state with repository-based storage.
//!
//! This module defines the shared application state that is passed to all
//! request handlers. It uses repository trait objects for storage abstraction
//! and supports different backend combinations via feature flags.

use std::sync::Arc;

use newsdesk_auth::AuthState;
use newsdesk_core::storage::{
    CategoryRepository, GroupRepository, NewsRepository, SubscriptionRepository, UserRepository,
};

use crate::config::Config;

// ============================================================================
// Compile-time feature validation
// ============================================================================

// Storage features: exactly one must be enabled, they are mutually exclusive
#[cfg(all(feature = "sqlite", feature = "inmemory"))]
compile_error!("Cannot enable both 'sqlite' and 'inmemory' storage features");

#[cfg(not(any(feature = "inmemory", feature = "sqlite")))]
compile_error!("Must enable exactly one storage feature: 'inmemory' or 'sqlite'");

#[cfg(not(feature = "memory"))]
compile_error!("Must enable the 'memory' cache feature");

/// Shared application state.
///
/// This is cloned for each request handler and contains shared resources
/// including repository trait objects for database access.
#[derive(Clone)]
pub struct AppState {
    /// News repository (cached, wraps underlying storage).
    pub news: Arc<dyn NewsRepository>,
    /// The same news storage without the cache, for loading records that are about
    /// to be edited or deleted.
    pub news_source: Arc<dyn NewsRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub users: Arc<dyn UserRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub subscriptions: Arc<dyn SubscriptionRepository>,
    /// Sessions and the signed-in user lookup.
    pub auth: AuthState,
    pub config: Config,
}

impl AsRef<AuthState> for AppState {
    fn as_ref(&self) -> &AuthState {
        &self.auth
    }
}

impl AppState {
    /// Wires a storage backend into the state. `news` is expected to be the cached
    /// decorator; the other repositories are usually the same backend.
    fn build<R>(
        news: Arc<dyn NewsRepository>,
        storage: Arc<R>,
        auth: AuthState,
        config: &Config,
    ) -> Self
    where
        R: NewsRepository
            + CategoryRepository
            + UserRepository
            + GroupRepository
            + SubscriptionRepository
            + 'static,
    {
        Self {
            news,
            news_source: storage.clone(),
            categories: storage.clone(),
            users: storage.clone(),
            groups: storage.clone(),
            subscriptions: storage,
            auth,
            config: config.clone(),
        }
    }
}

// ============================================================================
// Factory functions for different backend combinations
// ============================================================================

#[cfg(all(feature = "sqlite", feature = "memory"))]
mod sqlite_memory {
    use super::*;
    use newsdesk_auth::{AuthConfig, SqliteSessionStore};
    use sqlx::sqlite::SqlitePoolOptions;

    use crate::cache::MemoryCache;
    use crate::storage::cached::CachedNewsRepository;
    use crate::storage::SqliteRepository;

    impl AppState {
        /// Creates AppState with SQLite storage, SQLite sessions and in-memory cache.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let sqlite_repo = Arc::new(SqliteRepository::new(&config.sqlite_path).await?);
            let memory_cache = Arc::new(MemoryCache::new(config.cache_max_entries)?);

            let pool = SqlitePoolOptions::new()
                .max_connections(5)
                .connect(&format!("sqlite://{}?mode=rwc", config.sqlite_path))
                .await?;
            let sessions = SqliteSessionStore::new(pool);
            sessions.migrate().await?;
            let purged = sessions.purge_expired(chrono::Utc::now()).await?;
            tracing::debug!(purged, "Removed expired sessions");

            let cached_news_repo = Arc::new(CachedNewsRepository::new(
                sqlite_repo.clone(),
                memory_cache,
                config.cache_ttl(),
                config.cache_write_policy,
            ));

            let auth = AuthState::new(
                Arc::new(sessions),
                sqlite_repo.clone(),
                AuthConfig::from_env(),
            );

            Ok(Self::build(cached_news_repo, sqlite_repo, auth, config))
        }
    }
}

#[cfg(all(feature = "inmemory", feature = "memory"))]
mod inmemory_memory {
    use super::*;
    use newsdesk_auth::{AuthConfig, MemorySessionStore};

    use crate::cache::MemoryCache;
    use crate::storage::cached::CachedNewsRepository;
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// Creates AppState with in-memory storage, sessions and cache.
        /// Useful for development without any external dependencies.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let inmemory_repo = Arc::new(InMemoryRepository::new());
            let memory_cache = Arc::new(MemoryCache::new(config.cache_max_entries)?);

            let cached_news_repo = Arc::new(CachedNewsRepository::new(
                inmemory_repo.clone(),
                memory_cache,
                config.cache_ttl(),
                config.cache_write_policy,
            ));

            let auth = AuthState::new(
                Arc::new(MemorySessionStore::new()),
                inmemory_repo.clone(),
                AuthConfig::from_env(),
            );

            Ok(Self::build(cached_news_repo, inmemory_repo, auth, config))
        }
    }
}

// ============================================================================
// Test support - provides constructors for unit tests
// ============================================================================
