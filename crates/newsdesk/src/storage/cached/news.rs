//! Cached news repository decorator.
//!
//! Wraps a `NewsRepository` implementation with the cache-aside pattern for
//! single-record reads. Listings always go to storage.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use newsdesk_core::cache::{deserialize_news, news_key, serialize_news, Cache};
use newsdesk_core::news::{News, NewsDraft, NewsFilter, PageWindow};
use newsdesk_core::storage::{NewsRepository, Result};

use crate::config::CacheWritePolicy;

/// Cached news repository decorator.
///
/// - **Reads**: Check `news-{id}` first; on a miss fetch from the repository and
///   store the snapshot. A hit is returned as is, with no freshness check.
/// - **Writes**: Persist to the repository. What happens to the snapshot is up
///   to the [`CacheWritePolicy`].
///
/// Cache failures never fail a request; they are logged and treated as misses.
///
/// # Type Parameters
///
/// * `R` - The underlying repository implementation
/// * `C` - The cache implementation
pub struct CachedNewsRepository<R, C>
where
    R: NewsRepository,
    C: Cache,
{
    repository: Arc<R>,
    cache: Arc<C>,
    ttl: Option<Duration>,
    policy: CacheWritePolicy,
}

impl<R, C> CachedNewsRepository<R, C>
where
    R: NewsRepository,
    C: Cache,
{
    /// Creates a new cached news repository.
    ///
    /// # Arguments
    ///
    /// * `repository` - The underlying repository to cache
    /// * `cache` - The cache implementation
    /// * `ttl` - Time-to-live for snapshots, `None` to keep them until evicted
    /// * `policy` - Whether updates and deletes drop the snapshot
    pub fn new(
        repository: Arc<R>,
        cache: Arc<C>,
        ttl: Option<Duration>,
        policy: CacheWritePolicy,
    ) -> Self {
        Self {
            repository,
            cache,
            ttl,
            policy,
        }
    }

    async fn invalidate(&self, id: i64) {
        if self.policy != CacheWritePolicy::Invalidate {
            return;
        }
        if let Err(err) = self.cache.delete(&news_key(id)).await {
            tracing::warn!(news_id = id, error = %err, "Failed to invalidate news cache");
        }
    }
}

#[async_trait]
impl<R, C> NewsRepository for CachedNewsRepository<R, C>
where
    R: NewsRepository + 'static,
    C: Cache + 'static,
{
    async fn get_news(&self, id: i64) -> Result<Option<News>> {
        let cache_key = news_key(id);

        match self.cache.get(&cache_key).await {
            Ok(Some(bytes)) => match deserialize_news(&bytes) {
                Ok(news) => {
                    tracing::trace!(news_id = id, "Cache hit for news");
                    return Ok(Some(news));
                }
                Err(err) => {
                    tracing::warn!(news_id = id, error = %err, "Cache news deserialization failed");
                }
            },
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(news_id = id, error = %err, "Cache read failed");
            }
        }

        tracing::trace!(news_id = id, "Cache miss for news");
        let news = self.repository.get_news(id).await?;

        if let Some(ref n) = news {
            match serialize_news(n) {
                Ok(bytes) => {
                    if let Err(err) = self.cache.set(&cache_key, &bytes, self.ttl).await {
                        tracing::warn!(news_id = id, error = %err, "Failed to cache news");
                    }
                }
                Err(err) => {
                    tracing::warn!(news_id = id, error = %err, "Failed to serialize news");
                }
            }
        }

        Ok(news)
    }

    async fn count_news(&self, filter: &NewsFilter) -> Result<u64> {
        self.repository.count_news(filter).await
    }

    async fn list_news(
        &self,
        filter: &NewsFilter,
        window: Option<PageWindow>,
    ) -> Result<Vec<News>> {
        self.repository.list_news(filter, window).await
    }

    async fn create_news(&self, draft: &NewsDraft) -> Result<News> {
        let news = self.repository.create_news(draft).await?;
        tracing::debug!(
            news_id = news.id,
            news_type = %news.news_type,
            heading = %news.heading,
            "News created"
        );
        Ok(news)
    }

    async fn update_news(&self, news: &News) -> Result<()> {
        self.repository.update_news(news).await?;
        self.invalidate(news.id).await;
        tracing::debug!(news_id = news.id, policy = ?self.policy, "News updated");
        Ok(())
    }

    async fn delete_news(&self, id: i64) -> Result<()> {
        self.repository.delete_news(id).await?;
        self.invalidate(id).await;
        tracing::debug!(news_id = id, policy = ?self.policy, "News deleted");
        Ok(())
    }
}
