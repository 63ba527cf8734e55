use std::time::Duration;

use async_trait::async_trait;

use super::Result;

/// Key-value cache holding opaque byte snapshots.
///
/// Implementations are injected where needed; callers own the key scheme and the
/// encoding of the values.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Gets a value from the cache by key.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Sets a value in the cache with an optional TTL. `None` keeps the value until
    /// it is evicted or deleted.
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()>;

    /// Deletes a value from the cache by key. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;
}
