use std::{env, time::Duration};

/// What the cached news repository does with `news-{id}` after a successful write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheWritePolicy {
    /// Leave the snapshot in place; readers may see stale data until it is evicted.
    #[default]
    Retain,
    /// Drop the snapshot so the next read goes to storage.
    Invalidate,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// News items per listing page (default: 3)
    pub page_size: u32,
    /// Cache TTL in seconds (default: unset, snapshots never expire)
    pub cache_ttl_seconds: Option<u64>,
    /// Maximum number of cache entries (default: 10,000)
    pub cache_max_entries: usize,
    /// Cache behavior on update and delete (default: retain)
    pub cache_write_policy: CacheWritePolicy,
    /// Require `delete_news` on the delete entry points (default: false)
    pub enforce_delete_permission: bool,
    /// Path to SQLite database file (default: "newsdesk.db")
    /// Note: Only used when the `sqlite` feature is enabled.
    #[allow(dead_code)]
    pub sqlite_path: String,
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `NEWS_PAGE_SIZE` - Items per listing page (default: 3)
    /// - `CACHE_TTL_SECONDS` - Cache TTL in seconds (default: no expiry)
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 10,000)
    /// - `CACHE_INVALIDATE_ON_WRITE` - Drop cached snapshots on update/delete (default: false)
    /// - `ENFORCE_DELETE_PERMISSION` - Require `delete_news` to delete (default: false)
    /// - `SQLITE_PATH` - SQLite database path (default: "newsdesk.db")
    pub fn from_env() -> Self {
        let invalidate = env::var("CACHE_INVALIDATE_ON_WRITE")
            .ok()
            .and_then(|v| parse_flag(&v))
            .unwrap_or(false);

        Self {
            page_size: env::var("NEWS_PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|size| *size > 0)
                .unwrap_or(3),
            cache_ttl_seconds: env::var("CACHE_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok()),
            cache_max_entries: env::var("CACHE_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|max| *max > 0)
                .unwrap_or(10_000),
            cache_write_policy: if invalidate {
                CacheWritePolicy::Invalidate
            } else {
                CacheWritePolicy::Retain
            },
            enforce_delete_permission: env::var("ENFORCE_DELETE_PERMISSION")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(false),
            sqlite_path: env::var("SQLITE_PATH").unwrap_or_else(|_| "newsdesk.db".to_string()),
        }
    }

    /// Get cache TTL as a Duration. `None` means snapshots live until evicted.
    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl_seconds.map(Duration::from_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_size: 3,
            cache_ttl_seconds: None,
            cache_max_entries: 10_000,
            cache_write_policy: CacheWritePolicy::Retain,
            enforce_delete_permission: false,
            sqlite_path: "newsdesk.db".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_ttl_conversion() {
        let config = Config {
            cache_ttl_seconds: Some(600),
            ..Config::default()
        };

        assert_eq!(config.cache_ttl(), Some(Duration::from_secs(600)));
        assert_eq!(Config::default().cache_ttl(), None);
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();

        assert_eq!(config.page_size, 3);
        assert_eq!(config.cache_max_entries, 10_000);
        assert_eq!(config.cache_write_policy, CacheWritePolicy::Retain);
        assert!(!config.enforce_delete_permission);
        assert_eq!(config.sqlite_path, "newsdesk.db");
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("true"), Some(true));
        assert_eq!(parse_flag(" ON "), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
