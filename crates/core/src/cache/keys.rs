/// Prefix shared by every news detail key.
pub const NEWS_KEY_PREFIX: &str = "news-";

/// Returns the cache key for a single news record.
pub fn news_key(news_id: i64) -> String {
    format!("{NEWS_KEY_PREFIX}{news_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_news_key() {
        assert_eq!(news_key(1), "news-1");
        assert_eq!(news_key(1234), "news-1234");
    }

    #[test]
    fn test_news_key_uses_prefix() {
        assert!(news_key(99).starts_with(NEWS_KEY_PREFIX));
    }
}
