use std::time::Duration;

/// Default session lifetime: two weeks.
const DEFAULT_SESSION_TTL_DAYS: u64 = 14;

/// Complete auth configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub session_ttl: Duration,
    pub cookie_name: String,
    pub cookie_secure: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl: days(DEFAULT_SESSION_TTL_DAYS),
            cookie_name: "session".to_string(),
            cookie_secure: true,
        }
    }
}

impl AuthConfig {
    /// Load from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SESSION_TTL_DAYS`: Session TTL in days (default: 14)
    /// - `SESSION_COOKIE_NAME`: Name of the session cookie (default: `session`)
    /// - `COOKIE_SECURE`: Whether to set secure flag on cookies (default: true)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let session_ttl = std::env::var("SESSION_TTL_DAYS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|days| *days > 0)
            .map(days)
            .unwrap_or(defaults.session_ttl);

        let cookie_name = std::env::var("SESSION_COOKIE_NAME")
            .ok()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(defaults.cookie_name);

        let cookie_secure = std::env::var("COOKIE_SECURE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(defaults.cookie_secure);

        Self {
            session_ttl,
            cookie_name,
            cookie_secure,
        }
    }

    /// Session lifetime as a chrono duration, for expiry arithmetic.
    pub fn session_ttl_chrono(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.session_ttl.as_secs() as i64)
    }
}

fn days(days: u64) -> Duration {
    Duration::from_secs(days * 24 * 60 * 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AuthConfig::default();
        assert_eq!(config.session_ttl, Duration::from_secs(14 * 24 * 60 * 60));
        assert_eq!(config.cookie_name, "session");
        assert!(config.cookie_secure);
    }

    #[test]
    fn test_session_ttl_chrono_matches_std() {
        let config = AuthConfig {
            session_ttl: Duration::from_secs(3600),
            ..AuthConfig::default()
        };
        assert_eq!(config.session_ttl_chrono(), chrono::Duration::hours(1));
    }
}
