use chrono::{DateTime, Duration, Utc};
use rand::{distr::Alphanumeric, Rng};

use super::{Session, SessionId};

/// Path of the sign-in page.
pub const LOGIN_PATH: &str = "/accounts/login";

/// Generate a cryptographically random session ID.
pub fn generate_session_id() -> SessionId {
    let id: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect();
    SessionId::new(id)
}

/// Build a session for `user_id` starting at `now`.
pub fn new_session(user_id: i64, now: DateTime<Utc>, ttl: Duration) -> Session {
    Session {
        id: generate_session_id(),
        user_id,
        created_at: now,
        expires_at: calculate_expiry(now, ttl),
    }
}

/// Check if a session has expired.
pub fn is_session_expired(session: &Session, now: DateTime<Utc>) -> bool {
    session.expires_at <= now
}

/// Calculate session expiry from creation time and TTL.
pub fn calculate_expiry(created_at: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    created_at + ttl
}

/// Builds the sign-in URL that returns to `next` afterwards.
///
/// Targets that are not local paths are dropped.
pub fn login_url(next: &str) -> String {
    match super::validate_return_to(next) {
        Some(next) => format!("{LOGIN_PATH}?next={}", urlencoding::encode(next)),
        None => LOGIN_PATH.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_session_id_produces_32_char_alphanumeric() {
        let id = generate_session_id();
        assert_eq!(id.as_str().len(), 32);
        assert!(id.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn generate_session_id_is_unique() {
        assert_ne!(generate_session_id(), generate_session_id());
    }

    #[test]
    fn new_session_expires_after_ttl() {
        let now = Utc::now();
        let session = new_session(7, now, Duration::days(14));
        assert_eq!(session.user_id, 7);
        assert_eq!(session.created_at, now);
        assert_eq!(session.expires_at, now + Duration::days(14));
    }

    #[test]
    fn is_session_expired_returns_false_for_future_expiry() {
        let now = Utc::now();
        let session = new_session(1, now, Duration::hours(1));
        assert!(!is_session_expired(&session, now));
    }

    #[test]
    fn is_session_expired_returns_true_at_exact_expiry() {
        let now = Utc::now();
        let session = new_session(1, now - Duration::hours(1), Duration::hours(1));
        assert!(is_session_expired(&session, now));
    }

    #[test]
    fn login_url_keeps_local_next() {
        assert_eq!(
            login_url("/category/1/subscribe"),
            "/accounts/login?next=%2Fcategory%2F1%2Fsubscribe"
        );
    }

    #[test]
    fn login_url_encodes_query_characters() {
        assert_eq!(
            login_url("/news?page=2&category=1"),
            "/accounts/login?next=%2Fnews%3Fpage%3D2%26category%3D1"
        );
    }

    #[test]
    fn login_url_drops_foreign_next() {
        assert_eq!(login_url("https://evil.com"), "/accounts/login");
    }
}
