//! In-memory session storage.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use newsdesk_core::auth::{Result, Session, SessionId, SessionRepository};

/// In-memory session store for development and testing.
///
/// Sessions live in a HashMap wrapped in `Arc<RwLock<_>>` and are lost when the
/// process exits.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl MemorySessionStore {
    /// Creates a new empty in-memory session store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for MemorySessionStore {
    async fn create_session(&self, session: &Session) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.id.as_str().to_string(), session.clone());
        Ok(())
    }

    async fn get_session(&self, id: &SessionId) -> Result<Option<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(id.as_str()).cloned())
    }

    async fn delete_session(&self, id: &SessionId) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(id.as_str());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn session(id: &str, user_id: i64) -> Session {
        Session {
            id: SessionId::new(id.to_string()),
            user_id,
            created_at: Utc::now(),
            expires_at: Utc::now() + Duration::hours(24),
        }
    }

    fn sid(id: &str) -> SessionId {
        SessionId::new(id.to_string())
    }

    #[tokio::test]
    async fn test_session_create_and_get() {
        let store = MemorySessionStore::new();
        store.create_session(&session("s-1", 7)).await.unwrap();

        let retrieved = store.get_session(&sid("s-1")).await.unwrap().unwrap();
        assert_eq!(retrieved.user_id, 7);
    }

    #[tokio::test]
    async fn test_session_get_unknown() {
        let store = MemorySessionStore::new();
        assert!(store.get_session(&sid("missing")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_session_delete_is_idempotent() {
        let store = MemorySessionStore::new();
        store.create_session(&session("s-1", 7)).await.unwrap();

        store.delete_session(&sid("s-1")).await.unwrap();
        store.delete_session(&sid("s-1")).await.unwrap();

        assert!(store.get_session(&sid("s-1")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clone_shares_state() {
        let store = MemorySessionStore::new();
        let clone = store.clone();

        store.create_session(&session("s-1", 1)).await.unwrap();

        assert!(clone.get_session(&sid("s-1")).await.unwrap().is_some());
    }
}
