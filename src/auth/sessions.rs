use std::collections::HashMap;
use std::sync::Arc;

use rand::{distributions::Alphanumeric, Rng};
use tokio::sync::RwLock;

/// One authenticated session.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: String,
    pub username: String,
}

/// Process-wide session table. Lives exactly as long as the process:
/// nothing is persisted, entries never expire, and a restart logs
/// everyone out.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new session and return its token: a short random
    /// alphanumeric string. Collisions are not checked.
    pub async fn create(&self, user_id: String, username: String) -> String {
        let session_id: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(16)
            .map(char::from)
            .collect();
        self.inner
            .write()
            .await
            .insert(session_id.clone(), Session { user_id, username });
        session_id
    }

    pub async fn lookup(&self, session_id: &str) -> Option<Session> {
        self.inner.read().await.get(session_id).cloned()
    }

    /// Drop a session. Removing an absent token is not an error.
    pub async fn remove(&self, session_id: &str) {
        self.inner.write().await.remove(session_id);
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_then_lookup_returns_identity() {
        let store = SessionStore::new();
        let id = store.create("1700000000000".into(), "alice".into()).await;

        let session = store.lookup(&id).await.expect("session present");
        assert_eq!(session.user_id, "1700000000000");
        assert_eq!(session.username, "alice");
    }

    #[tokio::test]
    async fn tokens_are_distinct_per_create() {
        let store = SessionStore::new();
        let a = store.create("1".into(), "alice".into()).await;
        let b = store.create("1".into(), "alice".into()).await;

        assert_ne!(a, b);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn remove_revokes_and_is_idempotent() {
        let store = SessionStore::new();
        let id = store.create("1".into(), "alice".into()).await;

        store.remove(&id).await;
        assert!(store.lookup(&id).await.is_none());

        // removing again is a no-op, not an error
        store.remove(&id).await;
        store.remove("never-existed").await;
    }

    #[tokio::test]
    async fn lookup_unknown_token_is_none() {
        let store = SessionStore::new();
        assert!(store.lookup("nope").await.is_none());
    }
}
