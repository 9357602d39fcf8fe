use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{SessionStore, StoreError, StoreResult};
use crate::game::Session;

/// Process-local store. Sessions live until the process exits.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, session: &Session) -> StoreResult<()> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session.id) {
            return Err(StoreError::AlreadyExists(session.id));
        }
        sessions.insert(session.id, session.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> StoreResult<Session> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn update(&self, session: &Session) -> StoreResult<u64> {
        let mut sessions = self.sessions.write().await;
        let stored = sessions
            .get_mut(&session.id)
            .ok_or(StoreError::NotFound(session.id))?;
        if stored.version != session.version {
            return Err(StoreError::Conflict {
                id: session.id,
                expected: session.version,
                found: stored.version,
            });
        }
        let version = session.version + 1;
        *stored = Session {
            version,
            ..session.clone()
        };
        Ok(version)
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameEngine, Phase};

    fn new_session() -> Session {
        GameEngine::with_rng_seed(11).create_game().unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = InMemorySessionStore::new();
        let session = new_session();
        store.create(&session).await.unwrap();
        assert_eq!(store.get(session.id).await.unwrap(), session);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_create_twice_fails() {
        let store = InMemorySessionStore::new();
        let session = new_session();
        store.create(&session).await.unwrap();
        assert!(matches!(
            store.create(&session).await,
            Err(StoreError::AlreadyExists(id)) if id == session.id
        ));
    }

    #[tokio::test]
    async fn test_get_unknown() {
        let store = InMemorySessionStore::new();
        let id = Uuid::new_v4();
        assert!(matches!(store.get(id).await, Err(StoreError::NotFound(found)) if found == id));
    }

    #[tokio::test]
    async fn test_update_bumps_version() {
        let store = InMemorySessionStore::new();
        let mut session = new_session();
        store.create(&session).await.unwrap();

        session.phase = Phase::Drawing;
        let version = store.update(&session).await.unwrap();
        assert_eq!(version, 1);

        let stored = store.get(session.id).await.unwrap();
        assert_eq!(stored.phase, Phase::Drawing);
        assert_eq!(stored.version, 1);
    }

    #[tokio::test]
    async fn test_stale_update_conflicts() {
        let store = InMemorySessionStore::new();
        let session = new_session();
        store.create(&session).await.unwrap();

        let first = session.clone();
        let second = session.clone();
        store.update(&first).await.unwrap();
        let err = store.update(&second).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Conflict {
                expected: 0,
                found: 1,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_update_unknown() {
        let store = InMemorySessionStore::new();
        let session = new_session();
        assert!(matches!(
            store.update(&session).await,
            Err(StoreError::NotFound(_))
        ));
    }
}
