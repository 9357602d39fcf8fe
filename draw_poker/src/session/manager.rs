//! Game manager for spawning and routing to game actors.

use std::{collections::HashMap, sync::Arc};
use tokio::sync::{Mutex, RwLock, oneshot};
use uuid::Uuid;

use super::{
    actor::{GameActor, GameHandle},
    config::SessionConfig,
    errors::{SessionError, SessionResult},
    messages::{GameMessage, GameResponse},
};
use crate::{
    game::{Action, GameEngine, Session},
    store::SessionStore,
};

/// Attempts to deliver a request before giving up on an actor that keeps
/// going away underneath us.
const MAX_SEND_ATTEMPTS: usize = 3;

/// Game manager owning one actor per live session.
///
/// Every mutation of a session goes through its actor, so requests for the
/// same game are applied one at a time. Actors stop when idle and are
/// restored from the store the next time their game is touched.
pub struct GameManager {
    /// Session persistence
    store: Arc<dyn SessionStore>,

    /// Source engine; each actor gets a fork of it
    engine: Mutex<GameEngine>,

    /// Actor settings
    config: SessionConfig,

    /// Live actor handles
    sessions: RwLock<HashMap<Uuid, GameHandle>>,
}

impl GameManager {
    /// Create a new game manager
    pub fn new(store: Arc<dyn SessionStore>, engine: GameEngine, config: SessionConfig) -> Self {
        Self {
            store,
            engine: Mutex::new(engine),
            config,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Deal a new game, persist it and start its actor
    pub async fn create_game(&self) -> SessionResult<Session> {
        let (session, engine) = {
            let mut engine = self.engine.lock().await;
            (engine.create_game()?, engine.fork())
        };
        self.store.create(&session).await?;

        let handle = self.spawn(session.clone(), engine);
        self.sessions.write().await.insert(session.id, handle);
        Ok(session)
    }

    /// Current state of a game
    pub async fn get_state(&self, id: Uuid) -> SessionResult<Session> {
        self.request(id, |response| GameMessage::GetState { response })
            .await
    }

    /// Apply a betting action
    pub async fn take_action(&self, id: Uuid, action: Action) -> SessionResult<Session> {
        self.request(id, |response| GameMessage::TakeAction { action, response })
            .await
    }

    /// Discard and replace hand positions
    pub async fn draw(&self, id: Uuid, discard: Vec<i64>) -> SessionResult<Session> {
        self.request(id, |response| GameMessage::Draw { discard, response })
            .await
    }

    /// Number of running game actors
    pub async fn active_session_count(&self) -> usize {
        self.sessions
            .read()
            .await
            .values()
            .filter(|handle| !handle.is_closed())
            .count()
    }

    /// Stop every actor after it has answered its queued requests
    pub async fn shutdown(&self) {
        let handles: Vec<GameHandle> = self
            .sessions
            .write()
            .await
            .drain()
            .map(|(_, handle)| handle)
            .collect();
        log::info!("Stopping {} game actor(s)", handles.len());

        for handle in &handles {
            let (response, rx) = oneshot::channel();
            if handle.send(GameMessage::Close { response }).await.is_ok() {
                let _ = rx.await;
            }
        }
        for handle in &handles {
            handle.stopped().await;
        }
    }

    async fn request<F>(&self, id: Uuid, make: F) -> GameResponse
    where
        F: FnOnce(oneshot::Sender<GameResponse>) -> GameMessage,
    {
        let (response, rx) = oneshot::channel();
        let mut message = make(response);

        for attempt in 1..=MAX_SEND_ATTEMPTS {
            let handle = self.handle(id).await?;
            match handle.send(message).await {
                Ok(()) => {
                    return rx.await.map_err(|_| SessionError::ActorUnavailable(id))?;
                }
                Err(returned) => {
                    log::debug!("Game {id}: actor gone (attempt {attempt}), respawning");
                    message = returned;
                    self.evict(&handle).await;
                }
            }
        }

        log::warn!("Game {id}: giving up after {MAX_SEND_ATTEMPTS} attempts");
        Err(SessionError::ActorUnavailable(id))
    }

    /// Live handle for `id`, restoring the actor from the store if needed
    async fn handle(&self, id: Uuid) -> SessionResult<GameHandle> {
        let stale = {
            let sessions = self.sessions.read().await;
            match sessions.get(&id) {
                Some(handle) if !handle.is_closed() => return Ok(handle.clone()),
                other => other.cloned(),
            }
        };

        // The old actor may still be flushing its last write.
        if let Some(stale) = stale {
            stale.stopped().await;
        }
        let session = self.store.get(id).await?;

        let mut sessions = self.sessions.write().await;
        if let Some(handle) = sessions.get(&id).filter(|h| !h.is_closed()) {
            return Ok(handle.clone());
        }
        let engine = self.engine.lock().await.fork();
        let handle = self.spawn(session, engine);
        sessions.insert(id, handle.clone());
        log::debug!("Game {id}: actor restored from store");
        Ok(handle)
    }

    /// Forget a closing actor once it has finished its queued writes, so the
    /// next `handle` call restores from the latest stored version.
    async fn evict(&self, handle: &GameHandle) {
        handle.stopped().await;
        let mut sessions = self.sessions.write().await;
        if sessions
            .get(&handle.game_id())
            .is_some_and(|current| current.same_actor(handle))
        {
            sessions.remove(&handle.game_id());
        }
    }

    fn spawn(&self, session: Session, engine: GameEngine) -> GameHandle {
        let (actor, handle) = GameActor::new(session, engine, Arc::clone(&self.store), self.config);
        tokio::spawn(actor.run());
        handle
    }
}
