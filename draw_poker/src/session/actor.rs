//! Game actor: the single writer for one session.

use std::sync::Arc;
use tokio::{
    sync::{mpsc, watch},
    time::timeout,
};
use uuid::Uuid;

use super::{
    config::SessionConfig,
    errors::SessionError,
    messages::{GameMessage, GameResponse},
};
use crate::{
    game::{GameEngine, GameError, Session},
    store::{SessionStore, StoreError},
};

/// Game actor handle for sending messages
#[derive(Clone)]
pub struct GameHandle {
    sender: mpsc::Sender<GameMessage>,
    game_id: Uuid,
    stopped: watch::Receiver<bool>,
}

impl GameHandle {
    /// Get game ID
    pub fn game_id(&self) -> Uuid {
        self.game_id
    }

    /// The actor has stopped accepting messages
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Both handles talk to the same actor
    pub fn same_actor(&self, other: &GameHandle) -> bool {
        self.sender.same_channel(&other.sender)
    }

    /// Send a message to the game. A message the actor can no longer accept
    /// is handed back so it can be re-routed.
    pub async fn send(&self, message: GameMessage) -> Result<(), GameMessage> {
        self.sender.send(message).await.map_err(|e| e.0)
    }

    /// Wait until the actor has handled its last message and exited.
    pub async fn stopped(&self) {
        let mut stopped = self.stopped.clone();
        // A dropped sender means the actor task is gone too.
        let _ = stopped.wait_for(|done| *done).await;
    }
}

/// Game actor owning one live session
pub struct GameActor {
    id: Uuid,
    session: Session,
    engine: GameEngine,
    store: Arc<dyn SessionStore>,
    inbox: mpsc::Receiver<GameMessage>,
    config: SessionConfig,
    stopped: watch::Sender<bool>,
    is_closed: bool,
}

impl GameActor {
    /// Create a new game actor for a session already present in the store
    ///
    /// # Returns
    ///
    /// * `(GameActor, GameHandle)` - Actor and handle for sending messages
    pub fn new(
        session: Session,
        engine: GameEngine,
        store: Arc<dyn SessionStore>,
        config: SessionConfig,
    ) -> (Self, GameHandle) {
        let (sender, inbox) = mpsc::channel(config.inbox_capacity);
        let (stopped_tx, stopped_rx) = watch::channel(false);
        let id = session.id;

        let actor = Self {
            id,
            session,
            engine,
            store,
            inbox,
            config,
            stopped: stopped_tx,
            is_closed: false,
        };
        let handle = GameHandle {
            sender,
            game_id: id,
            stopped: stopped_rx,
        };

        (actor, handle)
    }

    /// Run the game actor event loop
    pub async fn run(mut self) {
        log::debug!("Game {} actor starting", self.id);

        while !self.is_closed {
            match timeout(self.config.idle_timeout, self.inbox.recv()).await {
                Ok(Some(message)) => self.handle_message(message).await,
                Ok(None) => break,
                Err(_) => {
                    log::debug!("Game {} idle, stopping actor", self.id);
                    break;
                }
            }
        }

        // Refuse new messages, then answer everything already queued.
        self.inbox.close();
        while let Some(message) = self.inbox.recv().await {
            self.handle_message(message).await;
        }

        self.stopped.send_replace(true);
        log::debug!("Game {} actor stopped", self.id);
    }

    async fn handle_message(&mut self, message: GameMessage) {
        log::trace!("Game {}: {}", self.id, message.kind());
        match message {
            GameMessage::GetState { response } => {
                let _ = response.send(Ok(self.session.clone()));
            }

            GameMessage::TakeAction { action, response } => {
                let result = self
                    .commit(|engine, session| engine.apply_bet(session, action))
                    .await;
                let _ = response.send(result);
            }

            GameMessage::Draw { discard, response } => {
                let result = self
                    .commit(|engine, session| engine.apply_draw(session, &discard))
                    .await;
                let _ = response.send(result);
            }

            GameMessage::Close { response } => {
                self.is_closed = true;
                let _ = response.send(());
            }
        }
    }

    /// Run `op` on a copy of the session and persist it. The live session is
    /// only replaced once the store has accepted the write.
    async fn commit<F>(&mut self, op: F) -> GameResponse
    where
        F: FnOnce(&mut GameEngine, &mut Session) -> Result<(), GameError>,
    {
        let mut next = self.session.clone();
        op(&mut self.engine, &mut next)?;

        match self.store.update(&next).await {
            Ok(version) => {
                next.version = version;
                self.session = next;
                Ok(self.session.clone())
            }
            Err(err) => {
                if matches!(err, StoreError::Conflict { .. }) {
                    log::warn!("Game {}: {}; reloading from store", self.id, err);
                    self.reload().await;
                } else {
                    log::error!("Game {}: failed to persist session: {}", self.id, err);
                }
                Err(SessionError::from(err))
            }
        }
    }

    async fn reload(&mut self) {
        match self.store.get(self.id).await {
            Ok(session) => self.session = session,
            Err(e) => log::error!("Game {}: reload failed: {}", self.id, e),
        }
    }
}
