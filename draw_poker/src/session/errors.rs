//! Session layer error types.

use thiserror::Error;
use uuid::Uuid;

use crate::game::GameError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum SessionError {
    /// Rule violation reported by the engine
    #[error(transparent)]
    Game(#[from] GameError),

    #[error("Game {0} not found")]
    NotFound(Uuid),

    #[error("Store error: {0}")]
    Store(StoreError),

    /// The game's actor went away and could not be restarted
    #[error("Game {0} is unavailable")]
    ActorUnavailable(Uuid),
}

impl From<StoreError> for SessionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => SessionError::NotFound(id),
            other => SessionError::Store(other),
        }
    }
}

impl SessionError {
    /// Whether the request itself was at fault
    pub fn is_client_error(&self) -> bool {
        match self {
            SessionError::Game(e) => e.is_client_error(),
            SessionError::NotFound(_) => true,
            SessionError::Store(_) | SessionError::ActorUnavailable(_) => false,
        }
    }

    /// Lost an optimistic write race; the request can be retried
    pub fn is_conflict(&self) -> bool {
        matches!(self, SessionError::Store(StoreError::Conflict { .. }))
    }

    /// Get a client-safe error message that doesn't leak internal details
    pub fn client_message(&self) -> String {
        match self {
            SessionError::Game(e) => e.client_message(),
            SessionError::NotFound(_) => "Game not found".to_string(),
            SessionError::Store(e) => e.client_message(),
            SessionError::ActorUnavailable(_) => "Game is temporarily unavailable".to_string(),
        }
    }
}

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;
