//! Game actor message types.

use tokio::sync::oneshot;

use super::errors::SessionError;
use crate::game::{Action, Session};

/// Reply to every game request: the session as it stands after the request.
pub type GameResponse = Result<Session, SessionError>;

/// Messages that can be sent to a GameActor
#[derive(Debug)]
pub enum GameMessage {
    /// Read the current session
    GetState {
        response: oneshot::Sender<GameResponse>,
    },

    /// Seat betting action (call, raise, fold)
    TakeAction {
        action: Action,
        response: oneshot::Sender<GameResponse>,
    },

    /// Discard and replace the given hand positions
    Draw {
        discard: Vec<i64>,
        response: oneshot::Sender<GameResponse>,
    },

    /// Stop the actor once queued messages are handled
    Close { response: oneshot::Sender<()> },
}

impl GameMessage {
    /// Short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            GameMessage::GetState { .. } => "get_state",
            GameMessage::TakeAction { .. } => "take_action",
            GameMessage::Draw { .. } => "draw",
            GameMessage::Close { .. } => "close",
        }
    }
}
