//! Game engine error types.

use thiserror::Error;

use super::entities::Phase;

/// Errors raised by the deck, resolver and engine.
///
/// Everything except [`GameError::InvalidTransition`] and
/// [`GameError::NoEligibleWinner`] is caused by the caller and can be
/// corrected by sending a different request.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum GameError {
    #[error("can't {operation} during the {phase} phase")]
    InvalidPhase {
        operation: &'static str,
        phase: Phase,
    },
    #[error("need {required} chips, only {available} available")]
    InsufficientFunds { required: i64, available: i64 },
    #[error("raise requires an amount")]
    MissingAmount,
    #[error("invalid amount {0}: must be at least 1")]
    InvalidAmount(i64),
    #[error("discard index {index} out of range 0..{hand_size}")]
    InvalidIndex { index: i64, hand_size: usize },
    #[error("discard index {0} listed more than once")]
    DuplicateIndex(usize),
    #[error("deck has {available} cards left, {requested} requested")]
    InsufficientCards { requested: usize, available: usize },
    #[error("no eligible winner")]
    NoEligibleWinner,
    #[error("invalid game state: {from} can't advance to {to}")]
    InvalidTransition { from: Phase, to: Phase },
}

impl GameError {
    /// Whether the caller caused the error (as opposed to a broken invariant).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            GameError::InvalidTransition { .. } | GameError::NoEligibleWinner
        )
    }

    /// A message that is safe to hand back to a client.
    #[must_use]
    pub fn client_message(&self) -> String {
        if self.is_client_error() {
            self.to_string()
        } else {
            "Internal server error".to_string()
        }
    }
}
