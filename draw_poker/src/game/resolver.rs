//! Showdown outcome resolution.
//!
//! Hands are not actually ranked here. The engine only depends on the
//! [`OutcomeResolver`] trait, so a real five-card evaluator can replace
//! [`RandomResolver`] without touching the state machine.

use rand::{RngCore, seq::IndexedRandom};

use super::{
    entities::{Session, Winner},
    errors::GameError,
};

/// Hand names a resolver may report, strongest first.
pub const HAND_LABELS: [&str; 11] = [
    "Royal Flush",
    "Straight Flush",
    "Four of a Kind",
    "Full House",
    "Flush",
    "Straight",
    "Three of a Kind",
    "Two Pair",
    "Pair of Aces",
    "Pair of Kings",
    "High Card",
];

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Outcome {
    pub winner: Winner,
    pub hand_label: String,
}

pub trait OutcomeResolver: Send + Sync {
    /// Pick the winner of a finished hand.
    ///
    /// Implementations must never name the seat once it has folded.
    fn resolve(&self, session: &Session, rng: &mut dyn RngCore) -> Result<Outcome, GameError>;
}

/// Everyone who can still take the pot: the seat unless it folded, plus
/// every active opponent.
#[must_use]
pub fn eligible_candidates(session: &Session) -> Vec<Winner> {
    let mut candidates = Vec::with_capacity(session.opponents.len() + 1);
    if !session.seat.has_folded {
        candidates.push(Winner::Seat);
    }
    candidates.extend(
        session
            .active_opponents()
            .into_iter()
            .map(|o| Winner::Opponent(o.name.clone())),
    );
    candidates
}

/// Uniform winner over the eligible candidates with an independently drawn
/// hand label.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomResolver;

impl OutcomeResolver for RandomResolver {
    fn resolve(&self, session: &Session, rng: &mut dyn RngCore) -> Result<Outcome, GameError> {
        let candidates = eligible_candidates(session);
        let winner = candidates
            .choose(rng)
            .cloned()
            .ok_or(GameError::NoEligibleWinner)?;
        let hand_label = HAND_LABELS
            .choose(rng)
            .map(ToString::to_string)
            .ok_or(GameError::NoEligibleWinner)?;
        Ok(Outcome { winner, hand_label })
    }
}

/// Always reports the same outcome, as long as that winner is eligible.
#[derive(Clone, Debug)]
pub struct FixedResolver {
    winner: Winner,
    hand_label: String,
}

impl FixedResolver {
    #[must_use]
    pub fn new(winner: Winner, hand_label: &str) -> Self {
        Self {
            winner,
            hand_label: hand_label.to_string(),
        }
    }
}

impl OutcomeResolver for FixedResolver {
    fn resolve(&self, session: &Session, _rng: &mut dyn RngCore) -> Result<Outcome, GameError> {
        if !eligible_candidates(session).contains(&self.winner) {
            return Err(GameError::NoEligibleWinner);
        }
        Ok(Outcome {
            winner: self.winner.clone(),
            hand_label: self.hand_label.clone(),
        })
    }
}
