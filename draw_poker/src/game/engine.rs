//! The draw poker state machine.
//!
//! Every operation validates against a working copy of the session and only
//! writes it back once everything has succeeded, so a rejected request
//! leaves the caller's session exactly as it was.

use chrono::Utc;
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::{collections::HashSet, sync::Arc};
use uuid::Uuid;

use super::{
    GameSettings,
    deck::Deck,
    entities::{Action, Chips, Opponent, OpponentStatus, Phase, Seat, Session},
    errors::GameError,
    resolver::{OutcomeResolver, RandomResolver},
};

pub struct GameEngine {
    settings: Arc<GameSettings>,
    resolver: Arc<dyn OutcomeResolver>,
    rng: StdRng,
}

impl GameEngine {
    /// Engine seeded from the operating system.
    #[must_use]
    pub fn new(settings: GameSettings, resolver: Arc<dyn OutcomeResolver>) -> Self {
        Self {
            settings: Arc::new(settings),
            resolver,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Engine with default settings, the random resolver and a fixed seed.
    /// Shuffles, opponent stacks and outcomes are all reproducible.
    #[must_use]
    pub fn with_rng_seed(seed: u64) -> Self {
        Self {
            settings: Arc::new(GameSettings::default()),
            resolver: Arc::new(RandomResolver),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: GameSettings) -> Self {
        self.settings = Arc::new(settings);
        self
    }

    #[must_use]
    pub fn with_resolver(mut self, resolver: Arc<dyn OutcomeResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// A new engine sharing settings and resolver, with its own RNG seeded
    /// from this one.
    pub fn fork(&mut self) -> Self {
        Self {
            settings: Arc::clone(&self.settings),
            resolver: Arc::clone(&self.resolver),
            rng: StdRng::from_rng(&mut self.rng),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// Deal a new game: the seat gets a fresh hand and every opponent a
    /// random stack within the configured range.
    pub fn create_game(&mut self) -> Result<Session, GameError> {
        let mut deck = Deck::fresh(&mut self.rng);
        let cards = deck.deal(self.settings.hand_size)?;

        let chip_range = self.settings.opponent_chip_range();
        let opponents = self
            .settings
            .opponent_names
            .iter()
            .zip(1u32..)
            .map(|(name, id)| Opponent {
                id,
                name: name.clone(),
                chips: self.rng.random_range(chip_range.clone()),
                status: OpponentStatus::Active,
                card_count: self.settings.opponent_card_count,
                current_bet: 0,
            })
            .collect();

        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4(),
            phase: Phase::Betting,
            pot: 0,
            current_bet: self.settings.ante,
            winner: None,
            winning_hand: None,
            seat: Seat::new(self.settings.starting_chips, cards),
            opponents,
            created_at: now,
            updated_at: now,
            version: 0,
        };
        log::info!("Game {} created", session.id);
        Ok(session)
    }

    /// Apply a betting action from the seat.
    pub fn apply_bet(&mut self, session: &mut Session, action: Action) -> Result<(), GameError> {
        if session.phase != Phase::Betting {
            return Err(GameError::InvalidPhase {
                operation: "bet",
                phase: session.phase,
            });
        }

        let mut next = session.clone();
        match action {
            Action::Fold => {
                next.seat.fold();
                next.advance_to(Phase::Finished)?;
                self.resolve(&mut next)?;
            }
            Action::Call => {
                let amount = next.current_bet;
                next.seat.commit(amount)?;
                next.pot += amount;
                next.advance_to(Phase::Drawing)?;
            }
            Action::Raise(None) => return Err(GameError::MissingAmount),
            Action::Raise(Some(requested)) => {
                let amount = validate_raise(requested, next.seat.chips)?;
                next.seat.commit(amount)?;
                next.pot += amount;
                next.current_bet = next.current_bet.max(amount);
            }
        }

        next.touch();
        log::debug!("Game {}: seat {}", next.id, action);
        *session = next;
        Ok(())
    }

    /// Replace the cards at `discard` positions and finish the hand.
    ///
    /// Positions are replaced in ascending order from a freshly shuffled
    /// deck that excludes every card the seat currently holds. An empty
    /// discard list keeps the hand as is and still finishes the game.
    pub fn apply_draw(&mut self, session: &mut Session, discard: &[i64]) -> Result<(), GameError> {
        if session.phase != Phase::Drawing {
            return Err(GameError::InvalidPhase {
                operation: "draw",
                phase: session.phase,
            });
        }
        let positions = validate_discards(discard, session.seat.hand.len())?;

        let mut next = session.clone();
        let held = next.seat.cards();
        let mut deck = Deck::fresh(&mut self.rng);
        let replacements = deck.deal_excluding(&held, positions.len())?;
        for (position, card) in positions.iter().zip(replacements) {
            let slot = next
                .seat
                .hand
                .iter_mut()
                .find(|slot| slot.position == *position)
                .ok_or(GameError::InvalidIndex {
                    index: *position as i64,
                    hand_size: held.len(),
                })?;
            slot.card = card;
            slot.selected = false;
        }

        next.advance_to(Phase::Finished)?;
        self.resolve(&mut next)?;
        next.touch();
        log::debug!("Game {}: seat drew {} card(s)", next.id, positions.len());
        *session = next;
        Ok(())
    }

    fn resolve(&mut self, session: &mut Session) -> Result<(), GameError> {
        let outcome = self.resolver.resolve(session, &mut self.rng)?;
        log::info!(
            "Game {} finished: {} wins with {}",
            session.id,
            outcome.winner,
            outcome.hand_label
        );
        session.winner = Some(outcome.winner);
        session.winning_hand = Some(outcome.hand_label);
        Ok(())
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new(GameSettings::default(), Arc::new(RandomResolver))
    }
}

fn validate_raise(requested: i64, available: Chips) -> Result<Chips, GameError> {
    if requested <= 0 {
        return Err(GameError::InvalidAmount(requested));
    }
    match Chips::try_from(requested) {
        Ok(amount) if amount <= available => Ok(amount),
        _ => Err(GameError::InsufficientFunds {
            required: requested,
            available: i64::from(available),
        }),
    }
}

/// Check every discard position before anything is touched. Returns the
/// positions in ascending order.
fn validate_discards(discard: &[i64], hand_size: usize) -> Result<Vec<usize>, GameError> {
    let mut seen = HashSet::with_capacity(discard.len());
    for &index in discard {
        let position = usize::try_from(index)
            .ok()
            .filter(|&position| position < hand_size)
            .ok_or(GameError::InvalidIndex { index, hand_size })?;
        if !seen.insert(position) {
            return Err(GameError::DuplicateIndex(position));
        }
    }
    let mut positions: Vec<usize> = seen.into_iter().collect();
    positions.sort_unstable();
    Ok(positions)
}
