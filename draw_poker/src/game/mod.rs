//! Five-card draw game logic.
//!
//! - [`entities`]: cards, seat, opponents and the [`Session`] aggregate
//! - [`deck`]: shuffled 52-card deck with exclusion-aware dealing
//! - [`resolver`]: pluggable showdown outcome
//! - [`engine`]: the phase state machine (betting -> drawing -> finished)

pub mod constants;
pub mod deck;
pub mod engine;
pub mod entities;
pub mod errors;
pub mod resolver;
pub mod settings;

pub use engine::GameEngine;
pub use entities::{Action, Card, GameView, Phase, Session, Winner};
pub use errors::GameError;
pub use resolver::{FixedResolver, Outcome, OutcomeResolver, RandomResolver};
pub use settings::GameSettings;
