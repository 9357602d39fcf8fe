//! # Draw Poker
//!
//! A single-player five-card draw poker engine. One seat plays a hand against
//! computer opponents: the seat calls, raises or folds, optionally discards and
//! redraws, and a pluggable resolver names the winner.
//!
//! ## Architecture
//!
//! A hand moves through three phases and never goes back:
//!
//! - **Betting**: the seat may call (moves on), raise (stays) or fold (ends the hand)
//! - **Drawing**: the seat discards any subset of positions and is dealt replacements
//! - **Finished**: winner and hand label are set; the session is read-only
//!
//! ## Core Modules
//!
//! - [`game`]: entities, deck, outcome resolver and the phase engine
//! - [`store`]: version-checked session persistence (in-memory or PostgreSQL)
//! - [`session`]: one actor per live game, so same-game requests never race
//! - [`db`]: PostgreSQL connection pooling
//!
//! ## Example
//!
//! ```
//! use draw_poker::{Action, GameEngine, Phase};
//!
//! let mut engine = GameEngine::with_rng_seed(42);
//! let mut game = engine.create_game().unwrap();
//! engine.apply_bet(&mut game, Action::Call).unwrap();
//! engine.apply_draw(&mut game, &[0, 2]).unwrap();
//! assert_eq!(game.phase, Phase::Finished);
//! ```

/// Core game logic, entities, and state machine.
pub mod game;
pub use game::{
    Action, GameEngine, GameError, GameSettings, GameView, Phase, Session, Winner,
    constants::{self, DEFAULT_ANTE, DEFAULT_STARTING_CHIPS, HAND_SIZE},
    entities,
};

/// Database connection management.
pub mod db;

/// Session persistence.
pub mod store;
pub use store::{InMemorySessionStore, PgSessionStore, SessionStore, StoreError};

/// Per-game actors and their manager.
pub mod session;
pub use session::{GameManager, SessionConfig, SessionError};
