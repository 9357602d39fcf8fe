//! Table defaults.

use super::entities::Chips;

/// Chips the seat starts every game with.
pub const DEFAULT_STARTING_CHIPS: Chips = 1000;

/// Table ante, the outstanding bet a fresh game asks the seat to call.
pub const DEFAULT_ANTE: Chips = 10;

/// Inclusive bounds for an opponent's starting stack.
pub const DEFAULT_OPPONENT_MIN_CHIPS: Chips = 800;
pub const DEFAULT_OPPONENT_MAX_CHIPS: Chips = 1200;

pub const DEFAULT_OPPONENT_NAMES: [&str; 3] = ["Computer 1", "Computer 2", "Computer 3"];

pub const HAND_SIZE: usize = 5;
pub const DECK_SIZE: usize = 52;

/// Decorative card count shown for each opponent.
pub const OPPONENT_CARD_COUNT: u8 = 5;
