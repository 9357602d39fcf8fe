//! Per-engine game settings.

use serde::{Deserialize, Serialize};
use std::{collections::HashSet, ops::RangeInclusive};

use super::constants::{
    DEFAULT_ANTE, DEFAULT_OPPONENT_MAX_CHIPS, DEFAULT_OPPONENT_MIN_CHIPS, DEFAULT_OPPONENT_NAMES,
    DEFAULT_STARTING_CHIPS, HAND_SIZE, OPPONENT_CARD_COUNT,
};
use super::entities::{Chips, SEAT_WINNER_NAME};

/// Settings every new game is created from.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GameSettings {
    pub starting_chips: Chips,
    /// Table minimum bet; a fresh game's `current_bet`.
    pub ante: Chips,
    pub opponent_names: Vec<String>,
    pub opponent_min_chips: Chips,
    pub opponent_max_chips: Chips,
    pub hand_size: usize,
    pub opponent_card_count: u8,
}

impl GameSettings {
    #[must_use]
    pub fn new(starting_chips: Chips, ante: Chips) -> Self {
        Self {
            starting_chips,
            ante,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn opponent_chip_range(&self) -> RangeInclusive<Chips> {
        self.opponent_min_chips..=self.opponent_max_chips
    }

    /// Check the settings can produce a playable game.
    pub fn validate(&self) -> Result<(), String> {
        if self.ante == 0 {
            return Err("ante must be at least 1".to_string());
        }
        if self.opponent_names.is_empty() {
            return Err("at least one opponent is required".to_string());
        }
        if self.opponent_names.iter().any(|name| name.trim().is_empty()) {
            return Err("opponent names must not be blank".to_string());
        }
        // Winners are stored by name; the seat's name must stay unambiguous.
        if self.opponent_names.iter().any(|name| name == SEAT_WINNER_NAME) {
            return Err(format!("opponent name '{SEAT_WINNER_NAME}' is reserved"));
        }
        let mut seen = HashSet::with_capacity(self.opponent_names.len());
        if let Some(name) = self.opponent_names.iter().find(|name| !seen.insert(name.as_str())) {
            return Err(format!("opponent name '{name}' is used more than once"));
        }
        if self.opponent_min_chips > self.opponent_max_chips {
            return Err(format!(
                "opponent chip range {}..={} is inverted",
                self.opponent_min_chips, self.opponent_max_chips
            ));
        }
        if !(1..=HAND_SIZE).contains(&self.hand_size) {
            return Err(format!("hand size must be within 1..={HAND_SIZE}"));
        }
        Ok(())
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            starting_chips: DEFAULT_STARTING_CHIPS,
            ante: DEFAULT_ANTE,
            opponent_names: DEFAULT_OPPONENT_NAMES
                .iter()
                .map(ToString::to_string)
                .collect(),
            opponent_min_chips: DEFAULT_OPPONENT_MIN_CHIPS,
            opponent_max_chips: DEFAULT_OPPONENT_MAX_CHIPS,
            hand_size: HAND_SIZE,
            opponent_card_count: OPPONENT_CARD_COUNT,
        }
    }
}
