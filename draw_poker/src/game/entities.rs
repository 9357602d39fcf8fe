use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

use super::errors::GameError;

/// Type alias for whole chips.
pub type Chips = u32;

/// Type alias for hand slots (0-based).
pub type Position = usize;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Hearts => "hearts",
            Self::Diamonds => "diamonds",
            Self::Clubs => "clubs",
            Self::Spades => "spades",
        };
        write!(f, "{repr}")
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Rank {
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "J")]
    Jack,
    #[serde(rename = "Q")]
    Queen,
    #[serde(rename = "K")]
    King,
    #[serde(rename = "A")]
    Ace,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Two => "2",
            Self::Three => "3",
            Self::Four => "4",
            Self::Five => "5",
            Self::Six => "6",
            Self::Seven => "7",
            Self::Eight => "8",
            Self::Nine => "9",
            Self::Ten => "10",
            Self::Jack => "J",
            Self::Queen => "Q",
            Self::King => "K",
            Self::Ace => "A",
        };
        write!(f, "{repr}")
    }
}

/// A card is a (rank, suit) pair. Two cards are the same card iff both
/// components match.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    #[must_use]
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} of {}", self.rank, self.suit)
    }
}

/// A card sitting in one of the seat's hand slots.
///
/// `selected` is a client-side discard marker only. The engine never reads
/// it; discards are always explicit positions.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct HandCard {
    pub card: Card,
    pub position: Position,
    pub selected: bool,
}

/// The human player's seat.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Seat {
    pub chips: Chips,
    pub has_folded: bool,
    pub current_bet: Chips,
    pub hand: Vec<HandCard>,
}

impl Seat {
    #[must_use]
    pub fn new(chips: Chips, cards: Vec<Card>) -> Self {
        let hand = cards
            .into_iter()
            .enumerate()
            .map(|(position, card)| HandCard {
                card,
                position,
                selected: false,
            })
            .collect();
        Self {
            chips,
            has_folded: false,
            current_bet: 0,
            hand,
        }
    }

    /// The cards currently held, in position order.
    #[must_use]
    pub fn cards(&self) -> Vec<Card> {
        self.hand.iter().map(|slot| slot.card).collect()
    }

    /// Move `amount` chips from the stack into the seat's bet for the round.
    pub fn commit(&mut self, amount: Chips) -> Result<(), GameError> {
        if self.chips < amount {
            return Err(GameError::InsufficientFunds {
                required: i64::from(amount),
                available: i64::from(self.chips),
            });
        }
        self.chips -= amount;
        self.current_bet = amount;
        Ok(())
    }

    pub fn fold(&mut self) {
        self.has_folded = true;
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OpponentStatus {
    Active,
    Folded,
    AllIn,
}

impl fmt::Display for OpponentStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Active => "active",
            Self::Folded => "folded",
            Self::AllIn => "all_in",
        };
        write!(f, "{repr}")
    }
}

/// A computer-controlled opponent. Opponents never act; their fields are
/// scorekeeping only and their cards are never modeled.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Opponent {
    pub id: u32,
    pub name: String,
    pub chips: Chips,
    pub status: OpponentStatus,
    pub card_count: u8,
    pub current_bet: Chips,
}

impl Opponent {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == OpponentStatus::Active
    }
}

/// Session lifecycle. Phases only ever move forward.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Betting,
    Drawing,
    Showdown,
    Finished,
}

impl Phase {
    #[must_use]
    pub fn can_advance_to(self, next: Phase) -> bool {
        next > self
    }

    #[must_use]
    pub fn is_finished(self) -> bool {
        self == Phase::Finished
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Betting => "betting",
            Self::Drawing => "drawing",
            Self::Showdown => "showdown",
            Self::Finished => "finished",
        };
        write!(f, "{repr}")
    }
}

/// Who took the hand.
///
/// Serialized as a plain string: `"player"` for the seat, otherwise the
/// opponent's name.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Winner {
    Seat,
    Opponent(String),
}

pub const SEAT_WINNER_NAME: &str = "player";

impl Winner {
    #[must_use]
    pub fn is_seat(&self) -> bool {
        matches!(self, Winner::Seat)
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Seat => write!(f, "{SEAT_WINNER_NAME}"),
            Self::Opponent(name) => write!(f, "{name}"),
        }
    }
}

impl From<&str> for Winner {
    fn from(value: &str) -> Self {
        if value == SEAT_WINNER_NAME {
            Self::Seat
        } else {
            Self::Opponent(value.to_string())
        }
    }
}

impl Serialize for Winner {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Winner {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s.as_str()))
    }
}

/// A betting action from the seat.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Action {
    Call,
    Fold,
    /// Raw requested amount; validated by the engine.
    Raise(Option<i64>),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Call => write!(f, "calls"),
            Self::Fold => write!(f, "folds"),
            Self::Raise(Some(amount)) => write!(f, "raises {amount}"),
            Self::Raise(None) => write!(f, "raises"),
        }
    }
}

/// Advisory action availability. Always derived from the phase, never
/// stored, so it can't drift from what the engine actually accepts.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ActionFlags {
    pub can_call: bool,
    pub can_raise: bool,
    pub can_fold: bool,
}

impl From<Phase> for ActionFlags {
    fn from(phase: Phase) -> Self {
        let betting = phase == Phase::Betting;
        Self {
            can_call: betting,
            can_raise: betting,
            can_fold: betting,
        }
    }
}

/// The aggregate root: one seat, its opponents, and the table state.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Session {
    pub id: Uuid,
    pub phase: Phase,
    pub pot: Chips,
    pub current_bet: Chips,
    pub winner: Option<Winner>,
    pub winning_hand: Option<String>,
    pub seat: Seat,
    pub opponents: Vec<Opponent>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Optimistic concurrency counter owned by the session store.
    #[serde(default)]
    pub version: u64,
}

impl Session {
    /// Move to a later phase. Going backwards (or standing still) is an
    /// internal invariant violation.
    pub fn advance_to(&mut self, next: Phase) -> Result<(), GameError> {
        if !self.phase.can_advance_to(next) {
            return Err(GameError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        log::debug!("Game {}: {} -> {}", self.id, self.phase, next);
        self.phase = next;
        Ok(())
    }

    #[must_use]
    pub fn action_flags(&self) -> ActionFlags {
        self.phase.into()
    }

    #[must_use]
    pub fn active_opponents(&self) -> Vec<&Opponent> {
        self.opponents.iter().filter(|o| o.is_active()).collect()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// External projection used by the HTTP layer.
    #[must_use]
    pub fn view(&self) -> GameView {
        let flags = self.action_flags();
        let mut hand: Vec<&HandCard> = self.seat.hand.iter().collect();
        hand.sort_by_key(|slot| slot.position);
        GameView {
            game_id: self.id,
            phase: self.phase,
            pot: self.pot,
            player_hand: hand
                .into_iter()
                .map(|slot| CardView {
                    suit: slot.card.suit,
                    rank: slot.card.rank,
                    selected: slot.selected,
                })
                .collect(),
            player_chips: self.seat.chips,
            opponents: self
                .opponents
                .iter()
                .map(|o| OpponentView {
                    id: o.id,
                    name: o.name.clone(),
                    status: o.status,
                    chips: o.chips,
                    card_count: o.card_count,
                })
                .collect(),
            winner: self.winner.clone(),
            winning_hand: self.winning_hand.clone(),
            can_call: flags.can_call,
            can_raise: flags.can_raise,
            can_fold: flags.can_fold,
            current_bet: self.current_bet,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct CardView {
    pub suit: Suit,
    pub rank: Rank,
    pub selected: bool,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpponentView {
    pub id: u32,
    pub name: String,
    pub status: OpponentStatus,
    pub chips: Chips,
    pub card_count: u8,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    pub game_id: Uuid,
    pub phase: Phase,
    pub pot: Chips,
    pub player_hand: Vec<CardView>,
    pub player_chips: Chips,
    pub opponents: Vec<OpponentView>,
    pub winner: Option<Winner>,
    pub winning_hand: Option<String>,
    pub can_call: bool,
    pub can_raise: bool,
    pub can_fold: bool,
    pub current_bet: Chips,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
