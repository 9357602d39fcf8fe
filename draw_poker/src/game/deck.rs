use rand::{Rng, seq::SliceRandom};

use super::{
    constants::DECK_SIZE,
    entities::{Card, Rank, Suit},
    errors::GameError,
};

/// A 52-card deck dealt front to back without replacement.
#[derive(Clone, Debug)]
pub struct Deck {
    cards: Vec<Card>,
    pub deck_idx: usize,
}

impl Deck {
    /// A full deck in a uniformly random order.
    pub fn fresh<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::default();
        deck.shuffle(rng);
        deck
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
        self.deck_idx = 0;
    }

    /// Cards not yet dealt.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.cards.len() - self.deck_idx
    }

    pub fn deal(&mut self, count: usize) -> Result<Vec<Card>, GameError> {
        if count > self.remaining() {
            return Err(GameError::InsufficientCards {
                requested: count,
                available: self.remaining(),
            });
        }
        let dealt = self.cards[self.deck_idx..self.deck_idx + count].to_vec();
        self.deck_idx += count;
        Ok(dealt)
    }

    /// Deal `count` cards from the undealt pool, skipping any card in
    /// `excluded`. Skipped cards stay in the pool.
    ///
    /// Fails without consuming anything when the pool minus `excluded` is
    /// too small.
    pub fn deal_excluding(
        &mut self,
        excluded: &[Card],
        count: usize,
    ) -> Result<Vec<Card>, GameError> {
        let available = self.cards[self.deck_idx..]
            .iter()
            .filter(|card| !excluded.contains(card))
            .count();
        if count > available {
            return Err(GameError::InsufficientCards {
                requested: count,
                available,
            });
        }

        let undealt = self.cards.split_off(self.deck_idx);
        let mut dealt = Vec::with_capacity(count);
        let mut kept = Vec::with_capacity(undealt.len() - count);
        for card in undealt {
            if dealt.len() < count && !excluded.contains(&card) {
                dealt.push(card);
            } else {
                kept.push(card);
            }
        }

        // Dealt cards move in front of the cursor so `cards` stays a
        // permutation of the full deck.
        self.cards.extend_from_slice(&dealt);
        self.deck_idx = self.cards.len();
        self.cards.extend(kept);
        Ok(dealt)
    }
}

impl Default for Deck {
    /// An ordered (unshuffled) deck.
    fn default() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                cards.push(Card::new(rank, suit));
            }
        }
        Self { cards, deck_idx: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};
    use std::collections::HashSet;

    #[test]
    fn test_deck_initialization() {
        let deck = Deck::default();
        assert_eq!(deck.remaining(), 52);
        let unique: HashSet<Card> = deck.cards.iter().copied().collect();
        assert_eq!(unique.len(), 52);
    }

    #[test]
    fn test_fresh_deck_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        let deck = Deck::fresh(&mut rng);
        let unique: HashSet<Card> = deck.cards.iter().copied().collect();
        assert_eq!(unique.len(), 52);
        assert_eq!(deck.deck_idx, 0);
    }

    #[test]
    fn test_same_seed_same_order() {
        let a = Deck::fresh(&mut StdRng::seed_from_u64(42));
        let b = Deck::fresh(&mut StdRng::seed_from_u64(42));
        assert_eq!(a.cards, b.cards);
    }

    #[test]
    fn test_deal_advances_cursor() {
        let mut deck = Deck::default();
        let cards = deck.deal(5).unwrap();
        assert_eq!(cards.len(), 5);
        assert_eq!(deck.deck_idx, 5);
        assert_eq!(deck.remaining(), 47);
    }

    #[test]
    fn test_deal_too_many() {
        let mut deck = Deck::default();
        deck.deal(50).unwrap();
        let err = deck.deal(3).unwrap_err();
        assert_eq!(
            err,
            GameError::InsufficientCards {
                requested: 3,
                available: 2
            }
        );
        assert_eq!(deck.remaining(), 2);
    }

    #[test]
    fn test_deal_excluding_skips_excluded() {
        let mut deck = Deck::default();
        let excluded = deck.cards[..5].to_vec();
        let dealt = deck.deal_excluding(&excluded, 3).unwrap();
        assert_eq!(dealt.len(), 3);
        for card in &dealt {
            assert!(!excluded.contains(card));
        }
        // Excluded cards remain undealt.
        assert_eq!(deck.remaining(), 49);
        let unique: HashSet<Card> = deck.cards.iter().copied().collect();
        assert_eq!(unique.len(), 52);
    }

    #[test]
    fn test_deal_excluding_never_repeats() {
        let mut deck = Deck::fresh(&mut StdRng::seed_from_u64(3));
        let mut seen = HashSet::new();
        for _ in 0..10 {
            for card in deck.deal_excluding(&[], 5).unwrap() {
                assert!(seen.insert(card));
            }
        }
        assert_eq!(deck.remaining(), 2);
    }

    #[test]
    fn test_deal_excluding_insufficient_is_untouched() {
        let mut deck = Deck::default();
        deck.deal(47).unwrap();
        let excluded = deck.cards[47..49].to_vec();
        let err = deck.deal_excluding(&excluded, 4).unwrap_err();
        assert_eq!(
            err,
            GameError::InsufficientCards {
                requested: 4,
                available: 3
            }
        );
        assert_eq!(deck.remaining(), 5);
    }
}
