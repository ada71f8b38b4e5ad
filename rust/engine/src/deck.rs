use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::cards::{full_deck, Card};
use crate::errors::GameError;

/// The dealer's deck. Cards are drawn from the top; nothing drawn is ever
/// returned to the deck until [`Deck::reset`].
#[derive(Debug)]
pub struct Deck {
    cards: Vec<Card>,
    rng: ChaCha20Rng,
    /// Fixed draw order restored on every reset instead of shuffling
    stacked: Option<Vec<Card>>,
}

impl Deck {
    pub fn new_with_seed(seed: u64) -> Self {
        let rng = ChaCha20Rng::seed_from_u64(seed);
        // Keep initial order until reset is called explicitly
        Self {
            cards: full_deck(),
            rng,
            stacked: None,
        }
    }

    /// A deck that deals `order` front to back after every reset, for
    /// replaying a known deal. Cards not listed follow in catalog order.
    /// Fails if `order` names a card more than once.
    pub fn stacked(order: Vec<Card>) -> Result<Self, GameError> {
        let mut seen = HashSet::with_capacity(order.len());
        if let Some(dup) = order.iter().find(|c| !seen.insert(c.id())) {
            return Err(GameError::InvalidConfig(format!(
                "card {} appears twice in the stacked order",
                dup
            )));
        }
        let mut cards: Vec<Card> = full_deck()
            .into_iter()
            .filter(|c| !order.contains(c))
            .collect();
        cards.extend(order.into_iter().rev());
        let mut deck = Self::new_with_seed(0);
        deck.cards = cards.clone();
        deck.stacked = Some(cards);
        Ok(deck)
    }

    pub fn new(seed: Option<u64>) -> Self {
        Self::new_with_seed(seed.unwrap_or_else(rand::random))
    }

    /// Rebuilds all 52 cards and permutes them.
    pub fn reset(&mut self) {
        if let Some(order) = &self.stacked {
            self.cards = order.clone();
            return;
        }
        self.cards = full_deck();
        self.cards.shuffle(&mut self.rng);
    }

    pub fn draw(&mut self) -> Result<Card, GameError> {
        self.cards.pop().ok_or(GameError::DeckExhausted)
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
