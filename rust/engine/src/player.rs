use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cards::Card;
use crate::errors::GameError;
use crate::keys::{KeyPrincipal, PublicKey};
use crate::protocol::{open_envelope, CardReceipt, DealtCardEnvelope};

/// Represents a player action during a betting round.
/// Only a raise carries an amount: the increment above the current bet.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerAction {
    /// Fold and forfeit the hand
    Fold,
    /// Check (only valid when already matching the current bet)
    Check,
    /// Call the current bet
    Call,
    /// Raise the current bet by the given increment
    Raise(u32),
    /// Commit every remaining chip
    AllIn,
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerAction::Fold => f.write_str("fold"),
            PlayerAction::Check => f.write_str("check"),
            PlayerAction::Call => f.write_str("call"),
            PlayerAction::Raise(amount) => write!(f, "raise {}", amount),
            PlayerAction::AllIn => f.write_str("all_in"),
        }
    }
}

impl FromStr for PlayerAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let parts: Vec<&str> = lower.split_whitespace().collect();
        match parts.as_slice() {
            ["fold"] | ["f"] => Ok(PlayerAction::Fold),
            ["check"] | ["x"] => Ok(PlayerAction::Check),
            ["call"] | ["c"] => Ok(PlayerAction::Call),
            ["all_in"] | ["allin"] | ["all-in"] => Ok(PlayerAction::AllIn),
            ["raise", amount] => match amount.parse::<u32>() {
                Ok(v) if v > 0 => Ok(PlayerAction::Raise(v)),
                Ok(_) => Err("Raise amount must be positive".to_string()),
                Err(_) => Err(format!("Invalid raise amount '{}'", amount)),
            },
            ["raise"] => Err("Raise requires an amount (e.g., 'raise 40')".to_string()),
            [] => Err("Empty input".to_string()),
            _ => Err(format!(
                "Unrecognized action '{}'. Valid actions: fold, check, call, raise <amount>, all_in",
                s.trim()
            )),
        }
    }
}

/// Default starting stack size for each player in chips
pub const STARTING_STACK: u32 = 1_000;

/// A seat at the table: chips, betting state, hole cards and the seat's own
/// key pair used to open dealt envelopes.
#[derive(Debug, Clone)]
pub struct Player {
    seat: usize,
    name: String,
    chips: u32,
    /// Chips committed on the current street
    bet: u32,
    /// Chips committed over the whole hand
    total_bet: u32,
    hand: Vec<Card>,
    receipts: Vec<CardReceipt>,
    folded: bool,
    all_in: bool,
    active: bool,
    show_cards: bool,
    keys: KeyPrincipal,
}

impl Player {
    pub fn new(seat: usize, name: impl Into<String>, chips: u32, keys: KeyPrincipal) -> Self {
        Self {
            seat,
            name: name.into(),
            chips,
            bet: 0,
            total_bet: 0,
            hand: Vec::with_capacity(2),
            receipts: Vec::with_capacity(2),
            folded: false,
            all_in: false,
            active: true,
            show_cards: false,
            keys,
        }
    }

    pub fn seat(&self) -> usize {
        self.seat
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn chips(&self) -> u32 {
        self.chips
    }
    pub fn bet(&self) -> u32 {
        self.bet
    }
    pub fn total_bet(&self) -> u32 {
        self.total_bet
    }
    pub fn hand(&self) -> &[Card] {
        &self.hand
    }
    pub fn receipts(&self) -> &[CardReceipt] {
        &self.receipts
    }
    pub fn is_folded(&self) -> bool {
        self.folded
    }
    pub fn is_all_in(&self) -> bool {
        self.all_in
    }
    pub fn is_active(&self) -> bool {
        self.active
    }
    pub fn show_cards(&self) -> bool {
        self.show_cards
    }
    pub fn set_show_cards(&mut self, show: bool) {
        self.show_cards = show;
    }
    pub fn public_key(&self) -> &PublicKey {
        self.keys.public_key()
    }

    /// Still contesting the pot.
    pub fn in_hand(&self) -> bool {
        self.active && !self.folded
    }

    /// Still able to make betting decisions.
    pub fn can_act(&self) -> bool {
        self.in_hand() && !self.all_in
    }

    /// Clears per-hand state. Seats without chips sit the hand out.
    pub fn reset_hand(&mut self) {
        self.hand.clear();
        self.receipts.clear();
        self.bet = 0;
        self.total_bet = 0;
        self.folded = false;
        self.all_in = false;
        self.active = self.chips > 0;
        self.show_cards = false;
    }

    pub fn reset_street(&mut self) {
        self.bet = 0;
    }

    /// Opens a dealt envelope with this seat's private key, verifies the
    /// dealer's signature and takes the card into the hand.
    pub fn receive_card(
        &mut self,
        dealer_public: &PublicKey,
        envelope: &DealtCardEnvelope,
    ) -> Result<Card, GameError> {
        if self.hand.len() >= 2 {
            return Err(GameError::illegal("hole cards already full"));
        }
        let receipt = open_envelope(&self.keys, dealer_public, envelope)?;
        debug!(
            seat = self.seat,
            ciphertext_len = envelope.ciphertext.len(),
            "opened dealt card envelope"
        );
        let card = receipt.card;
        self.hand.push(card);
        self.receipts.push(receipt);
        Ok(card)
    }

    /// Moves chips from the stack into the pot. Never clamps: committing
    /// more than the stack is an error.
    pub fn commit(&mut self, amount: u32) -> Result<(), GameError> {
        if amount > self.chips {
            return Err(GameError::InsufficientChips {
                needed: amount,
                available: self.chips,
            });
        }
        self.chips -= amount;
        self.bet += amount;
        self.total_bet += amount;
        if self.chips == 0 {
            self.all_in = true;
        }
        Ok(())
    }

    pub fn fold(&mut self) {
        self.folded = true;
        self.show_cards = false;
    }

    pub fn add_chips(&mut self, amount: u32) {
        self.chips = self.chips.saturating_add(amount);
    }

    #[cfg(test)]
    pub(crate) fn receipts_mut(&mut self) -> &mut Vec<CardReceipt> {
        &mut self.receipts
    }
}
