use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::game::Phase;
use crate::hand::PokerHand;
use crate::player::PlayerAction;

/// Records a single accepted player action.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub seat: usize,
    /// The phase when this action occurred
    pub phase: Phase,
    pub action: PlayerAction,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct BlindPost {
    pub seat: usize,
    pub amount: u32,
}

/// Chips paid out of the pot to one seat.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Payout {
    pub seat: usize,
    pub amount: u32,
    /// The winning hand; absent when the pot was uncontested
    pub hand: Option<PokerHand>,
}

/// Chips handed back because no other seat could match them.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct Refund {
    pub seat: usize,
    pub amount: u32,
}

/// Information about how the pot was settled.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ShowdownInfo {
    pub payouts: Vec<Payout>,
    #[serde(default)]
    pub refund: Option<Refund>,
    /// e.g. "uncontested", "split pot"
    #[serde(default)]
    pub notes: Option<String>,
}

/// In-memory record of one hand: blinds, every accepted action, the board
/// and the settlement. Dealt hole cards are deliberately not part of it.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HandRecord {
    pub hand_number: u32,
    /// Deck seed, when the table runs seeded
    pub seed: Option<u64>,
    pub button: usize,
    pub blinds: Vec<BlindPost>,
    pub actions: Vec<ActionRecord>,
    pub board: Vec<Card>,
    #[serde(default)]
    pub showdown: Option<ShowdownInfo>,
}

impl HandRecord {
    pub fn new(hand_number: u32, seed: Option<u64>, button: usize) -> Self {
        Self {
            hand_number,
            seed,
            button,
            blinds: Vec::new(),
            actions: Vec::new(),
            board: Vec::new(),
            showdown: None,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
