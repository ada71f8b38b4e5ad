use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::player::Player;

/// Game phases of a hand, strictly forward-only and terminal at showdown.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Hole cards dealt, blinds posted
    Preflop,
    /// Three community cards
    Flop,
    /// Fourth community card
    Turn,
    /// Fifth community card
    River,
    /// Remaining hands revealed
    Showdown,
}

impl Phase {
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Preflop => Some(Phase::Flop),
            Phase::Flop => Some(Phase::Turn),
            Phase::Turn => Some(Phase::River),
            Phase::River => Some(Phase::Showdown),
            Phase::Showdown => None,
        }
    }

    /// Community cards dealt on entering this phase.
    pub fn cards_dealt_on_entry(self) -> usize {
        match self {
            Phase::Flop => 3,
            Phase::Turn | Phase::River => 1,
            Phase::Preflop | Phase::Showdown => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Preflop => "preflop",
            Phase::Flop => "flop",
            Phase::Turn => "turn",
            Phase::River => "river",
            Phase::Showdown => "showdown",
        }
    }
}

/// Betting bookkeeping for the hand in progress. Mutated only by the table.
#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) pot: u32,
    pub(crate) current_bet: u32,
    /// Size of the last full raise increment on this street
    pub(crate) last_raise: u32,
    pub(crate) phase: Phase,
    pub(crate) button: usize,
    pub(crate) acted: BTreeSet<usize>,
    pub(crate) to_act: Option<usize>,
    pub(crate) in_progress: bool,
}

impl GameState {
    pub(crate) fn new() -> Self {
        Self {
            pot: 0,
            current_bet: 0,
            last_raise: 0,
            phase: Phase::Preflop,
            button: 0,
            acted: BTreeSet::new(),
            to_act: None,
            in_progress: false,
        }
    }

    pub fn pot(&self) -> u32 {
        self.pot
    }
    pub fn current_bet(&self) -> u32 {
        self.current_bet
    }
    pub fn last_raise(&self) -> u32 {
        self.last_raise
    }
    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn button(&self) -> usize {
        self.button
    }
    pub fn acted(&self) -> &BTreeSet<usize> {
        &self.acted
    }
    pub fn to_act(&self) -> Option<usize> {
        self.to_act
    }
    pub fn in_progress(&self) -> bool {
        self.in_progress
    }
}

/// One seat as the presentation layer may see it. Hole cards are present
/// only while the seat's `show_cards` flag is set.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct SeatView {
    pub seat: usize,
    pub name: String,
    pub chips: u32,
    pub bet: u32,
    pub total_bet: u32,
    pub folded: bool,
    pub all_in: bool,
    pub active: bool,
    pub show_cards: bool,
    pub cards_held: usize,
    pub hole_cards: Option<Vec<Card>>,
}

impl SeatView {
    pub fn of(player: &Player) -> Self {
        Self {
            seat: player.seat(),
            name: player.name().to_string(),
            chips: player.chips(),
            bet: player.bet(),
            total_bet: player.total_bet(),
            folded: player.is_folded(),
            all_in: player.is_all_in(),
            active: player.is_active(),
            show_cards: player.show_cards(),
            cards_held: player.hand().len(),
            hole_cards: player.show_cards().then(|| player.hand().to_vec()),
        }
    }
}

/// Read-only view of the table returned by `Table::current_state`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub phase: Phase,
    pub pot: u32,
    pub current_bet: u32,
    pub button: usize,
    pub to_act: Option<usize>,
    pub hand_in_progress: bool,
    pub players: Vec<SeatView>,
    pub community_cards: Vec<Card>,
}
