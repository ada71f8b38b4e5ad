use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Represents one of the four suits in a standard 52-card deck.
/// The declaration order is the catalog order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Suit {
    /// Clubs suit (♣)
    Clubs,
    /// Diamonds suit (♦)
    Diamonds,
    /// Hearts suit (♥)
    Hearts,
    /// Spades suit (♠)
    Spades,
}

impl Suit {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn symbol(self) -> char {
        match self {
            Suit::Clubs => '♣',
            Suit::Diamonds => '♦',
            Suit::Hearts => '♥',
            Suit::Spades => '♠',
        }
    }
}

/// Represents the rank (face value) of a playing card from Two through Ace.
/// The discriminant is the rank strength used by hand evaluation.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Rank {
    /// Rank 2
    Two = 2,
    /// Rank 3
    Three,
    /// Rank 4
    Four,
    /// Rank 5
    Five,
    /// Rank 6
    Six,
    /// Rank 7
    Seven,
    /// Rank 8
    Eight,
    /// Rank 9
    Nine,
    /// Rank 10
    Ten,
    /// Jack (11)
    Jack,
    /// Queen (12)
    Queen,
    /// King (13)
    King,
    /// Ace (14)
    Ace,
}

impl Rank {
    pub fn strength(self) -> u8 {
        self as u8
    }

    pub fn from_strength(v: u8) -> Option<Rank> {
        match v {
            2..=14 => Some(RANKS[(v - 2) as usize]),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }
}

pub const SUITS: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

pub const RANKS: [Rank; 13] = [
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

/// Represents a single playing card with a suit and rank.
///
/// Cards are plain values. Whether a card may be shown is decided by the
/// owning seat's `show_cards` flag, not by the card.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Card {
    /// The suit of the card (Clubs, Diamonds, Hearts, or Spades)
    pub suit: Suit,
    /// The rank of the card (Two through Ace)
    pub rank: Rank,
}

/// Every card in catalog order: the card with id `i` is `CATALOG[i]`.
pub const CATALOG: [Card; 52] = build_catalog();

const fn build_catalog() -> [Card; 52] {
    let mut out = [Card {
        suit: Suit::Clubs,
        rank: Rank::Two,
    }; 52];
    let mut i = 0;
    while i < 52 {
        out[i] = Card {
            suit: SUITS[i / 13],
            rank: RANKS[i % 13],
        };
        i += 1;
    }
    out
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { suit, rank }
    }

    /// Stable catalog identifier in `0..52`; this is the wire form of a card.
    pub fn id(&self) -> u8 {
        (self.suit.index() * 13 + (self.rank.strength() as usize - 2)) as u8
    }

    pub fn from_id(id: u8) -> Option<Card> {
        CATALOG.get(id as usize).copied()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.symbol(), self.suit.symbol())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid card '{0}'")]
pub struct ParseCardError(pub String);

impl FromStr for Card {
    type Err = ParseCardError;

    /// Accepts `As`, `Th`, `10h` and the symbol forms `A♠`, `10♥`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || ParseCardError(s.to_string());
        let suit_char = s.chars().last().ok_or_else(err)?;
        let rank_part = &s[..s.len() - suit_char.len_utf8()];
        let suit = match suit_char {
            'c' | 'C' | '♣' => Suit::Clubs,
            'd' | 'D' | '♦' => Suit::Diamonds,
            'h' | 'H' | '♥' => Suit::Hearts,
            's' | 'S' | '♠' => Suit::Spades,
            _ => return Err(err()),
        };
        let rank = match rank_part.to_ascii_uppercase().as_str() {
            "2" => Rank::Two,
            "3" => Rank::Three,
            "4" => Rank::Four,
            "5" => Rank::Five,
            "6" => Rank::Six,
            "7" => Rank::Seven,
            "8" => Rank::Eight,
            "9" => Rank::Nine,
            "10" | "T" => Rank::Ten,
            "J" => Rank::Jack,
            "Q" => Rank::Queen,
            "K" => Rank::King,
            "A" => Rank::Ace,
            _ => return Err(err()),
        };
        Ok(Card { suit, rank })
    }
}

/// Parses a whitespace or comma separated list of cards.
pub fn parse_cards(s: &str) -> Result<Vec<Card>, ParseCardError> {
    s.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .map(str::parse)
        .collect()
}

pub fn full_deck() -> Vec<Card> {
    CATALOG.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_ids_are_dense_and_stable() {
        for (i, card) in CATALOG.iter().enumerate() {
            assert_eq!(card.id() as usize, i);
            assert_eq!(Card::from_id(i as u8), Some(*card));
        }
        assert_eq!(Card::from_id(52), None);
        let unique: HashSet<Card> = CATALOG.iter().copied().collect();
        assert_eq!(unique.len(), 52);
    }

    #[test]
    fn catalog_order_is_suit_major() {
        assert_eq!(CATALOG[0], Card::new(Rank::Two, Suit::Clubs));
        assert_eq!(CATALOG[12], Card::new(Rank::Ace, Suit::Clubs));
        assert_eq!(CATALOG[51], Card::new(Rank::Ace, Suit::Spades));
    }

    #[test]
    fn parses_ascii_and_symbol_forms() {
        assert_eq!("As".parse(), Ok(Card::new(Rank::Ace, Suit::Spades)));
        assert_eq!("Th".parse(), Ok(Card::new(Rank::Ten, Suit::Hearts)));
        assert_eq!("10♥".parse(), Ok(Card::new(Rank::Ten, Suit::Hearts)));
        assert_eq!("2♣".parse(), Ok(Card::new(Rank::Two, Suit::Clubs)));
        assert!("1x".parse::<Card>().is_err());
        assert!("".parse::<Card>().is_err());
    }

    #[test]
    fn display_round_trips_through_parse() {
        for card in CATALOG {
            assert_eq!(card.to_string().parse::<Card>(), Ok(card));
        }
    }

    #[test]
    fn parse_cards_splits_lists() {
        let cards = parse_cards("As, Kd 10c").unwrap();
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[2], Card::new(Rank::Ten, Suit::Clubs));
    }
}
