use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Suit, SUITS};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Category {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
    RoyalFlush = 9,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::HighCard => "high card",
            Category::OnePair => "one pair",
            Category::TwoPair => "two pair",
            Category::ThreeOfAKind => "three of a kind",
            Category::Straight => "straight",
            Category::Flush => "flush",
            Category::FullHouse => "full house",
            Category::FourOfAKind => "four of a kind",
            Category::StraightFlush => "straight flush",
            Category::RoyalFlush => "royal flush",
        };
        f.write_str(name)
    }
}

/// A classified hand. Each variant carries the rank strengths (2..=14) that
/// break ties within its category, most significant first. A straight's
/// `high` is 5 for the wheel. Missing kickers (fewer than five cards) are 0.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum PokerHand {
    HighCard([u8; 5]),
    OnePair { pair: u8, kickers: [u8; 3] },
    TwoPair { high: u8, low: u8, kicker: u8 },
    ThreeOfAKind { trips: u8, kickers: [u8; 2] },
    Straight { high: u8 },
    Flush([u8; 5]),
    FullHouse { trips: u8, pair: u8 },
    FourOfAKind { quads: u8, kicker: u8 },
    StraightFlush { high: u8 },
    RoyalFlush,
}

impl PokerHand {
    pub fn category(&self) -> Category {
        match self {
            PokerHand::HighCard(_) => Category::HighCard,
            PokerHand::OnePair { .. } => Category::OnePair,
            PokerHand::TwoPair { .. } => Category::TwoPair,
            PokerHand::ThreeOfAKind { .. } => Category::ThreeOfAKind,
            PokerHand::Straight { .. } => Category::Straight,
            PokerHand::Flush(_) => Category::Flush,
            PokerHand::FullHouse { .. } => Category::FullHouse,
            PokerHand::FourOfAKind { .. } => Category::FourOfAKind,
            PokerHand::StraightFlush { .. } => Category::StraightFlush,
            PokerHand::RoyalFlush => Category::RoyalFlush,
        }
    }

    /// Tie-break key padded to five values.
    pub fn tiebreak(&self) -> [u8; 5] {
        match *self {
            PokerHand::HighCard(k) | PokerHand::Flush(k) => k,
            PokerHand::OnePair { pair, kickers } => [pair, kickers[0], kickers[1], kickers[2], 0],
            PokerHand::TwoPair { high, low, kicker } => [high, low, kicker, 0, 0],
            PokerHand::ThreeOfAKind { trips, kickers } => [trips, kickers[0], kickers[1], 0, 0],
            PokerHand::Straight { high } | PokerHand::StraightFlush { high } => [high, 0, 0, 0, 0],
            PokerHand::FullHouse { trips, pair } => [trips, pair, 0, 0, 0],
            PokerHand::FourOfAKind { quads, kicker } => [quads, kicker, 0, 0, 0],
            PokerHand::RoyalFlush => [14, 0, 0, 0, 0],
        }
    }

    /// Rank strengths of the cards that make the hand, in the order they are
    /// picked from the available cards.
    fn defining_ranks(&self) -> Vec<u8> {
        let run = |high: u8| -> Vec<u8> {
            if high == 5 {
                vec![5, 4, 3, 2, 14]
            } else {
                (high - 4..=high).rev().collect()
            }
        };
        match *self {
            PokerHand::HighCard(k) | PokerHand::Flush(k) => k.to_vec(),
            PokerHand::OnePair { pair, kickers } => {
                let mut v = vec![pair, pair];
                v.extend(kickers);
                v
            }
            PokerHand::TwoPair { high, low, kicker } => vec![high, high, low, low, kicker],
            PokerHand::ThreeOfAKind { trips, kickers } => {
                let mut v = vec![trips; 3];
                v.extend(kickers);
                v
            }
            PokerHand::Straight { high } | PokerHand::StraightFlush { high } => run(high),
            PokerHand::RoyalFlush => run(14),
            PokerHand::FullHouse { trips, pair } => vec![trips, trips, trips, pair, pair],
            PokerHand::FourOfAKind { quads, kicker } => vec![quads, quads, quads, quads, kicker],
        }
    }
}

impl Ord for PokerHand {
    fn cmp(&self, other: &Self) -> Ordering {
        self.category()
            .cmp(&other.category())
            .then_with(|| self.tiebreak().cmp(&other.tiebreak()))
    }
}

impl PartialOrd for PokerHand {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PokerHand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.category())
    }
}

/// A hand together with the cards that constitute it.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HandEvaluation {
    pub hand: PokerHand,
    pub cards: Vec<Card>,
}

/// Classifies the best five-card hand available among `cards`.
///
/// Pure and deterministic: the same set of cards always yields the same
/// hand regardless of order. Intended for 2 to 7 cards; with fewer than five
/// cards straights and flushes are impossible and absent kickers are 0.
pub fn evaluate(cards: &[Card]) -> PokerHand {
    let mut rank_counts = [0u8; 15]; // 2..14 used
    let mut suit_masks = [0u16; 4];
    let mut suit_counts = [0u8; 4];
    let mut rank_mask = 0u16;
    for c in cards {
        let r = c.rank.strength();
        rank_counts[r as usize] += 1;
        rank_mask |= 1 << r;
        let s = c.suit.index();
        suit_masks[s] |= 1 << r;
        suit_counts[s] += 1;
    }

    // Two flush suits need ten cards, so the first one found is the only one.
    let flush_suit = (0..4).find(|&s| suit_counts[s] >= 5);

    if let Some(s) = flush_suit {
        if let Some(high) = straight_high_from_mask(suit_masks[s]) {
            return if high == 14 {
                PokerHand::RoyalFlush
            } else {
                PokerHand::StraightFlush { high }
            };
        }
    }

    let by_count = |n: u8| -> Vec<u8> {
        (2..=14u8)
            .rev()
            .filter(|&r| rank_counts[r as usize] == n)
            .collect()
    };
    let quads = by_count(4);
    let trips = by_count(3);
    let pairs = by_count(2);

    if let Some(&q) = quads.first() {
        let k = kickers_excluding(&rank_counts, &[q], 1);
        return PokerHand::FourOfAKind {
            quads: q,
            kicker: k[0],
        };
    }

    if let Some(&t) = trips.first() {
        // A second triple can serve as the pair; take whichever pair is higher.
        let pair = trips
            .get(1)
            .copied()
            .into_iter()
            .chain(pairs.first().copied())
            .max();
        if let Some(p) = pair {
            return PokerHand::FullHouse { trips: t, pair: p };
        }
    }

    if let Some(s) = flush_suit {
        let mut k = [0u8; 5];
        let ranks = (2..=14u8).rev().filter(|&r| suit_masks[s] & (1 << r) != 0);
        for (slot, r) in k.iter_mut().zip(ranks) {
            *slot = r;
        }
        return PokerHand::Flush(k);
    }

    if let Some(high) = straight_high_from_mask(rank_mask) {
        return PokerHand::Straight { high };
    }

    if let Some(&t) = trips.first() {
        let k = kickers_excluding(&rank_counts, &[t], 2);
        return PokerHand::ThreeOfAKind {
            trips: t,
            kickers: [k[0], k[1]],
        };
    }

    if pairs.len() >= 2 {
        let (high, low) = (pairs[0], pairs[1]);
        // A third pair's rank is a legal kicker.
        let k = kickers_excluding(&rank_counts, &[high, low], 1);
        return PokerHand::TwoPair {
            high,
            low,
            kicker: k[0],
        };
    }

    if let Some(&p) = pairs.first() {
        let k = kickers_excluding(&rank_counts, &[p], 3);
        return PokerHand::OnePair {
            pair: p,
            kickers: [k[0], k[1], k[2]],
        };
    }

    let k = kickers_excluding(&rank_counts, &[], 5);
    PokerHand::HighCard([k[0], k[1], k[2], k[3], k[4]])
}

/// Like [`evaluate`], and also names the cards that make the hand.
pub fn evaluate_detailed(cards: &[Card]) -> HandEvaluation {
    let hand = evaluate(cards);
    let suit = match hand.category() {
        Category::Flush | Category::StraightFlush | Category::RoyalFlush => flush_suit_of(cards),
        _ => None,
    };
    let mut pool: Vec<Card> = cards.to_vec();
    // Deterministic choice among equal ranks.
    pool.sort_unstable_by(|a, b| b.cmp(a));
    let mut picked = Vec::with_capacity(5);
    for r in hand.defining_ranks() {
        if r == 0 {
            continue;
        }
        let pos = pool
            .iter()
            .position(|c| c.rank.strength() == r && suit.map_or(true, |s| c.suit == s));
        if let Some(i) = pos {
            picked.push(pool.remove(i));
        }
    }
    HandEvaluation {
        hand,
        cards: picked,
    }
}

pub fn compare_hands(a: &PokerHand, b: &PokerHand) -> Ordering {
    a.cmp(b)
}

/// The `n` highest ranks present other than `excluded`, padded with 0.
fn kickers_excluding(rank_counts: &[u8; 15], excluded: &[u8], n: usize) -> Vec<u8> {
    let mut v: Vec<u8> = (2..=14u8)
        .rev()
        .filter(|r| rank_counts[*r as usize] > 0 && !excluded.contains(r))
        .take(n)
        .collect();
    v.resize(n, 0);
    v
}

fn flush_suit_of(cards: &[Card]) -> Option<Suit> {
    SUITS
        .into_iter()
        .find(|s| cards.iter().filter(|c| c.suit == *s).count() >= 5)
}

fn straight_high_from_mask(mask: u16) -> Option<u8> {
    let mut m = mask;
    // Ace also plays low
    if (m & (1 << 14)) != 0 {
        m |= 1 << 1;
    }
    // Sliding 5-bit window from Ace(14) down to 5
    for high in (5..=14u8).rev() {
        let window = 0b11111u16 << (high - 4);
        if (m & window) == window {
            return Some(high);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;

    fn eval(s: &str) -> PokerHand {
        evaluate(&parse_cards(s).unwrap())
    }

    #[test]
    fn straight_mask_finds_highest_run() {
        let mask = (2..=9u16).fold(0u16, |m, r| m | (1 << r));
        assert_eq!(straight_high_from_mask(mask), Some(9));
        let wheel = (1u16 << 14) | (1 << 2) | (1 << 3) | (1 << 4) | (1 << 5);
        assert_eq!(straight_high_from_mask(wheel), Some(5));
        assert_eq!(straight_high_from_mask(0b1011110), None);
    }

    #[test]
    fn two_triples_make_the_best_full_house() {
        assert_eq!(
            eval("Kc Kd Kh 5c 5d 5h Qs"),
            PokerHand::FullHouse { trips: 13, pair: 5 }
        );
        assert_eq!(
            eval("Kc Kd Kh 5c 5d 5h Qs Qd"),
            PokerHand::FullHouse { trips: 13, pair: 12 }
        );
    }

    #[test]
    fn third_pair_can_be_the_kicker() {
        assert_eq!(
            eval("Ac Ad Kc Kd Qc Qd 2s"),
            PokerHand::TwoPair {
                high: 14,
                low: 13,
                kicker: 12
            }
        );
    }

    #[test]
    fn short_hands_pad_kickers_with_zero() {
        assert_eq!(
            eval("9c 9d"),
            PokerHand::OnePair {
                pair: 9,
                kickers: [0, 0, 0]
            }
        );
        assert_eq!(eval("Ac 2d"), PokerHand::HighCard([14, 2, 0, 0, 0]));
    }

    #[test]
    fn detailed_evaluation_names_the_cards() {
        let ev = evaluate_detailed(&parse_cards("Ah 2c 3d 4s 5h Kc Kd").unwrap());
        assert_eq!(ev.hand, PokerHand::Straight { high: 5 });
        let ranks: Vec<u8> = ev.cards.iter().map(|c| c.rank.strength()).collect();
        assert_eq!(ranks, vec![5, 4, 3, 2, 14]);

        let ev = evaluate_detailed(&parse_cards("2h 7h 9h Jh Kh Ah Ac").unwrap());
        assert_eq!(ev.hand.category(), Category::Flush);
        assert!(ev.cards.iter().all(|c| c.suit == Suit::Hearts));
        assert_eq!(ev.cards.len(), 5);
    }
}
