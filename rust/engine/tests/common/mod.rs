#![allow(dead_code)]

use fairdeal_engine::cards::{parse_cards, Card};
use fairdeal_engine::config::TableConfig;
use fairdeal_engine::deck::Deck;
use fairdeal_engine::engine::Table;
use fairdeal_engine::keys::KeyPrincipal;
use once_cell::sync::Lazy;

/// Smallest modulus the protocol accepts; generating keys dominates test time.
pub const TEST_KEY_BITS: usize = 1024;

/// Dealer key first, then one key per seat.
pub static KEYS: Lazy<Vec<KeyPrincipal>> = Lazy::new(|| {
    (0..5)
        .map(|_| KeyPrincipal::generate_with_bits(TEST_KEY_BITS).expect("keygen"))
        .collect()
});

pub fn dealer_keys() -> KeyPrincipal {
    KEYS[0].clone()
}

pub fn player_keys(n: usize) -> Vec<KeyPrincipal> {
    KEYS[1..=n].to_vec()
}

pub fn test_config() -> TableConfig {
    TableConfig {
        key_bits: TEST_KEY_BITS,
        seed: Some(7),
        ..TableConfig::default()
    }
}

pub fn table(n: usize) -> Table {
    table_with(test_config(), n)
}

pub fn table_with(config: TableConfig, n: usize) -> Table {
    Table::with_principals(config, dealer_keys(), player_keys(n)).expect("table")
}

/// A table whose deck deals `order` front to back.
pub fn stacked_table(n: usize, order: &str) -> Table {
    let mut t = table(n);
    let deck = Deck::stacked(cards(order)).expect("distinct cards");
    t.set_deck(deck).expect("between hands");
    t
}

pub fn cards(s: &str) -> Vec<Card> {
    parse_cards(s).expect("valid cards")
}

pub fn chips_in_play(t: &Table) -> u32 {
    t.players().iter().map(|p| p.chips()).sum::<u32>() + t.pot()
}
