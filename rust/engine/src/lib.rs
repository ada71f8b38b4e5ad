//! # fairdeal-engine: Texas Hold'em core with cryptographic card distribution
//!
//! Every hole card leaves the dealer as an envelope only its recipient can
//! open, signed so the recipient can prove where it came from. Around that
//! sits a complete single-table betting engine.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card catalog (52 cards, stable ids 0..=51), parsing and display
//! - [`deck`] - Seeded ChaCha20 deck the dealer draws from
//! - [`keys`] - RSA key pairs: sign, decrypt, encrypt-for, verify
//! - [`protocol`] - Sealing and opening dealt-card envelopes
//! - [`hand`] - Best five-of-seven hand evaluation and comparison
//! - [`player`] - Seat state, actions and chip accounting
//! - [`rules`] - Pure betting validation
//! - [`game`] - Phases, betting bookkeeping and redacted snapshots
//! - [`engine`] - The [`engine::Table`] state machine
//! - [`history`] - In-memory record of a hand
//! - [`config`] - Table configuration
//! - [`errors`] - Error types
//!
//! ## Quick Start
//!
//! ```rust
//! use fairdeal_engine::cards::parse_cards;
//! use fairdeal_engine::hand::{evaluate, Category};
//!
//! let cards = parse_cards("Ah Kh Qh Jh Th 2c 3d").unwrap();
//! assert_eq!(evaluate(&cards).category(), Category::RoyalFlush);
//! ```
//!
//! ## Dealing a card
//!
//! ```rust,no_run
//! use fairdeal_engine::cards::{Card, Rank, Suit};
//! use fairdeal_engine::keys::KeyPrincipal;
//! use fairdeal_engine::protocol::{open_envelope, seal_card};
//!
//! let dealer = KeyPrincipal::generate().unwrap();
//! let player = KeyPrincipal::generate().unwrap();
//! let card = Card::new(Rank::Ace, Suit::Spades);
//!
//! let envelope = seal_card(&dealer, player.public_key(), card).unwrap();
//! let receipt = open_envelope(&player, dealer.public_key(), &envelope).unwrap();
//! assert_eq!(receipt.card, card);
//! ```

pub mod cards;
pub mod config;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod game;
pub mod hand;
pub mod history;
pub mod keys;
pub mod player;
pub mod protocol;
pub mod rules;
