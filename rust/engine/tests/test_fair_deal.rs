mod common;

use std::collections::HashSet;

use common::{dealer_keys, player_keys, table};
use fairdeal_engine::cards::CATALOG;
use fairdeal_engine::deck::Deck;
use fairdeal_engine::errors::{GameError, ProtocolError};
use fairdeal_engine::protocol::{open_envelope, seal_card, verify_disclosure, Dealer};

#[test]
fn every_catalog_card_survives_the_round_trip() {
    let dealer = dealer_keys();
    let player = &player_keys(1)[0];
    for card in CATALOG {
        let env = seal_card(&dealer, player.public_key(), card).unwrap();
        let receipt = open_envelope(player, dealer.public_key(), &env).unwrap();
        assert_eq!(receipt.card, card);
        assert!(verify_disclosure(dealer.public_key(), &receipt).is_ok());
    }
}

#[test]
fn every_flipped_ciphertext_bit_is_rejected() {
    let dealer = dealer_keys();
    let player = &player_keys(1)[0];
    let env = seal_card(&dealer, player.public_key(), CATALOG[12]).unwrap();
    for bit in 0..env.ciphertext.len() * 8 {
        let mut tampered = env.clone();
        tampered.ciphertext[bit / 8] ^= 1 << (bit % 8);
        let err = open_envelope(player, dealer.public_key(), &tampered).unwrap_err();
        assert!(err.is_verification_failure(), "bit {}: {:?}", bit, err);
    }
}

#[test]
fn every_flipped_signature_bit_is_rejected() {
    let dealer = dealer_keys();
    let player = &player_keys(1)[0];
    let env = seal_card(&dealer, player.public_key(), CATALOG[40]).unwrap();
    for bit in 0..env.signature.len() * 8 {
        let mut tampered = env.clone();
        tampered.signature[bit / 8] ^= 1 << (bit % 8);
        assert_eq!(
            open_envelope(player, dealer.public_key(), &tampered),
            Err(ProtocolError::SignatureMismatch),
            "bit {}",
            bit
        );
    }
}

#[test]
fn envelope_for_someone_else_does_not_open() {
    let dealer = dealer_keys();
    let keys = player_keys(2);
    let env = seal_card(&dealer, keys[0].public_key(), CATALOG[0]).unwrap();
    assert_eq!(
        open_envelope(&keys[1], dealer.public_key(), &env),
        Err(ProtocolError::Decryption)
    );
}

#[test]
fn signature_from_an_impostor_is_rejected() {
    let dealer = dealer_keys();
    let keys = player_keys(2);
    let impostor = &keys[1];
    let env = seal_card(impostor, keys[0].public_key(), CATALOG[3]).unwrap();
    assert_eq!(
        open_envelope(&keys[0], dealer.public_key(), &env),
        Err(ProtocolError::SignatureMismatch)
    );
}

#[test]
fn nonces_differ_between_envelopes_of_the_same_card() {
    let dealer = dealer_keys();
    let player = &player_keys(1)[0];
    let a = seal_card(&dealer, player.public_key(), CATALOG[8]).unwrap();
    let b = seal_card(&dealer, player.public_key(), CATALOG[8]).unwrap();
    assert_ne!(a.ciphertext, b.ciphertext);
    let ra = open_envelope(player, dealer.public_key(), &a).unwrap();
    let rb = open_envelope(player, dealer.public_key(), &b).unwrap();
    assert_ne!(ra.nonce, rb.nonce);
}

#[test]
fn dealer_never_deals_a_card_twice() {
    let player = &player_keys(1)[0];
    let mut dealer = Dealer::new(dealer_keys(), Deck::new_with_seed(11));
    dealer.reset_deck();
    let mut seen = HashSet::new();
    for _ in 0..52 {
        let env = dealer.deal_card(player.public_key()).unwrap();
        let receipt = open_envelope(player, dealer.public_key(), &env).unwrap();
        assert!(seen.insert(receipt.card), "duplicate {}", receipt.card);
    }
    assert_eq!(
        dealer.deal_card(player.public_key()),
        Err(GameError::DeckExhausted)
    );
}

#[test]
fn forged_disclosure_fails_verification() {
    let dealer = dealer_keys();
    let player = &player_keys(1)[0];
    let env = seal_card(&dealer, player.public_key(), CATALOG[20]).unwrap();
    let mut receipt = open_envelope(player, dealer.public_key(), &env).unwrap();
    receipt.card = CATALOG[51];
    assert_eq!(
        verify_disclosure(dealer.public_key(), &receipt),
        Err(ProtocolError::SignatureMismatch)
    );
}

#[test]
fn table_transcript_matches_what_players_hold() {
    let mut t = table(3);
    t.start_hand().unwrap();
    assert_eq!(t.transcript().len(), 6);
    assert_eq!(t.deck_remaining(), 46);
    let keys = player_keys(3);
    for rec in t.transcript() {
        let receipt = open_envelope(&keys[rec.seat], t.dealer_public_key(), &rec.envelope).unwrap();
        assert!(t.player(rec.seat).unwrap().hand().contains(&receipt.card));
    }
    let all: HashSet<_> = t.players().iter().flat_map(|p| p.hand().to_vec()).collect();
    assert_eq!(all.len(), 6);
}
