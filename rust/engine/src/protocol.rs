//! Dealer-to-player card distribution.
//!
//! Each card travels as a [`DealtCardEnvelope`]: the payload `{card_id, nonce}`
//! encrypted under the recipient's public key (RSA-OAEP/SHA-256), plus the
//! dealer's RSA-PSS/SHA-256 signature over `nonce || card_id`. Only the
//! recipient can read the card; the recipient can prove the dealer sent it.
//!
//! The dealer sees every card in plaintext before sealing it and chooses the
//! deck order. This scheme hides cards from other players and observers, not
//! from the dealer; no committed shuffle is performed.

use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cards::Card;
use crate::deck::Deck;
use crate::errors::{GameError, ProtocolError};
use crate::keys::{encrypt_for, verify_signature, KeyPrincipal, PublicKey};

/// Nonce length in bytes (128 bits).
pub const NONCE_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealtCardEnvelope {
    pub ciphertext: Vec<u8>,
    pub signature: Vec<u8>,
}

/// What a player keeps after opening an envelope. Disclosing it lets anyone
/// holding the dealer's public key confirm the dealer dealt this card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardReceipt {
    pub card: Card,
    pub nonce: Vec<u8>,
    pub signature: Vec<u8>,
}

#[derive(Serialize, Deserialize)]
struct CardPayload {
    card_id: u8,
    nonce: String,
}

/// The exact byte string the dealer signs.
fn signed_message(nonce: &[u8], card_id: u8) -> Vec<u8> {
    let mut msg = Vec::with_capacity(nonce.len() + 1);
    msg.extend_from_slice(nonce);
    msg.push(card_id);
    msg
}

/// Seals one card for one recipient.
pub fn seal_card(
    dealer_keys: &KeyPrincipal,
    recipient: &PublicKey,
    card: Card,
) -> Result<DealtCardEnvelope, ProtocolError> {
    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);
    let card_id = card.id();

    let signature = dealer_keys.sign(&signed_message(&nonce, card_id))?;
    let payload = serde_json::to_vec(&CardPayload {
        card_id,
        nonce: hex::encode(nonce),
    })
    .map_err(|e| ProtocolError::Encryption(e.to_string()))?;
    let ciphertext = encrypt_for(recipient, &payload)?;

    Ok(DealtCardEnvelope {
        ciphertext,
        signature,
    })
}

/// Opens an envelope addressed to `player_keys` and checks the dealer's
/// signature. Never returns a card whose signature did not verify.
pub fn open_envelope(
    player_keys: &KeyPrincipal,
    dealer_public: &PublicKey,
    envelope: &DealtCardEnvelope,
) -> Result<CardReceipt, ProtocolError> {
    let result = open_inner(player_keys, dealer_public, envelope);
    if let Err(e) = &result {
        warn!(error = %e, "rejected dealt card envelope");
    }
    result
}

fn open_inner(
    player_keys: &KeyPrincipal,
    dealer_public: &PublicKey,
    envelope: &DealtCardEnvelope,
) -> Result<CardReceipt, ProtocolError> {
    let plaintext = player_keys.decrypt(&envelope.ciphertext)?;
    let payload: CardPayload = serde_json::from_slice(&plaintext)
        .map_err(|e| ProtocolError::MalformedPayload(e.to_string()))?;
    let nonce =
        hex::decode(&payload.nonce).map_err(|e| ProtocolError::MalformedPayload(e.to_string()))?;
    if nonce.len() != NONCE_LEN {
        return Err(ProtocolError::MalformedPayload(format!(
            "nonce is {} bytes",
            nonce.len()
        )));
    }

    verify_signature(
        dealer_public,
        &signed_message(&nonce, payload.card_id),
        &envelope.signature,
    )?;
    let card = Card::from_id(payload.card_id).ok_or(ProtocolError::UnknownCardId(payload.card_id))?;

    Ok(CardReceipt {
        card,
        nonce,
        signature: envelope.signature.clone(),
    })
}

/// Checks a disclosed card against the dealer's signature.
pub fn verify_disclosure(dealer_public: &PublicKey, receipt: &CardReceipt) -> Result<(), ProtocolError> {
    verify_signature(
        dealer_public,
        &signed_message(&receipt.nonce, receipt.card.id()),
        &receipt.signature,
    )
}

/// The dealing party: its key pair and the deck it exclusively owns.
#[derive(Debug)]
pub struct Dealer {
    keys: KeyPrincipal,
    deck: Deck,
}

impl Dealer {
    pub fn new(keys: KeyPrincipal, deck: Deck) -> Self {
        Self { keys, deck }
    }

    pub fn public_key(&self) -> &PublicKey {
        self.keys.public_key()
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn replace_deck(&mut self, deck: Deck) {
        self.deck = deck;
    }

    /// Rebuilds and permutes the deck for a new hand.
    pub fn reset_deck(&mut self) {
        self.deck.reset();
    }

    /// Draws the top card and seals it for `recipient`. The card leaves the
    /// deck even if sealing fails, so no card is ever dealt twice.
    pub fn deal_card(&mut self, recipient: &PublicKey) -> Result<DealtCardEnvelope, GameError> {
        let card = self.deck.draw()?;
        let envelope = seal_card(&self.keys, recipient, card)?;
        debug!(
            ciphertext_len = envelope.ciphertext.len(),
            remaining = self.deck.remaining(),
            "sealed card envelope"
        );
        Ok(envelope)
    }

    /// Draws a face-up card (community cards need no sealing).
    pub fn draw_open(&mut self) -> Result<Card, GameError> {
        self.deck.draw()
    }
}
