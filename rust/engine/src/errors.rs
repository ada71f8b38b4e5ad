use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("Illegal action: {reason}")]
    IllegalAction { reason: String },
    #[error("Insufficient chips: need {needed}, have {available}")]
    InsufficientChips { needed: u32, available: u32 },
    #[error("Invalid raise amount: {amount}, minimum: {minimum}")]
    InvalidRaise { amount: u32, minimum: u32 },
    #[error("Deck exhausted")]
    DeckExhausted,
    #[error("Player already folded")]
    PlayerFolded,
    #[error("Player is not active in this hand")]
    PlayerInactive,
    #[error("Player is all-in and cannot act")]
    PlayerAllIn,
    #[error("It's not player {actual}'s turn (expected player {expected})")]
    NotPlayersTurn { expected: usize, actual: usize },
    #[error("No seat {0} at this table")]
    UnknownSeat(usize),
    #[error("No hand in progress")]
    NoHandInProgress,
    #[error("Betting round still in progress")]
    RoundInProgress,
    #[error("Hand already complete")]
    HandAlreadyComplete,
    #[error("Not enough players with chips to start a hand ({active})")]
    NotEnoughPlayers { active: usize },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// Failures of the card distribution protocol.
///
/// Decryption, payload and signature failures all mean the envelope cannot be
/// trusted; see [`ProtocolError::is_verification_failure`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Key generation failed: {0}")]
    KeyGeneration(String),
    #[error("Key size {bits} is below the minimum of {minimum} bits")]
    WrongKeySize { bits: usize, minimum: usize },
    #[error("Encryption failed: {0}")]
    Encryption(String),
    #[error("Signing failed: {0}")]
    Signing(String),
    #[error("Envelope could not be decrypted")]
    Decryption,
    #[error("Envelope payload is malformed: {0}")]
    MalformedPayload(String),
    #[error("Envelope names unknown card id {0}")]
    UnknownCardId(u8),
    #[error("Dealer signature does not verify")]
    SignatureMismatch,
}

impl ProtocolError {
    /// True when the envelope itself was rejected: a corrupted channel or a
    /// dishonest dealer. Retrying cannot fix these.
    pub fn is_verification_failure(&self) -> bool {
        matches!(
            self,
            ProtocolError::Decryption
                | ProtocolError::MalformedPayload(_)
                | ProtocolError::UnknownCardId(_)
                | ProtocolError::SignatureMismatch
        )
    }
}

impl GameError {
    pub fn illegal(reason: impl Into<String>) -> Self {
        GameError::IllegalAction {
            reason: reason.into(),
        }
    }
}
