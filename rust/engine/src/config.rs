use serde::{Deserialize, Serialize};

use crate::errors::GameError;
use crate::keys::{DEFAULT_KEY_BITS, MIN_KEY_BITS};
use crate::player::STARTING_STACK;

/// How large a raise increment must be.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinRaiseRule {
    /// At least the previous raise increment on this street (the big blind
    /// when nobody has raised yet).
    #[default]
    PreviousIncrement,
    /// At least the current bet-to-call.
    CurrentBet,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub small_blind: u32,
    pub big_blind: u32,
    pub starting_stack: u32,
    /// RSA modulus size for every generated key pair
    pub key_bits: usize,
    /// Deck seed; random when absent
    pub seed: Option<u64>,
    pub min_raise: MinRaiseRule,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            small_blind: 10,
            big_blind: 20,
            starting_stack: STARTING_STACK,
            key_bits: DEFAULT_KEY_BITS,
            seed: None,
            min_raise: MinRaiseRule::default(),
        }
    }
}

impl TableConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        if self.small_blind == 0 || self.big_blind == 0 {
            return Err(GameError::InvalidConfig("blinds must be > 0".into()));
        }
        if self.small_blind > self.big_blind {
            return Err(GameError::InvalidConfig(
                "small blind must not exceed big blind".into(),
            ));
        }
        if self.starting_stack == 0 {
            return Err(GameError::InvalidConfig(
                "starting_stack must be > 0".into(),
            ));
        }
        if self.key_bits < MIN_KEY_BITS {
            return Err(GameError::InvalidConfig(format!(
                "key_bits must be >= {}",
                MIN_KEY_BITS
            )));
        }
        Ok(())
    }
}
