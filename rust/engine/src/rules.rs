use crate::errors::GameError;
use crate::player::PlayerAction as A;

/// The figures an action is judged against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BettingContext {
    /// Player's remaining chip stack
    pub stack: u32,
    /// Chips the player already committed on this street
    pub street_bet: u32,
    /// Table-wide bet-to-call on this street
    pub current_bet: u32,
    /// Smallest legal raise increment
    pub min_raise: u32,
}

impl BettingContext {
    pub fn to_call(&self) -> u32 {
        self.current_bet.saturating_sub(self.street_bet)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatedAction {
    Fold,
    Check,
    Call(u32),
    /// `commit` chips leave the stack; the table bet becomes `new_bet`
    Raise { commit: u32, new_bet: u32 },
    /// The whole stack; `new_bet` is the player's resulting street bet
    AllIn { commit: u32, new_bet: u32 },
}

impl ValidatedAction {
    pub fn commit(&self) -> u32 {
        match self {
            ValidatedAction::Fold | ValidatedAction::Check => 0,
            ValidatedAction::Call(c) => *c,
            ValidatedAction::Raise { commit, .. } | ValidatedAction::AllIn { commit, .. } => *commit,
        }
    }
}

/// Validates a player action according to betting rules and stack size.
///
/// Unlike a forgiving table, nothing is converted behind the caller's back:
/// a call or raise the stack cannot cover fails with
/// [`GameError::InsufficientChips`] and the caller decides whether to go
/// all-in instead.
///
/// # Errors
///
/// - [`GameError::IllegalAction`] - check while facing a bet, all-in with no chips
/// - [`GameError::InvalidRaise`] - raise increment below the minimum (or zero)
/// - [`GameError::InsufficientChips`] - call or raise exceeds the stack, or
///   the stack cannot meet the minimum raise
///
/// # Examples
///
/// ```
/// use fairdeal_engine::rules::{validate_action, BettingContext, ValidatedAction};
/// use fairdeal_engine::player::PlayerAction;
/// use fairdeal_engine::errors::GameError;
///
/// let ctx = BettingContext { stack: 1000, street_bet: 10, current_bet: 20, min_raise: 20 };
/// assert_eq!(validate_action(&ctx, PlayerAction::Call), Ok(ValidatedAction::Call(10)));
/// assert_eq!(
///     validate_action(&ctx, PlayerAction::Raise(40)),
///     Ok(ValidatedAction::Raise { commit: 50, new_bet: 60 })
/// );
/// assert!(matches!(
///     validate_action(&ctx, PlayerAction::Raise(5)),
///     Err(GameError::InvalidRaise { amount: 5, minimum: 20 })
/// ));
/// ```
pub fn validate_action(ctx: &BettingContext, action: A) -> Result<ValidatedAction, GameError> {
    let to_call = ctx.to_call();
    match action {
        A::Fold => Ok(ValidatedAction::Fold),
        A::Check => {
            if to_call == 0 {
                Ok(ValidatedAction::Check)
            } else {
                Err(GameError::illegal(format!(
                    "cannot check facing {} to call",
                    to_call
                )))
            }
        }
        A::Call => {
            if to_call > ctx.stack {
                Err(GameError::InsufficientChips {
                    needed: to_call,
                    available: ctx.stack,
                })
            } else {
                Ok(ValidatedAction::Call(to_call))
            }
        }
        A::Raise(amount) => {
            let minimum = ctx.min_raise.max(1);
            if amount < minimum {
                let cheapest = to_call.saturating_add(minimum);
                return if cheapest > ctx.stack {
                    // Only all-in remains legal.
                    Err(GameError::InsufficientChips {
                        needed: cheapest,
                        available: ctx.stack,
                    })
                } else {
                    Err(GameError::InvalidRaise { amount, minimum })
                };
            }
            let needed = to_call.saturating_add(amount);
            if needed > ctx.stack {
                return Err(GameError::InsufficientChips {
                    needed,
                    available: ctx.stack,
                });
            }
            Ok(ValidatedAction::Raise {
                commit: needed,
                new_bet: ctx.current_bet + amount,
            })
        }
        A::AllIn => {
            if ctx.stack == 0 {
                return Err(GameError::illegal("no chips left to commit"));
            }
            Ok(ValidatedAction::AllIn {
                commit: ctx.stack,
                new_bet: ctx.street_bet + ctx.stack,
            })
        }
    }
}
