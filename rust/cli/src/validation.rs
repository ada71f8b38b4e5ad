//! Parsing of interactive input.

use std::str::FromStr;

use fairdeal_engine::player::PlayerAction;

/// Result of reading one line at the action prompt.
#[derive(Debug, PartialEq)]
pub enum ParseResult {
    /// Valid player action parsed from input
    Action(PlayerAction),
    /// User entered quit command (q or quit)
    Quit,
    /// Invalid input with error message
    Invalid(String),
}

/// Parse user input string into a PlayerAction or special commands.
///
/// Accepts, case-insensitively: `fold`/`f`, `check`/`x`, `call`/`c`,
/// `raise N`, `all_in`/`allin`/`all-in`, and `q`/`quit`.
///
/// # Example
///
/// ```rust
/// # use fairdeal_cli::validation::{parse_player_action, ParseResult};
/// use fairdeal_engine::player::PlayerAction;
///
/// assert_eq!(
///     parse_player_action("raise 40"),
///     ParseResult::Action(PlayerAction::Raise(40))
/// );
/// assert_eq!(parse_player_action("q"), ParseResult::Quit);
/// ```
pub fn parse_player_action(input: &str) -> ParseResult {
    let trimmed = input.trim();
    if trimmed.eq_ignore_ascii_case("q") || trimmed.eq_ignore_ascii_case("quit") {
        return ParseResult::Quit;
    }
    match PlayerAction::from_str(trimmed) {
        Ok(action) => ParseResult::Action(action),
        Err(msg) => ParseResult::Invalid(msg),
    }
}
