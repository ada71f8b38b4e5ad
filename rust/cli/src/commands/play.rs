//! # Play Command
//!
//! Hot-seat play at a single table: whichever seat is to act types its
//! action on stdin. Streets advance automatically once a betting round is
//! complete and the pot is settled at the end of every hand.
//!
//! Input is re-prompted after an invalid or rejected action; `q`, `quit` or
//! end of input stops the session without error.

use std::io::{BufRead, Write};

use fairdeal_engine::config::TableConfig;
use fairdeal_engine::engine::Table;
use fairdeal_engine::errors::GameError;
use fairdeal_engine::game::Phase;
use fairdeal_engine::history::Payout;

use crate::error::CliError;
use crate::ui;
use crate::validation::{ParseResult, parse_player_action};

pub fn handle_play_command(
    players: usize,
    hands: Option<u32>,
    config: TableConfig,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<(), CliError> {
    let hands = hands.unwrap_or(1);
    if hands == 0 {
        return Err(CliError::InvalidInput("hands must be >= 1".to_string()));
    }

    writeln!(
        out,
        "play: players={} hands={} blinds={}/{}",
        players, hands, config.small_blind, config.big_blind
    )?;
    let mut table = Table::new(config, players)?;

    let mut played = 0u32;
    for i in 1..=hands {
        match table.start_hand() {
            Ok(()) => {}
            Err(GameError::NotEnoughPlayers { active }) => {
                writeln!(out, "Only {} player(s) with chips left.", active)?;
                break;
            }
            Err(e) => return Err(e.into()),
        }
        writeln!(out, "Hand {} (button: seat {})", i, table.state().button() + 1)?;
        if !play_hand(&mut table, out, err, stdin)? {
            writeln!(out, "Quit requested.")?;
            break;
        }
        played += 1;
    }

    for p in table.players() {
        writeln!(out, "Seat {}: {} chips", p.seat() + 1, p.chips())?;
    }
    writeln!(out, "Session complete: {} hand(s) played", played)?;
    Ok(())
}

/// Runs one hand to settlement. Returns `false` when the user quit.
fn play_hand(
    table: &mut Table,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<bool, CliError> {
    loop {
        let survivors = table.players().iter().filter(|p| p.in_hand()).count();
        if survivors <= 1 || table.phase() == Phase::Showdown {
            let payouts = table.award_pot()?;
            if let Some(refund) = table
                .record()
                .and_then(|r| r.showdown.as_ref())
                .and_then(|s| s.refund)
            {
                writeln!(
                    out,
                    "Seat {} takes back {} uncalled",
                    refund.seat + 1,
                    refund.amount
                )?;
            }
            write_payouts(out, &payouts)?;
            return Ok(true);
        }

        let Some(seat) = table.to_act() else {
            let phase = table.advance_phase()?;
            writeln!(
                out,
                "{}: {}",
                phase.as_str(),
                ui::format_cards(table.community_cards())
            )?;
            if phase == Phase::Showdown {
                for p in table.players().iter().filter(|p| p.in_hand()) {
                    writeln!(
                        out,
                        "Seat {} shows {} ({})",
                        p.seat() + 1,
                        ui::format_cards(p.hand()),
                        table.best_hand(p.seat())?
                    )?;
                }
            }
            continue;
        };

        let player = table.player(seat)?;
        let to_call = table.state().current_bet().saturating_sub(player.bet());
        write!(
            out,
            "Seat {} [{}] chips={} to_call={} pot={}> ",
            seat + 1,
            ui::format_cards(player.hand()),
            player.chips(),
            to_call,
            table.pot()
        )?;
        out.flush()?;

        let Some(line) = read_stdin_line(stdin) else {
            return Ok(false);
        };
        match parse_player_action(&line) {
            ParseResult::Action(action) => match table.apply_action(seat, action) {
                Ok(()) => writeln!(out, "Seat {}: {}", seat + 1, action)?,
                Err(e) => ui::write_error(err, &format!("Invalid action: {}", e))?,
            },
            ParseResult::Quit => return Ok(false),
            ParseResult::Invalid(msg) => ui::write_error(err, &msg)?,
        }
    }
}

fn write_payouts(out: &mut dyn Write, payouts: &[Payout]) -> std::io::Result<()> {
    for p in payouts {
        match &p.hand {
            Some(hand) => writeln!(out, "Seat {} wins {} with {}", p.seat + 1, p.amount, hand)?,
            None => writeln!(out, "Seat {} wins {} uncontested", p.seat + 1, p.amount)?,
        }
    }
    Ok(())
}

/// Next trimmed input line; `None` on end of input or a read error.
fn read_stdin_line(stdin: &mut dyn BufRead) -> Option<String> {
    let mut line = String::new();
    match stdin.read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn config() -> TableConfig {
        TableConfig {
            key_bits: 1024,
            seed: Some(42),
            ..TableConfig::default()
        }
    }

    fn play(input: &str, hands: Option<u32>) -> (Result<(), CliError>, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let mut stdin = Cursor::new(input.as_bytes().to_vec());
        let result = handle_play_command(2, hands, config(), &mut out, &mut err, &mut stdin);
        (
            result,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn fold_ends_the_hand_uncontested() {
        let (result, out, _) = play("fold\n", Some(1));
        assert!(result.is_ok());
        assert!(out.contains("Seat 2: fold"), "{}", out);
        assert!(out.contains("Seat 1 wins 30 uncontested"), "{}", out);
        assert!(out.contains("Session complete: 1 hand(s) played"));
    }

    #[test]
    fn checking_down_reaches_showdown() {
        let input = "call\ncheck\n".to_string() + &"check\n".repeat(6);
        let (result, out, _) = play(&input, Some(1));
        assert!(result.is_ok());
        assert!(out.contains("flop: "));
        assert!(out.contains("showdown: "));
        assert!(out.contains(" shows "));
        assert!(out.contains(" wins "));
    }

    #[test]
    fn invalid_input_reprompts() {
        let (result, out, err) = play("bet 10\ncheck\nq\n", Some(1));
        assert!(result.is_ok());
        assert!(err.contains("Unrecognized action"));
        assert!(err.contains("Invalid action"));
        assert!(out.contains("Quit requested."));
    }

    #[test]
    fn end_of_input_quits_gracefully() {
        let (result, out, _) = play("", Some(3));
        assert!(result.is_ok());
        assert!(out.contains("Session complete: 0 hand(s) played"));
    }

    #[test]
    fn zero_hands_is_rejected() {
        let (result, out, _) = play("", Some(0));
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
        assert!(out.is_empty());
    }
}
