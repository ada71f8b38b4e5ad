//! Hand evaluation command.
//!
//! Classifies the best five-card hand among the given cards and, with
//! `--against`, compares it with a second hand.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::io::Write;

use fairdeal_engine::cards::{parse_cards, Card};
use fairdeal_engine::hand::{evaluate_detailed, HandEvaluation};

use crate::error::CliError;
use crate::ui;

pub fn handle_eval_command(
    cards: &[String],
    against: Option<&str>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let first = parse_hand(&cards.join(" "))?;
    let a = evaluate_detailed(&first);
    write_evaluation(out, "Hand", &a)?;

    let Some(other) = against else {
        return Ok(());
    };
    let second = parse_hand(other)?;
    let b = evaluate_detailed(&second);
    write_evaluation(out, "Against", &b)?;
    let verdict = match a.hand.cmp(&b.hand) {
        Ordering::Greater => "first hand wins",
        Ordering::Less => "second hand wins",
        Ordering::Equal => "tie",
    };
    writeln!(out, "Result: {}", verdict)?;
    Ok(())
}

fn parse_hand(text: &str) -> Result<Vec<Card>, CliError> {
    let cards = parse_cards(text)?;
    if cards.is_empty() || cards.len() > 7 {
        return Err(CliError::InvalidInput(format!(
            "expected 1 to 7 cards, got {}",
            cards.len()
        )));
    }
    let unique: HashSet<Card> = cards.iter().copied().collect();
    if unique.len() != cards.len() {
        return Err(CliError::InvalidInput("duplicate card".to_string()));
    }
    Ok(cards)
}

fn write_evaluation(out: &mut dyn Write, label: &str, eval: &HandEvaluation) -> std::io::Result<()> {
    writeln!(
        out,
        "{}: {} [{}]",
        label,
        eval.hand,
        ui::format_cards(&eval.cards)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(cards: &[&str], against: Option<&str>) -> Result<String, CliError> {
        let cards: Vec<String> = cards.iter().map(|s| s.to_string()).collect();
        let mut out = Vec::new();
        handle_eval_command(&cards, against, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn classifies_a_seven_card_hand() {
        let out = run(&["As Ks", "Qs Js Ts", "2c 3d"], None).unwrap();
        assert!(out.starts_with("Hand: royal flush"), "{}", out);
    }

    #[test]
    fn compares_two_hands() {
        let out = run(&["2c 2d 2h 3c 3d"], Some("As Ah Ks Kh Qs")).unwrap();
        assert!(out.contains("Result: first hand wins"), "{}", out);
    }

    #[test]
    fn rejects_duplicates_and_garbage() {
        assert!(matches!(
            run(&["As As"], None),
            Err(CliError::InvalidInput(_))
        ));
        assert!(matches!(run(&["Zz"], None), Err(CliError::InvalidInput(_))));
    }
}
