//! Command-line argument definitions.

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "fairdeal",
    version,
    about = "Texas Hold'em with signed, encrypted card distribution"
)]
pub struct FairdealCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Deal one round of sealed hole cards and open them seat by seat
    Deal {
        #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(2..=10))]
        players: u8,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        key_bits: Option<usize>,
        /// Corrupt the first envelope to demonstrate rejection
        #[arg(long)]
        tamper: bool,
        /// Print the dealer's public key
        #[arg(long)]
        pem: bool,
    },
    /// Classify a hand, optionally against another one
    Eval {
        /// Cards such as `As Kd 10h` (quote the list or pass one card per argument)
        #[arg(required = true)]
        cards: Vec<String>,
        /// Second hand to compare against
        #[arg(long)]
        against: Option<String>,
    },
    /// Play hands at one table, every seat entering actions on stdin
    Play {
        #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(2..=10))]
        players: u8,
        #[arg(long)]
        hands: Option<u32>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        key_bits: Option<usize>,
    },
    /// Show the resolved configuration and where each value came from
    Cfg,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_subcommand() {
        let commands = vec![
            vec!["fairdeal", "cfg"],
            vec!["fairdeal", "deal", "--players", "4", "--tamper"],
            vec!["fairdeal", "eval", "As", "Kd", "--against", "2c 2d"],
            vec!["fairdeal", "play", "--hands", "3", "--seed", "1"],
        ];
        for args in commands {
            assert!(FairdealCli::try_parse_from(&args).is_ok(), "{:?}", args);
        }
    }

    #[test]
    fn player_count_is_bounded() {
        assert!(FairdealCli::try_parse_from(["fairdeal", "deal", "--players", "1"]).is_err());
        assert!(FairdealCli::try_parse_from(["fairdeal", "play", "--players", "11"]).is_err());
    }
}
