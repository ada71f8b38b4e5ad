//! # fairdeal CLI Library
//!
//! Text-mode driver for the fairdeal engine: deal sealed cards, evaluate
//! hands, play hands at a table and inspect the configuration.
//!
//! ## Main Entry Point
//!
//! [`run`] parses command-line arguments and executes the subcommand, writing
//! to the streams it is given.
//!
//! ```no_run
//! use std::io;
//! let args = vec!["fairdeal", "eval", "As Ks Qs Js Ts"];
//! let code = fairdeal_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `deal`: Seal and open one round of hole cards
//! - `eval`: Classify and compare hands
//! - `play`: Play hands with every seat on stdin
//! - `cfg`: Display current configuration settings

use clap::Parser;
use std::io::Write;

pub mod cli;
mod commands;
pub mod config;
mod error;
pub mod exit_code;
pub mod logging;
pub mod ui;
pub mod validation;

use cli::{Commands, FairdealCli};
use commands::{handle_cfg_command, handle_deal_command, handle_eval_command, handle_play_command};

pub use commands::DealOptions;
pub use error::CliError;

const COMMANDS: &[&str] = &["deal", "eval", "play", "cfg"];

/// Parses `args` and runs the selected subcommand.
///
/// Returns [`exit_code::SUCCESS`] or [`exit_code::ERROR`]. Help and version
/// output go to `out` and count as success.
///
/// # Example
///
/// ```
/// let mut out = Vec::new();
/// let mut err = Vec::new();
/// let code = fairdeal_cli::run(["fairdeal", "eval", "Ah", "Ad"], &mut out, &mut err);
/// assert_eq!(code, 0);
/// assert!(String::from_utf8(out).unwrap().contains("one pair"));
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match FairdealCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;

            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    if write!(out, "{}", e).is_err() {
                        return exit_code::ERROR;
                    }
                    exit_code::SUCCESS
                }
                _ => {
                    let _ = write_usage(err, &e);
                    exit_code::ERROR
                }
            };
        }
    };

    match dispatch(cli.cmd, out, err) {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            let _ = ui::write_error(err, &e.to_string());
            exit_code::ERROR
        }
    }
}

fn dispatch(cmd: Commands, out: &mut dyn Write, err: &mut dyn Write) -> Result<(), CliError> {
    match cmd {
        Commands::Cfg => handle_cfg_command(out),
        Commands::Eval { cards, against } => handle_eval_command(&cards, against.as_deref(), out),
        Commands::Deal {
            players,
            seed,
            key_bits,
            tamper,
            pem,
        } => {
            let config = resolve_config(seed, key_bits)?;
            let opts = DealOptions {
                players: players as usize,
                tamper,
                pem,
            };
            handle_deal_command(opts, &config, out, err)
        }
        Commands::Play {
            players,
            hands,
            seed,
            key_bits,
        } => {
            let config = resolve_config(seed, key_bits)?;
            let stdin = std::io::stdin();
            let mut stdin_lock = stdin.lock();
            handle_play_command(players as usize, hands, config, out, err, &mut stdin_lock)
        }
    }
}

fn resolve_config(
    seed: Option<u64>,
    key_bits: Option<usize>,
) -> Result<fairdeal_engine::config::TableConfig, CliError> {
    let resolved = config::load_with_sources()?.with_overrides(seed, key_bits);
    config::validate(&resolved.config)?;
    Ok(resolved.config)
}

fn write_usage(err: &mut dyn Write, e: &clap::Error) -> std::io::Result<()> {
    writeln!(err, "{}", e)?;
    writeln!(err)?;
    writeln!(err, "Usage: fairdeal <command> [options]\n")?;
    writeln!(err, "Commands:")?;
    for c in COMMANDS {
        writeln!(err, "  {}", c)?;
    }
    writeln!(err, "\nFor full help, run: fairdeal --help")
}
