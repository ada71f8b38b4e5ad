//! Command handler modules for the fairdeal CLI.
//!
//! Each command lives in its own module and exposes one
//! `handle_COMMAND_command(...) -> Result<(), CliError>` function. Output
//! streams (`&mut dyn Write`) and stdin are passed in so tests can capture
//! them.

mod cfg;
mod deal;
mod eval;
mod play;

pub use cfg::handle_cfg_command;
pub use deal::{DealOptions, handle_deal_command};
pub use eval::handle_eval_command;
pub use play::handle_play_command;
