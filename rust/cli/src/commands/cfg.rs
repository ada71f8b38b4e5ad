//! Configuration command handler.
//!
//! Prints the resolved table configuration with the source of every value
//! (default, file or env):
//!
//! ```json
//! {
//!   "big_blind": {
//!     "value": 20,
//!     "source": "default"
//!   },
//!   ...
//! }
//! ```

use crate::config;
use crate::error::CliError;
use std::io::Write;

pub fn handle_cfg_command(out: &mut dyn Write) -> Result<(), CliError> {
    let resolved = config::load_with_sources()?;

    let config::ConfigResolved { config, sources } = resolved;
    let display = serde_json::json!({
        "small_blind": {
            "value": config.small_blind,
            "source": sources.small_blind,
        },
        "big_blind": {
            "value": config.big_blind,
            "source": sources.big_blind,
        },
        "starting_stack": {
            "value": config.starting_stack,
            "source": sources.starting_stack,
        },
        "key_bits": {
            "value": config.key_bits,
            "source": sources.key_bits,
        },
        "seed": {
            "value": config.seed,
            "source": sources.seed,
        },
        "min_raise": {
            "value": config.min_raise,
            "source": sources.min_raise,
        }
    });
    let json_str = serde_json::to_string_pretty(&display).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_cfg_displays_json_output() {
        let mut out = Vec::new();
        let result = handle_cfg_command(&mut out);
        assert!(result.is_ok(), "cfg command should succeed");

        let output = String::from_utf8(out).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&output).expect("cfg output should be valid JSON");
        for key in [
            "small_blind",
            "big_blind",
            "starting_stack",
            "key_bits",
            "seed",
            "min_raise",
        ] {
            assert!(json[key]["source"].is_string(), "missing source for {}", key);
        }
    }
}
