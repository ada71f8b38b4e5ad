//! Layered table configuration: defaults, then the TOML file named by
//! `FAIRDEAL_CONFIG`, then `FAIRDEAL_*` environment overrides. Command-line
//! flags are applied last by the individual commands.

use std::fmt;
use std::fs;

use fairdeal_engine::config::{MinRaiseRule, TableConfig};
use serde::{Deserialize, Serialize};

pub const CONFIG_ENV: &str = "FAIRDEAL_CONFIG";
pub const SEED_ENV: &str = "FAIRDEAL_SEED";
pub const STARTING_STACK_ENV: &str = "FAIRDEAL_STARTING_STACK";
pub const KEY_BITS_ENV: &str = "FAIRDEAL_KEY_BITS";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
    Cli,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub small_blind: ValueSource,
    pub big_blind: ValueSource,
    pub starting_stack: ValueSource,
    pub key_bits: ValueSource,
    pub seed: ValueSource,
    pub min_raise: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            small_blind: ValueSource::Default,
            big_blind: ValueSource::Default,
            starting_stack: ValueSource::Default,
            key_bits: ValueSource::Default,
            seed: ValueSource::Default,
            min_raise: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: TableConfig,
    pub sources: ConfigSources,
}

impl ConfigResolved {
    /// Command-line `--seed` and `--key-bits` win over every other layer.
    pub fn with_overrides(mut self, seed: Option<u64>, key_bits: Option<usize>) -> Self {
        if let Some(v) = seed {
            self.config.seed = Some(v);
            self.sources.seed = ValueSource::Cli;
        }
        if let Some(v) = key_bits {
            self.config.key_bits = v;
            self.sources.key_bits = ValueSource::Cli;
        }
        self
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => f.write_str(msg),
        }
    }
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = TableConfig::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var(CONFIG_ENV)
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.small_blind {
            cfg.small_blind = v;
            sources.small_blind = ValueSource::File;
        }
        if let Some(v) = f.big_blind {
            cfg.big_blind = v;
            sources.big_blind = ValueSource::File;
        }
        if let Some(v) = f.starting_stack {
            cfg.starting_stack = v;
            sources.starting_stack = ValueSource::File;
        }
        if let Some(v) = f.key_bits {
            cfg.key_bits = v;
            sources.key_bits = ValueSource::File;
        }
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.min_raise {
            cfg.min_raise = v;
            sources.min_raise = ValueSource::File;
        }
    }

    if let Ok(seed) = std::env::var(SEED_ENV)
        && !seed.is_empty()
    {
        cfg.seed = Some(
            seed.parse()
                .map_err(|_| ConfigError::Invalid(format!("Invalid {}: {}", SEED_ENV, seed)))?,
        );
        sources.seed = ValueSource::Env;
    }
    if let Ok(stack) = std::env::var(STARTING_STACK_ENV)
        && !stack.is_empty()
    {
        cfg.starting_stack = stack.parse().map_err(|_| {
            ConfigError::Invalid(format!("Invalid {}: {}", STARTING_STACK_ENV, stack))
        })?;
        sources.starting_stack = ValueSource::Env;
    }
    if let Ok(bits) = std::env::var(KEY_BITS_ENV)
        && !bits.is_empty()
    {
        cfg.key_bits = bits
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid {}: {}", KEY_BITS_ENV, bits)))?;
        sources.key_bits = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    small_blind: Option<u32>,
    #[serde(default)]
    big_blind: Option<u32>,
    #[serde(default)]
    starting_stack: Option<u32>,
    #[serde(default)]
    key_bits: Option<usize>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    min_raise: Option<MinRaiseRule>,
}

pub fn validate(cfg: &TableConfig) -> Result<(), ConfigError> {
    cfg.validate()
        .map_err(|e| ConfigError::Invalid(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write as _;

    fn clear_env() {
        for var in [CONFIG_ENV, SEED_ENV, STARTING_STACK_ENV, KEY_BITS_ENV] {
            unsafe {
                std::env::remove_var(var);
            }
        }
    }

    #[test]
    #[serial]
    fn defaults_without_env() {
        clear_env();
        let resolved = load_with_sources().unwrap();
        assert_eq!(resolved.config, TableConfig::default());
        assert_eq!(resolved.sources.seed, ValueSource::Default);
    }

    #[test]
    #[serial]
    fn env_overrides_file() {
        clear_env();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "seed = 5\nbig_blind = 50\nmin_raise = \"current_bet\"").unwrap();
        unsafe {
            std::env::set_var(CONFIG_ENV, file.path());
            std::env::set_var(SEED_ENV, "9");
        }
        let resolved = load_with_sources().unwrap();
        clear_env();

        assert_eq!(resolved.config.seed, Some(9));
        assert_eq!(resolved.sources.seed, ValueSource::Env);
        assert_eq!(resolved.config.big_blind, 50);
        assert_eq!(resolved.sources.big_blind, ValueSource::File);
        assert_eq!(resolved.config.min_raise, MinRaiseRule::CurrentBet);
    }

    #[test]
    #[serial]
    fn rejects_small_keys_from_env() {
        clear_env();
        unsafe {
            std::env::set_var(KEY_BITS_ENV, "512");
        }
        let result = load_with_sources();
        clear_env();
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    #[serial]
    fn cli_flags_win() {
        clear_env();
        let resolved = load_with_sources()
            .unwrap()
            .with_overrides(Some(3), Some(1024));
        assert_eq!(resolved.config.seed, Some(3));
        assert_eq!(resolved.sources.key_bits, ValueSource::Cli);
    }
}
