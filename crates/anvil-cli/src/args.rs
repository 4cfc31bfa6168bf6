//! Command line parsing (minimal, no framework).

use anyhow::{bail, Result};
use std::path::PathBuf;

use crate::config::{split_coins, AnvilConfig};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// New mnemonic plus the standard accounts of every configured coin
    Generate,
    /// Standard accounts for a mnemonic read from stdin
    Recover,
    /// One account at an explicit path, mnemonic read from stdin
    Derive { coin: String, path: String },
    Validate { coin: String, address: String },
    Paths { coin: Option<String> },
    TronToHex { address: String },
    TronFromHex { hex: String },
    CheckConfig,
    Help,
    Version,
}

/// Flags that take precedence over the config file and environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub words: Option<usize>,
    pub coins: Option<Vec<String>>,
    pub format: Option<String>,
    pub include_private: bool,
    pub include_mnemonic: bool,
}

impl Overrides {
    pub fn apply(&self, config: &mut AnvilConfig) {
        if let Some(words) = self.words {
            config.wallet.words = words;
        }
        if let Some(ref coins) = self.coins {
            config.wallet.coins = coins.clone();
        }
        if let Some(ref format) = self.format {
            config.output.format = format.clone();
        }
        if self.include_private {
            config.output.include_private = true;
        }
        if self.include_mnemonic {
            config.output.include_mnemonic = true;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub config_path: Option<PathBuf>,
    pub command: Command,
    pub overrides: Overrides,
}

/// Parse arguments, excluding the program name.
pub fn parse(args: &[String]) -> Result<Invocation> {
    let mut config_path = None;
    let mut overrides = Overrides::default();
    let mut positional: Vec<&str> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                config_path = Some(PathBuf::from(value(args, &mut i, "--config")?));
            }
            "--words" | "-w" => {
                let raw = value(args, &mut i, "--words")?;
                match raw.parse::<usize>() {
                    Ok(words) => overrides.words = Some(words),
                    Err(_) => bail!("--words expects a number, got {:?}", raw),
                }
            }
            "--coins" => {
                overrides.coins = Some(split_coins(value(args, &mut i, "--coins")?));
            }
            "--format" | "-f" => {
                overrides.format = Some(value(args, &mut i, "--format")?.to_string());
            }
            "--include-private" => overrides.include_private = true,
            "--include-mnemonic" => overrides.include_mnemonic = true,
            "--help" | "-h" => positional.insert(0, "help"),
            "--version" | "-V" => positional.insert(0, "version"),
            flag if flag.starts_with("--") => bail!("Unknown argument: {}", flag),
            other => positional.push(other),
        }
        i += 1;
    }

    let command = match positional.as_slice() {
        [] | ["help", ..] => Command::Help,
        ["version", ..] => Command::Version,
        ["generate"] => Command::Generate,
        ["recover"] => Command::Recover,
        ["derive", coin, path] => Command::Derive {
            coin: coin.to_string(),
            path: path.to_string(),
        },
        ["validate", coin, address] => Command::Validate {
            coin: coin.to_string(),
            address: address.to_string(),
        },
        ["paths"] => Command::Paths { coin: None },
        ["paths", coin] => Command::Paths {
            coin: Some(coin.to_string()),
        },
        ["tron-hex", address] => Command::TronToHex {
            address: address.to_string(),
        },
        ["tron-address", hex] => Command::TronFromHex {
            hex: hex.to_string(),
        },
        ["check-config"] => Command::CheckConfig,
        [name, ..] => bail!("Unknown or incomplete command: {} (see --help)", name),
    };

    Ok(Invocation {
        config_path,
        command,
        overrides,
    })
}

fn value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str> {
    *i += 1;
    match args.get(*i) {
        Some(v) => Ok(v.as_str()),
        None => bail!("{} requires an argument", flag),
    }
}
