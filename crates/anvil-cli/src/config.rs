//! CLI configuration, parsed from TOML file + environment variable overrides.
//!
//! Priority: command line > environment variables > config file > defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnvilConfig {
    /// What to generate
    #[serde(default)]
    pub wallet: WalletSection,

    /// How to print it
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletSection {
    /// Mnemonic length for `generate` (12, 15, 18, 21 or 24)
    #[serde(default = "default_words")]
    pub words: usize,

    /// Coins derived by `generate` and `recover`, in output order
    #[serde(default = "default_coins")]
    pub coins: Vec<String>,

    /// Name of the environment variable holding the BIP-39 passphrase
    #[serde(default = "default_passphrase_env")]
    pub passphrase_env: String,
}

impl Default for WalletSection {
    fn default() -> Self {
        Self {
            words: default_words(),
            coins: default_coins(),
            passphrase_env: default_passphrase_env(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSection {
    /// "json" or "text"
    #[serde(default = "default_format")]
    pub format: String,

    /// Print private keys in each coin's import format
    #[serde(default)]
    pub include_private: bool,

    /// Echo the mnemonic given to `recover` / `derive`
    #[serde(default)]
    pub include_mnemonic: bool,

    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            format: default_format(),
            include_private: false,
            include_mnemonic: false,
            log_level: default_log_level(),
        }
    }
}

// ============================================================================
// Default value functions
// ============================================================================

fn default_words() -> usize {
    12
}

fn default_coins() -> Vec<String> {
    ["BTC", "ETH", "DOGE", "BNB", "TRX", "SOL"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_passphrase_env() -> String {
    "ANVIL_PASSPHRASE".to_string()
}

fn default_format() -> String {
    "json".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

const FORMATS: [&str; 2] = ["json", "text"];

// ============================================================================
// Loading & environment override
// ============================================================================

impl AnvilConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: AnvilConfig =
            toml::from_str(&contents).with_context(|| "Failed to parse TOML config")?;
        Ok(config)
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `ANVIL_LOG_LEVEL`
    /// - `ANVIL_WORDS`
    /// - `ANVIL_COINS` (comma separated)
    /// - `ANVIL_FORMAT`
    /// - `ANVIL_INCLUDE_PRIVATE` (`1`/`true` or `0`/`false`)
    pub fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("ANVIL_LOG_LEVEL") {
            self.output.log_level = v;
        }
        if let Ok(v) = std::env::var("ANVIL_WORDS") {
            if let Ok(words) = v.parse::<usize>() {
                self.wallet.words = words;
            }
        }
        if let Ok(v) = std::env::var("ANVIL_COINS") {
            self.wallet.coins = split_coins(&v);
        }
        if let Ok(v) = std::env::var("ANVIL_FORMAT") {
            self.output.format = v;
        }
        if let Ok(v) = std::env::var("ANVIL_INCLUDE_PRIVATE") {
            if let Some(flag) = parse_flag(&v) {
                self.output.include_private = flag;
            }
        }
    }

    /// Validate that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        anvil_core::entropy_bits_for_words(self.wallet.words)
            .with_context(|| format!("wallet.words = {}", self.wallet.words))?;

        anyhow::ensure!(
            !self.wallet.coins.is_empty(),
            "wallet.coins must not be empty"
        );
        for coin in &self.wallet.coins {
            anvil_core::lookup(coin).with_context(|| format!("wallet.coins: {}", coin))?;
        }

        anyhow::ensure!(
            !self.wallet.passphrase_env.is_empty(),
            "wallet.passphrase_env must not be empty"
        );

        anyhow::ensure!(
            FORMATS.contains(&self.output.format.as_str()),
            "output.format must be one of {:?}, got {:?}",
            FORMATS,
            self.output.format
        );

        Ok(())
    }
}

/// Split a comma separated coin list, dropping blanks.
pub fn split_coins(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
