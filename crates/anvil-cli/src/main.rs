//! Anvil: offline HD wallet generator
//!
//! Generates or recovers a BIP-39 wallet and prints the standard accounts of
//! each configured coin. Meant to run on an air-gapped machine; nothing here
//! touches the network.
//!
//! # Usage
//!
//! ```bash
//! anvil generate --words 24 --coins BTC,ETH
//! echo "$MNEMONIC" | anvil recover --include-private
//! echo "$MNEMONIC" | anvil derive ETH "m/44'/60'/0'/0/5"
//! anvil validate TRX TUEZSdKsoDHQMeZwihtdoBiN46zxhGWYdH
//! ```

mod args;
mod config;
mod report;
mod run;

use anyhow::{Context, Result};
use zeroize::Zeroizing;

use crate::args::Command;
use crate::config::AnvilConfig;

fn main() -> Result<()> {
    // Security hardening: keep seed material out of core files
    anvil_core::disable_core_dumps();

    let argv: Vec<String> = std::env::args().skip(1).collect();
    let invocation = args::parse(&argv)?;

    match invocation.command {
        Command::Help => {
            print_help();
            return Ok(());
        }
        Command::Version => {
            println!("anvil {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        _ => {}
    }

    // Load config
    let mut config = match invocation.config_path {
        Some(ref path) => AnvilConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AnvilConfig::default(),
    };

    config.apply_env_overrides();
    invocation.overrides.apply(&mut config);

    config
        .validate()
        .context("Configuration validation failed")?;

    // Init logger
    std::env::set_var("RUST_LOG", &config.output.log_level);
    env_logger::init();

    if invocation.command == Command::CheckConfig {
        println!("Configuration is valid.");
        println!("  Words:          {}", config.wallet.words);
        println!("  Coins:          {}", config.wallet.coins.join(", "));
        println!("  Passphrase env: {}", config.wallet.passphrase_env);
        println!("  Format:         {}", config.output.format);
        println!("  Private keys:   {}", config.output.include_private);
        return Ok(());
    }

    let passphrase = Zeroizing::new(std::env::var(&config.wallet.passphrase_env).unwrap_or_default());
    if !passphrase.is_empty() {
        log::info!("using BIP-39 passphrase from ${}", config.wallet.passphrase_env);
    }

    let request = run::Request::new(invocation.command, &config, passphrase)?;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let ok = run::execute(&request, &mut stdin.lock(), &mut stdout.lock())?;
    if !ok {
        std::process::exit(1);
    }

    Ok(())
}

fn print_help() {
    println!(
        r#"Anvil: offline HD wallet generator

USAGE:
    anvil <COMMAND> [OPTIONS]

COMMANDS:
    generate                  New mnemonic and the standard accounts of each coin
    recover                   Standard accounts for a mnemonic read from stdin
    derive <COIN> <PATH>      One account at PATH, mnemonic read from stdin
    validate <COIN> <ADDRESS> Check an address (exit status 1 if invalid)
    paths [COIN]              List standard derivation paths
    tron-hex <ADDRESS>        TRON Base58 address to hex
    tron-address <HEX>        Hex account id to TRON Base58 address
    check-config              Validate configuration and exit

OPTIONS:
    -c, --config <PATH>       TOML config file
    -w, --words <N>           Mnemonic length: 12, 15, 18, 21 or 24
    --coins <LIST>            Comma separated coins (BTC,DOGE,ETH,BNB,TRX,SOL)
    -f, --format <FMT>        json or text
    --include-private         Print private keys
    --include-mnemonic        Echo the mnemonic given to recover/derive
    -h, --help                Show this help message
    -V, --version             Show version

ENVIRONMENT VARIABLES (override config file):
    ANVIL_PASSPHRASE          BIP-39 passphrase (name set by wallet.passphrase_env)
    ANVIL_LOG_LEVEL           Log level (error/warn/info/debug/trace)
    ANVIL_WORDS               Mnemonic length
    ANVIL_COINS               Comma separated coins
    ANVIL_FORMAT              json or text
    ANVIL_INCLUDE_PRIVATE     true/false
"#
    );
}
