//! Command execution.
//!
//! Everything a command needs is captured once in a [`Request`]; the
//! command then reads only from it and from the given input/output streams.

use anyhow::{ensure, Context, Result};
use anvil_core::codec::tron;
use anvil_core::{
    derive_account_with, derive_wallet, generate_mnemonic_words, mnemonic_to_seed, registry,
    validate_address, DeriveRequest,
};
use std::io::{BufRead, Write};
use zeroize::Zeroizing;

use crate::args::Command;
use crate::config::AnvilConfig;
use crate::report::{OutputFormat, WalletReport};

/// One invocation, fixed before any key material is touched.
pub struct Request {
    command: Command,
    words: usize,
    coins: Vec<String>,
    passphrase: Zeroizing<String>,
    format: OutputFormat,
    include_private: bool,
    include_mnemonic: bool,
}

impl Request {
    pub fn new(command: Command, config: &AnvilConfig, passphrase: Zeroizing<String>) -> Result<Self> {
        Ok(Self {
            command,
            words: config.wallet.words,
            coins: config.wallet.coins.clone(),
            passphrase,
            format: OutputFormat::parse(&config.output.format)?,
            include_private: config.output.include_private,
            include_mnemonic: config.output.include_mnemonic,
        })
    }
}

/// Run the request. Returns `false` when the command's answer is negative
/// (an invalid address), so the caller can set the exit status.
pub fn execute<R: BufRead, W: Write>(request: &Request, input: &mut R, out: &mut W) -> Result<bool> {
    match &request.command {
        Command::Generate => {
            let mnemonic = generate_mnemonic_words(request.words)?;
            let seed = mnemonic.to_seed(&request.passphrase);
            let accounts = derive_wallet(&seed, request.coins.as_slice())?;
            log::info!("derived {} accounts", accounts.len());
            let phrase = mnemonic.phrase();
            let report = WalletReport::new(&accounts, Some(phrase.as_str()), request.include_private)?;
            emit(out, &report.render(request.format)?)?;
        }
        Command::Recover => {
            let phrase = read_mnemonic(input)?;
            let seed = mnemonic_to_seed(&phrase, &request.passphrase)?;
            let accounts = derive_wallet(&seed, request.coins.as_slice())?;
            log::info!("derived {} accounts", accounts.len());
            let echoed = request.include_mnemonic.then_some(phrase.as_str());
            let report = WalletReport::new(&accounts, echoed, request.include_private)?;
            emit(out, &report.render(request.format)?)?;
        }
        Command::Derive { coin, path } => {
            let phrase = read_mnemonic(input)?;
            let seed = mnemonic_to_seed(&phrase, &request.passphrase)?;
            let account = derive_account_with(&seed, &DeriveRequest::new(coin.as_str(), path.as_str()))?;
            let echoed = request.include_mnemonic.then_some(phrase.as_str());
            let report =
                WalletReport::new(std::slice::from_ref(&account), echoed, request.include_private)?;
            emit(out, &report.render(request.format)?)?;
        }
        Command::Validate { coin, address } => {
            registry::lookup(coin)?;
            let valid = validate_address(coin, address);
            writeln!(out, "{}", if valid { "valid" } else { "invalid" })?;
            return Ok(valid);
        }
        Command::Paths { coin } => {
            let coins = match coin {
                Some(symbol) => vec![registry::lookup(symbol)?],
                None => registry::all().iter().collect(),
            };
            for descriptor in coins {
                for path in descriptor.standard_paths {
                    writeln!(out, "{:<5} {}", descriptor.symbol, path)?;
                }
            }
        }
        Command::TronToHex { address } => {
            let hex = tron::address_to_hex(address)
                .map_err(anvil_core::WalletError::from)
                .with_context(|| format!("Cannot convert {}", address))?;
            writeln!(out, "{}", hex)?;
        }
        Command::TronFromHex { hex } => {
            let address = tron::hex_to_address(hex)
                .map_err(anvil_core::WalletError::from)
                .with_context(|| format!("Cannot convert {}", hex))?;
            writeln!(out, "{}", address)?;
        }
        Command::CheckConfig | Command::Help | Command::Version => {}
    }
    Ok(true)
}

/// Read one line from `input` and normalise its whitespace.
fn read_mnemonic<R: BufRead>(input: &mut R) -> Result<Zeroizing<String>> {
    let mut line = Zeroizing::new(String::new());
    input
        .read_line(&mut line)
        .context("Failed to read mnemonic from stdin")?;
    let words: Vec<&str> = line.split_whitespace().collect();
    ensure!(!words.is_empty(), "No mnemonic on stdin");
    Ok(Zeroizing::new(words.join(" ")))
}

fn emit<W: Write>(out: &mut W, text: &str) -> Result<()> {
    out.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}
