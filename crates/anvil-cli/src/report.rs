//! Rendering of derived accounts as JSON or plain text.

use anyhow::{bail, Result};
use anvil_core::{Account, PublicAccount};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;
use zeroize::{Zeroize, Zeroizing};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Text,
}

impl OutputFormat {
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "json" => Ok(OutputFormat::Json),
            "text" => Ok(OutputFormat::Text),
            other => bail!("Unknown output format: {}", other),
        }
    }
}

/// One account line; the private key is present only when requested.
#[derive(Serialize)]
pub struct AccountEntry {
    #[serde(flatten)]
    pub account: PublicAccount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
}

impl Drop for AccountEntry {
    fn drop(&mut self) {
        if let Some(key) = self.private_key.as_mut() {
            key.zeroize();
        }
    }
}

#[derive(Serialize)]
pub struct WalletReport {
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mnemonic: Option<String>,
    pub accounts: Vec<AccountEntry>,
}

impl Drop for WalletReport {
    fn drop(&mut self) {
        if let Some(mnemonic) = self.mnemonic.as_mut() {
            mnemonic.zeroize();
        }
    }
}

impl WalletReport {
    pub fn new(
        accounts: &[Account],
        mnemonic: Option<&str>,
        include_private: bool,
    ) -> anvil_core::Result<Self> {
        let entries = accounts
            .iter()
            .map(|account| {
                let private_key = if include_private {
                    Some(account.export_private_key()?.to_string())
                } else {
                    None
                };
                Ok(AccountEntry {
                    account: account.to_public(),
                    private_key,
                })
            })
            .collect::<anvil_core::Result<Vec<_>>>()?;

        Ok(Self {
            generated_at: Utc::now(),
            mnemonic: mnemonic.map(str::to_string),
            accounts: entries,
        })
    }

    pub fn render(&self, format: OutputFormat) -> Result<Zeroizing<String>> {
        match format {
            OutputFormat::Json => Ok(Zeroizing::new(serde_json::to_string_pretty(self)?)),
            OutputFormat::Text => Ok(self.render_text()),
        }
    }

    fn render_text(&self) -> Zeroizing<String> {
        let mut out = Zeroizing::new(String::new());
        if let Some(ref mnemonic) = self.mnemonic {
            let _ = writeln!(out, "Mnemonic: {}", mnemonic);
            out.push('\n');
        }
        for entry in &self.accounts {
            let account = &entry.account;
            let _ = writeln!(
                out,
                "{:<5} {:<20} {}",
                account.symbol, account.path, account.address
            );
            if let Some(ref key) = entry.private_key {
                let _ = writeln!(out, "{:<26} private key: {}", "", key);
            }
        }
        out
    }
}
