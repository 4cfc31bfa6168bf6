//! Account derivation
//!
//! An [`Account`] is the end product of the pipeline: the key at one path of
//! one coin, plus its address. The private key stays in a [`SecureBuffer`]
//! until [`Account::export_private_key`] is called.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::{Result, WalletError};
use crate::keys::{derive_key, ChildPolicy, ExtendedKey};
use crate::memory::SecureBuffer;
use crate::path::DerivationPath;
use crate::registry::{self, CoinDescriptor};
use crate::seed::Seed;

/// A derived key pair and its address.
pub struct Account {
    path: DerivationPath,
    private_key: SecureBuffer,
    public_key: Vec<u8>,
    address: String,
    coin: &'static CoinDescriptor,
    created_at: DateTime<Utc>,
}

impl Account {
    /// The path actually derived. Differs from the requested one only if a
    /// child index was skipped under [`ChildPolicy::Retry`].
    pub fn path(&self) -> &DerivationPath {
        &self.path
    }

    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn symbol(&self) -> &'static str {
        self.coin.symbol
    }

    pub fn coin(&self) -> &'static CoinDescriptor {
        self.coin
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn private_key(&self) -> &SecureBuffer {
        &self.private_key
    }

    /// The private key in the coin's import format (WIF, hex or keypair).
    pub fn export_private_key(&self) -> Result<Zeroizing<String>> {
        self.coin
            .codec
            .export_private_key(self.private_key.as_slice(), &self.public_key)
    }

    /// A copy without the private key, safe to serialize and print.
    pub fn to_public(&self) -> PublicAccount {
        PublicAccount {
            symbol: self.coin.symbol.to_string(),
            path: self.path.to_string(),
            address: self.address.clone(),
            public_key: hex::encode(&self.public_key),
            chain_id: self.coin.chain_id,
            created_at: self.created_at,
        }
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("symbol", &self.coin.symbol)
            .field("path", &self.path.to_string())
            .field("address", &self.address)
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

/// Public fields of an [`Account`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicAccount {
    pub symbol: String,
    pub path: String,
    pub address: String,
    /// Hex of the public key in the form the address was hashed from.
    pub public_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    pub created_at: DateTime<Utc>,
}

/// One account derivation, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeriveRequest {
    symbol: String,
    path: String,
    policy: ChildPolicy,
}

impl DeriveRequest {
    pub fn new(symbol: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            path: path.into(),
            policy: ChildPolicy::default(),
        }
    }

    pub fn with_policy(self, policy: ChildPolicy) -> Self {
        Self { policy, ..self }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn policy(&self) -> ChildPolicy {
        self.policy
    }
}

/// Derive the account of `symbol` at `path` with the default child policy.
pub fn derive_account(seed: &Seed, path: &DerivationPath, symbol: &str) -> Result<Account> {
    let coin = registry::lookup(symbol)?;
    derive_for_coin(seed, path, coin, ChildPolicy::default())
}

/// Resolve and derive a [`DeriveRequest`].
pub fn derive_account_with(seed: &Seed, request: &DeriveRequest) -> Result<Account> {
    let coin = registry::lookup(&request.symbol)?;
    let path = coin.parse_path(&request.path)?;
    derive_for_coin(seed, &path, coin, request.policy)
}

fn derive_for_coin(
    seed: &Seed,
    path: &DerivationPath,
    coin: &'static CoinDescriptor,
    policy: ChildPolicy,
) -> Result<Account> {
    if path.profile() != coin.profile() {
        return Err(WalletError::InvalidDerivationPath(format!(
            "{}: {:?} profile required for {}",
            path,
            coin.profile(),
            coin.symbol
        )));
    }
    if path.coin_type() != coin.coin_type {
        log::warn!(
            "path {} uses coin type {}, {} is registered as {}",
            path,
            path.coin_type(),
            coin.symbol,
            coin.coin_type
        );
    }

    let key = derive_key(seed, path, coin.curve(), policy)?;
    account_from_key(&key, path, coin)
}

/// Build the account for `key`, recording the path it was actually derived at.
fn account_from_key(
    key: &ExtendedKey,
    requested: &DerivationPath,
    coin: &'static CoinDescriptor,
) -> Result<Account> {
    let actual = DerivationPath::from_components(requested.profile(), key.path().to_vec())?;
    if actual != *requested {
        log::debug!("{} derived at {} instead of {}", coin.symbol, actual, requested);
    }

    let public_key = coin.codec.public_key(key)?;
    let address = coin.codec.public_key_to_address(&public_key)?;

    Ok(Account {
        path: actual,
        private_key: SecureBuffer::from_slice(key.secret_bytes()),
        public_key,
        address,
        coin,
        created_at: Utc::now(),
    })
}

/// Derive the account at every standard path of `symbol`, in order.
///
/// Fails as a whole if any single path fails.
pub fn derive_standard_accounts(seed: &Seed, symbol: &str) -> Result<Vec<Account>> {
    let coin = registry::lookup(symbol)?;
    coin.standard_paths
        .iter()
        .map(|text| {
            let path = coin.parse_path(text)?;
            derive_for_coin(seed, &path, coin, ChildPolicy::default())
        })
        .collect()
}

/// [`derive_standard_accounts`] over several coins.
pub fn derive_wallet<S: AsRef<str>>(seed: &Seed, symbols: &[S]) -> Result<Vec<Account>> {
    // Resolve every symbol before deriving anything.
    for symbol in symbols {
        registry::lookup(symbol.as_ref())?;
    }
    let mut accounts = Vec::new();
    for symbol in symbols {
        accounts.extend(derive_standard_accounts(seed, symbol.as_ref())?);
    }
    Ok(accounts)
}

/// Whether `address` is valid for `symbol`. Unknown coins yield `false`.
pub fn validate_address(symbol: &str, address: &str) -> bool {
    registry::lookup(symbol)
        .map(|coin| coin.codec.validate_address(address))
        .unwrap_or(false)
}
