//! Anvil Core
//!
//! Key derivation and address encoding for the Anvil cold wallet generator.
//!
//! # Pipeline
//!
//! mnemonic → 64-byte seed → key at a derivation path → chain address
//!
//! - Mnemonics and seeds follow BIP-39 (English word list).
//! - secp256k1 keys follow BIP-32; ed25519 keys (Solana) follow SLIP-0010,
//!   hardened steps only.
//! - Addresses: Bitcoin-family P2PKH, EIP-55 Ethereum, TRON Base58Check,
//!   Solana raw Base58.
//!
//! # Supported coins
//!
//! | Symbol | Coin type | Family |
//! |--------|-----------|--------|
//! | BTC    | 0         | Bitcoin (0x00) |
//! | DOGE   | 3         | Bitcoin (0x1E) |
//! | ETH    | 60        | Ethereum, chain 1 |
//! | BNB    | 60        | Ethereum, chain 56 |
//! | TRX    | 195       | TRON |
//! | SOL    | 501       | Solana |
//!
//! Secret bytes live in [`memory::SecureBuffer`], which is locked in RAM
//! where possible and overwritten on drop.

pub mod account;
pub mod codec;
pub mod error;
pub mod keys;
pub mod memory;
pub mod path;
pub mod registry;
pub mod seed;

pub use account::{
    derive_account, derive_account_with, derive_standard_accounts, derive_wallet,
    validate_address, Account, DeriveRequest, PublicAccount,
};
pub use codec::{AddressCodec, BitcoinParams};
pub use error::{AddressFault, MnemonicFault, Result, WalletError};
pub use keys::{derive_key, ChildPolicy, Curve, ExtendedKey};
pub use memory::{disable_core_dumps, SecureBuffer};
pub use path::{parse_derivation_path, ChildIndex, DerivationPath, PathProfile};
pub use registry::{lookup, standard_paths, CoinDescriptor};
pub use seed::{
    entropy_bits_for_words, entropy_to_mnemonic, generate_entropy, generate_mnemonic,
    generate_mnemonic_words, mnemonic_to_seed, parse_mnemonic, Mnemonic, Seed,
};
