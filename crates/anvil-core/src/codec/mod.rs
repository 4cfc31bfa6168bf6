//! Chain-specific address encodings
//!
//! [`AddressCodec`] is a closed set of families; every operation dispatches
//! with an exhaustive `match`, so adding a family means handling it in each
//! capability below.

pub mod base58;
pub mod bitcoin;
pub mod ethereum;
pub mod solana;
pub mod tron;

use std::fmt;

use zeroize::Zeroizing;

pub use self::bitcoin::BitcoinParams;
use crate::error::Result;
use crate::keys::{Curve, ExtendedKey};
use crate::path::PathProfile;

/// Address family of a coin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressCodec {
    /// P2PKH over a compressed secp256k1 key.
    Bitcoin(BitcoinParams),
    /// EIP-55 hex over Keccak256 of an uncompressed secp256k1 key.
    Ethereum,
    /// EVM account identifier in Base58Check with prefix `0x41`.
    Tron,
    /// Raw Base58 of an ed25519 key.
    Solana,
}

impl AddressCodec {
    pub fn curve(&self) -> Curve {
        match self {
            AddressCodec::Bitcoin(_) | AddressCodec::Ethereum | AddressCodec::Tron => {
                Curve::Secp256k1
            }
            AddressCodec::Solana => Curve::Ed25519,
        }
    }

    pub fn profile(&self) -> PathProfile {
        match self {
            AddressCodec::Bitcoin(_) | AddressCodec::Ethereum | AddressCodec::Tron => {
                PathProfile::Bip44
            }
            AddressCodec::Solana => PathProfile::Solana,
        }
    }

    /// Serialize the public half of `key` in the form this family hashes:
    /// 33-byte compressed for Bitcoin, 65-byte uncompressed for EVM and TRON,
    /// 32 bytes for Solana.
    pub fn public_key(&self, key: &ExtendedKey) -> Result<Vec<u8>> {
        match self {
            AddressCodec::Bitcoin(_) => Ok(key.secp256k1_public_key()?.serialize().to_vec()),
            AddressCodec::Ethereum | AddressCodec::Tron => {
                Ok(key.secp256k1_public_key()?.serialize_uncompressed().to_vec())
            }
            AddressCodec::Solana => Ok(key.ed25519_public_key()?.to_vec()),
        }
    }

    pub fn public_key_to_address(&self, public_key: &[u8]) -> Result<String> {
        let address = match self {
            AddressCodec::Bitcoin(params) => bitcoin::public_key_to_address(params, public_key)?,
            AddressCodec::Ethereum => ethereum::public_key_to_address(public_key)?,
            AddressCodec::Tron => tron::public_key_to_address(public_key)?,
            AddressCodec::Solana => solana::public_key_to_address(public_key)?,
        };
        Ok(address)
    }

    /// Whether `address` is well formed for this family. Never panics.
    pub fn validate_address(&self, address: &str) -> bool {
        match self {
            AddressCodec::Bitcoin(params) => bitcoin::validate_address(params, address),
            AddressCodec::Ethereum => ethereum::validate_address(address),
            AddressCodec::Tron => tron::validate_address(address),
            AddressCodec::Solana => solana::validate_address(address),
        }
    }

    /// Render a private key in the family's import format.
    pub fn export_private_key(&self, secret: &[u8], public_key: &[u8]) -> Result<Zeroizing<String>> {
        let exported = match self {
            AddressCodec::Bitcoin(params) => bitcoin::private_key_to_wif(params, secret)?,
            AddressCodec::Ethereum => ethereum::export_private_key(secret),
            AddressCodec::Tron => tron::export_private_key(secret),
            AddressCodec::Solana => solana::export_keypair(secret, public_key),
        };
        Ok(exported)
    }
}

impl fmt::Display for AddressCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressCodec::Bitcoin(params) => {
                write!(f, "bitcoin(0x{:02x})", params.pubkey_hash)
            }
            AddressCodec::Ethereum => f.write_str("ethereum"),
            AddressCodec::Tron => f.write_str("tron"),
            AddressCodec::Solana => f.write_str("solana"),
        }
    }
}
