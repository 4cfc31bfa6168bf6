//! Bitcoin-family P2PKH addresses and WIF export.
//!
//! `address = Base58Check(version || RIPEMD160(SHA256(compressed_pubkey)))`

use bitcoin::hashes::{hash160, Hash};
use secp256k1::PublicKey;
use zeroize::Zeroizing;

use super::base58;
use crate::error::AddressFault;

/// Version bytes that distinguish one Bitcoin-like chain from another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitcoinParams {
    /// P2PKH address version byte.
    pub pubkey_hash: u8,
    /// Wallet Import Format version byte.
    pub wif: u8,
}

impl BitcoinParams {
    pub const BITCOIN: Self = Self {
        pubkey_hash: 0x00,
        wif: 0x80,
    };

    pub const DOGECOIN: Self = Self {
        pubkey_hash: 0x1E,
        wif: 0x9E,
    };
}

const COMPRESSED_KEY_LEN: usize = 33;

/// Encode a 33-byte compressed secp256k1 public key as a P2PKH address.
pub fn public_key_to_address(
    params: &BitcoinParams,
    public_key: &[u8],
) -> Result<String, AddressFault> {
    if public_key.len() != COMPRESSED_KEY_LEN {
        return Err(AddressFault::BadLength {
            expected: COMPRESSED_KEY_LEN,
            actual: public_key.len(),
        });
    }
    PublicKey::from_slice(public_key).map_err(|e| AddressFault::BadPublicKey(e.to_string()))?;

    let hash = hash160::Hash::hash(public_key).to_byte_array();
    let mut payload = Vec::with_capacity(1 + hash.len());
    payload.push(params.pubkey_hash);
    payload.extend_from_slice(&hash);
    Ok(base58::check_encode(&payload))
}

/// Decode a P2PKH address into its 20-byte public key hash.
pub fn decode_address(params: &BitcoinParams, address: &str) -> Result<[u8; 20], AddressFault> {
    let payload = base58::check_decode(address, 21)?;
    if payload[0] != params.pubkey_hash {
        return Err(AddressFault::BadPrefix(payload[0]));
    }
    let mut hash = [0u8; 20];
    hash.copy_from_slice(&payload[1..]);
    Ok(hash)
}

pub fn validate_address(params: &BitcoinParams, address: &str) -> bool {
    decode_address(params, address).is_ok()
}

/// Compressed-key WIF: `Base58Check(wif_version || secret || 0x01)`.
pub fn private_key_to_wif(
    params: &BitcoinParams,
    secret: &[u8],
) -> Result<Zeroizing<String>, AddressFault> {
    if secret.len() != 32 {
        return Err(AddressFault::BadLength {
            expected: 32,
            actual: secret.len(),
        });
    }
    let mut payload = Zeroizing::new(Vec::with_capacity(34));
    payload.push(params.wif);
    payload.extend_from_slice(secret);
    payload.push(0x01);
    Ok(Zeroizing::new(base58::check_encode(&payload)))
}
