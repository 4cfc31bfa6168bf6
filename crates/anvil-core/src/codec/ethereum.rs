//! EVM addresses (Ethereum, BNB Smart Chain).
//!
//! The address is the last 20 bytes of `Keccak256(uncompressed_pubkey[1..])`,
//! rendered as `0x` + 40 hex digits with the EIP-55 mixed-case checksum.

use secp256k1::PublicKey;
use tiny_keccak::{Hasher, Keccak};
use zeroize::Zeroizing;

use crate::error::AddressFault;

pub const ADDRESS_LEN: usize = 20;

pub(crate) fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut out = [0u8; 32];
    hasher.finalize(&mut out);
    out
}

/// The 20-byte account identifier for a secp256k1 public key.
///
/// Accepts compressed (33-byte) or uncompressed (65-byte) encodings.
pub fn raw_address(public_key: &[u8]) -> Result<[u8; ADDRESS_LEN], AddressFault> {
    let key =
        PublicKey::from_slice(public_key).map_err(|e| AddressFault::BadPublicKey(e.to_string()))?;
    let uncompressed = key.serialize_uncompressed();
    let hash = keccak256(&uncompressed[1..]);

    let mut out = [0u8; ADDRESS_LEN];
    out.copy_from_slice(&hash[12..]);
    Ok(out)
}

/// EIP-55 rendering of a raw address.
pub fn checksum_encode(raw: &[u8; ADDRESS_LEN]) -> String {
    let lower = hex::encode(raw);
    let hash = keccak256(lower.as_bytes());

    let mut out = String::with_capacity(2 + 2 * ADDRESS_LEN);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = if i % 2 == 0 {
            hash[i / 2] >> 4
        } else {
            hash[i / 2] & 0x0f
        };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

pub fn public_key_to_address(public_key: &[u8]) -> Result<String, AddressFault> {
    Ok(checksum_encode(&raw_address(public_key)?))
}

fn parse_hex_body(address: &str) -> Result<(&str, [u8; ADDRESS_LEN]), AddressFault> {
    let body = address
        .strip_prefix("0x")
        .ok_or_else(|| AddressFault::BadEncoding("missing 0x prefix".into()))?;
    if body.len() != 2 * ADDRESS_LEN {
        return Err(AddressFault::BadLength {
            expected: 2 * ADDRESS_LEN,
            actual: body.len(),
        });
    }
    let mut raw = [0u8; ADDRESS_LEN];
    hex::decode_to_slice(body, &mut raw).map_err(|e| AddressFault::BadEncoding(e.to_string()))?;
    Ok((body, raw))
}

/// Re-render any well-formed address (any letter case) with its EIP-55 checksum.
pub fn to_checksum_address(address: &str) -> Result<String, AddressFault> {
    let (_, raw) = parse_hex_body(address)?;
    Ok(checksum_encode(&raw))
}

/// Decode an address, verifying the checksum when the letters are mixed case.
pub fn decode_address(address: &str) -> Result<[u8; ADDRESS_LEN], AddressFault> {
    let (body, raw) = parse_hex_body(address)?;
    let has_upper = body.bytes().any(|b| b.is_ascii_uppercase());
    let has_lower = body.bytes().any(|b| b.is_ascii_lowercase());
    if has_upper && has_lower && checksum_encode(&raw) != address {
        return Err(AddressFault::ChecksumMismatch);
    }
    Ok(raw)
}

pub fn validate_address(address: &str) -> bool {
    decode_address(address).is_ok()
}

/// `0x` + 64 lowercase hex digits.
pub fn export_private_key(secret: &[u8]) -> Zeroizing<String> {
    let mut out = Zeroizing::new(String::with_capacity(2 + 2 * secret.len()));
    out.push_str("0x");
    out.push_str(&Zeroizing::new(hex::encode(secret)));
    out
}
