//! TRON addresses.
//!
//! Same 20-byte account identifier as EVM chains, prefixed with `0x41` and
//! Base58Check encoded. Mainnet addresses therefore always start with `T`.

use zeroize::Zeroizing;

use super::{base58, ethereum};
use crate::error::AddressFault;

/// Version byte of every mainnet TRON address.
pub const ADDRESS_PREFIX: u8 = 0x41;

const PAYLOAD_LEN: usize = 1 + ethereum::ADDRESS_LEN;

fn encode_raw(raw: &[u8; ethereum::ADDRESS_LEN]) -> String {
    let mut payload = [0u8; PAYLOAD_LEN];
    payload[0] = ADDRESS_PREFIX;
    payload[1..].copy_from_slice(raw);
    base58::check_encode(&payload)
}

pub fn public_key_to_address(public_key: &[u8]) -> Result<String, AddressFault> {
    Ok(encode_raw(&ethereum::raw_address(public_key)?))
}

/// Decode a Base58Check TRON address into its 20-byte account identifier.
pub fn decode_address(address: &str) -> Result<[u8; ethereum::ADDRESS_LEN], AddressFault> {
    let payload = base58::check_decode(address, PAYLOAD_LEN)?;
    if payload[0] != ADDRESS_PREFIX {
        return Err(AddressFault::BadPrefix(payload[0]));
    }
    let mut raw = [0u8; ethereum::ADDRESS_LEN];
    raw.copy_from_slice(&payload[1..]);
    Ok(raw)
}

pub fn validate_address(address: &str) -> bool {
    decode_address(address).is_ok()
}

/// Convert a Base58 address to its `0x`-prefixed, 40-digit hex form.
pub fn address_to_hex(address: &str) -> Result<String, AddressFault> {
    Ok(format!("0x{}", hex::encode(decode_address(address)?)))
}

/// Convert a hex account identifier back to a Base58 address.
///
/// Accepts 40 hex digits with an optional `0x`, or the 42-digit form that
/// already carries the `41` prefix.
pub fn hex_to_address(text: &str) -> Result<String, AddressFault> {
    let body = text.strip_prefix("0x").unwrap_or(text);
    let body = match body.len() {
        40 => body,
        42 if body.starts_with("41") => &body[2..],
        42 => {
            let prefix = body
                .get(..2)
                .and_then(|p| u8::from_str_radix(p, 16).ok())
                .ok_or_else(|| AddressFault::BadEncoding("invalid hex prefix".into()))?;
            return Err(AddressFault::BadPrefix(prefix));
        }
        actual => {
            return Err(AddressFault::BadLength {
                expected: 40,
                actual,
            })
        }
    };

    let mut raw = [0u8; ethereum::ADDRESS_LEN];
    hex::decode_to_slice(body, &mut raw).map_err(|e| AddressFault::BadEncoding(e.to_string()))?;
    Ok(encode_raw(&raw))
}

/// 64 lowercase hex digits, no prefix.
pub fn export_private_key(secret: &[u8]) -> Zeroizing<String> {
    Zeroizing::new(hex::encode(secret))
}
