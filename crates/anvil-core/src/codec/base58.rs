//! Base58 and Base58Check helpers shared by the Bitcoin, TRON and Solana codecs.

use bitcoin::hashes::{sha256d, Hash};

use crate::error::AddressFault;

/// Length of the Base58Check checksum suffix.
pub const CHECKSUM_LEN: usize = 4;

/// First four bytes of SHA256(SHA256(payload)).
pub fn checksum(payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let digest = sha256d::Hash::hash(payload).to_byte_array();
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&digest[..CHECKSUM_LEN]);
    out
}

pub fn encode(data: &[u8]) -> String {
    bs58::encode(data).into_string()
}

pub fn decode(text: &str) -> Result<Vec<u8>, AddressFault> {
    bs58::decode(text)
        .into_vec()
        .map_err(|e| AddressFault::BadEncoding(e.to_string()))
}

/// Base58 of `payload || checksum(payload)`.
pub fn check_encode(payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(payload.len() + CHECKSUM_LEN);
    data.extend_from_slice(payload);
    data.extend_from_slice(&checksum(payload));
    encode(&data)
}

/// Decode a Base58Check string whose payload must be `payload_len` bytes.
///
/// Returns the payload without its checksum.
pub fn check_decode(text: &str, payload_len: usize) -> Result<Vec<u8>, AddressFault> {
    let mut data = decode(text)?;
    let expected = payload_len + CHECKSUM_LEN;
    if data.len() != expected {
        return Err(AddressFault::BadLength {
            expected,
            actual: data.len(),
        });
    }
    let provided = data.split_off(payload_len);
    if provided != checksum(&data) {
        return Err(AddressFault::ChecksumMismatch);
    }
    Ok(data)
}
