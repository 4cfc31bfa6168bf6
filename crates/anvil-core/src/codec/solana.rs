//! Solana addresses: the raw 32-byte ed25519 public key in Base58, no checksum.

use zeroize::Zeroizing;

use super::base58;
use crate::error::AddressFault;

pub const PUBLIC_KEY_LEN: usize = 32;

pub fn public_key_to_address(public_key: &[u8]) -> Result<String, AddressFault> {
    if public_key.len() != PUBLIC_KEY_LEN {
        return Err(AddressFault::BadLength {
            expected: PUBLIC_KEY_LEN,
            actual: public_key.len(),
        });
    }
    Ok(base58::encode(public_key))
}

/// Decode an address back into the 32 public key bytes.
///
/// Any 32-byte value is accepted; the point is not checked to be on the curve.
pub fn decode_address(address: &str) -> Result<[u8; PUBLIC_KEY_LEN], AddressFault> {
    let bytes = base58::decode(address)?;
    <[u8; PUBLIC_KEY_LEN]>::try_from(bytes.as_slice()).map_err(|_| AddressFault::BadLength {
        expected: PUBLIC_KEY_LEN,
        actual: bytes.len(),
    })
}

pub fn validate_address(address: &str) -> bool {
    decode_address(address).is_ok()
}

/// Base58 of the 64-byte keypair `secret || public`, the form wallets import.
pub fn export_keypair(secret: &[u8], public_key: &[u8]) -> Zeroizing<String> {
    let mut keypair = Zeroizing::new(Vec::with_capacity(secret.len() + public_key.len()));
    keypair.extend_from_slice(secret);
    keypair.extend_from_slice(public_key);
    Zeroizing::new(base58::encode(&keypair))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_program_addresses() {
        assert_eq!(
            public_key_to_address(&[0u8; 32]).unwrap(),
            "11111111111111111111111111111111"
        );
        assert!(validate_address("11111111111111111111111111111111"));
        assert!(validate_address("11111111111111111111111111111112"));
    }

    #[test]
    fn test_rejects_wrong_lengths() {
        assert!(matches!(
            public_key_to_address(&[1u8; 33]),
            Err(AddressFault::BadLength {
                expected: 32,
                actual: 33
            })
        ));
        assert!(!validate_address(""));
        assert!(!validate_address("1111111111111111111111111111111"));
        assert!(!validate_address("TUEZSdKsoDHQMeZwihtdoBiN46zxhGWYdH"));
        assert!(!validate_address("0x9858EfFD232B4033E47d90003D41EC34EcaEda94"));
    }

    #[test]
    fn test_keypair_export_decodes_to_64_bytes() {
        let exported = export_keypair(&[7u8; 32], &[9u8; 32]);
        let raw = base58::decode(&exported).unwrap();
        assert_eq!(raw.len(), 64);
        assert_eq!(&raw[..32], &[7u8; 32]);
        assert_eq!(&raw[32..], &[9u8; 32]);
    }
}
