//! Error types shared by every derivation and encoding step.
//!
//! None of the variants carry secret material. Mnemonic faults report the
//! offending word position, never the word.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("Invalid entropy size: {0} bits (expected 128, 160, 192, 224 or 256)")]
    InvalidEntropySize(u32),
    #[error("Secure random source unavailable: {0}")]
    RngUnavailable(String),
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(MnemonicFault),
    #[error("Invalid derivation path: {0}")]
    InvalidDerivationPath(String),
    #[error("Key derivation failed: {0}")]
    KeyDerivationFailure(String),
    #[error("Unsupported coin: {0}")]
    UnsupportedCoin(String),
    #[error("Address encoding failed: {0}")]
    AddressEncodingFailure(AddressFault),
}

/// Why a mnemonic was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MnemonicFault {
    #[error("word {position} is not in the word list")]
    UnknownWord { position: usize },
    #[error("checksum mismatch")]
    ChecksumMismatch,
    #[error("bad word count {0} (expected 12, 15, 18, 21 or 24)")]
    BadWordCount(usize),
    #[error("{0}")]
    Other(String),
}

/// Why an address payload could not be encoded or decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressFault {
    #[error("payload has length {actual}, expected {expected}")]
    BadLength { expected: usize, actual: usize },
    #[error("unexpected prefix byte 0x{0:02x}")]
    BadPrefix(u8),
    #[error("checksum mismatch")]
    ChecksumMismatch,
    #[error("malformed encoding: {0}")]
    BadEncoding(String),
    #[error("invalid public key: {0}")]
    BadPublicKey(String),
}

impl From<AddressFault> for WalletError {
    fn from(fault: AddressFault) -> Self {
        WalletError::AddressEncodingFailure(fault)
    }
}

impl From<MnemonicFault> for WalletError {
    fn from(fault: MnemonicFault) -> Self {
        WalletError::InvalidMnemonic(fault)
    }
}

pub type Result<T, E = WalletError> = std::result::Result<T, E>;
