//! BIP-39 mnemonic and seed management
//!
//! Handles entropy generation, mnemonic encoding/validation and the
//! PBKDF2-HMAC-SHA512 seed stretch. Entropy and seed bytes only ever live
//! inside a [`SecureBuffer`].

use std::fmt;

use bip39::Language;
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{ZeroizeOnDrop, Zeroizing};

use crate::error::{MnemonicFault, Result, WalletError};
use crate::memory::SecureBuffer;

/// Entropy sizes accepted by BIP-39, in bits.
pub const ENTROPY_BITS: [u32; 5] = [128, 160, 192, 224, 256];

/// Length of a BIP-39 seed in bytes.
pub const SEED_LEN: usize = 64;

/// A validated BIP-39 mnemonic (English word list).
///
/// `Debug` is redacted; use [`Mnemonic::phrase`] to get the words. The word
/// indices are wiped when the value (or any clone of it) is dropped.
#[derive(Clone, PartialEq, Eq)]
pub struct Mnemonic(bip39::Mnemonic);

// The only field is `bip39::Mnemonic`, which zeroizes itself on drop.
impl ZeroizeOnDrop for Mnemonic {}

// Fails to build if bip39 loses its `zeroize` feature.
const _: fn() = || {
    fn wiped_on_drop<T: ZeroizeOnDrop>() {}
    wiped_on_drop::<bip39::Mnemonic>();
};

impl Mnemonic {
    /// The space-separated phrase, in a zeroizing container.
    pub fn phrase(&self) -> Zeroizing<String> {
        Zeroizing::new(self.0.to_string())
    }

    pub fn word_count(&self) -> usize {
        self.0.word_count()
    }

    /// Derive the 64-byte seed with an optional passphrase.
    pub fn to_seed(&self, passphrase: &str) -> Seed {
        let mut bytes = self.0.to_seed(passphrase);
        Seed(SecureBuffer::take(&mut bytes))
    }
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mnemonic([REDACTED; {} words])", self.word_count())
    }
}

/// A 64-byte BIP-39 seed.
#[derive(Clone, PartialEq, Eq)]
pub struct Seed(SecureBuffer);

impl Seed {
    /// Wrap raw seed bytes, wiping the caller's array.
    pub fn from_bytes(bytes: &mut [u8; SEED_LEN]) -> Self {
        Seed(SecureBuffer::take(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed([REDACTED; 64])")
    }
}

fn check_entropy_bits(bits: u32) -> Result<()> {
    if ENTROPY_BITS.contains(&bits) {
        Ok(())
    } else {
        Err(WalletError::InvalidEntropySize(bits))
    }
}

/// Map a mnemonic word count to its entropy size in bits.
pub fn entropy_bits_for_words(words: usize) -> Result<u32> {
    match words {
        12 => Ok(128),
        15 => Ok(160),
        18 => Ok(192),
        21 => Ok(224),
        24 => Ok(256),
        other => Err(WalletError::InvalidMnemonic(MnemonicFault::BadWordCount(
            other,
        ))),
    }
}

/// Draw `bits / 8` bytes from the operating system's secure random source.
///
/// There is no fallback: if the OS source fails, so does this call.
pub fn generate_entropy(bits: u32) -> Result<SecureBuffer> {
    check_entropy_bits(bits)?;
    let mut entropy = SecureBuffer::new((bits / 8) as usize);
    OsRng
        .try_fill_bytes(entropy.as_mut_slice())
        .map_err(|e| WalletError::RngUnavailable(e.to_string()))?;
    Ok(entropy)
}

/// Encode raw entropy as a mnemonic. Deterministic.
pub fn entropy_to_mnemonic(entropy: &[u8]) -> Result<Mnemonic> {
    let bits = u32::try_from(entropy.len() * 8).unwrap_or(u32::MAX);
    check_entropy_bits(bits)?;
    bip39::Mnemonic::from_entropy_in(Language::English, entropy)
        .map(Mnemonic)
        .map_err(|e| WalletError::InvalidMnemonic(map_bip39_error(e)))
}

/// Generate a fresh mnemonic backed by `bits` of OS entropy.
pub fn generate_mnemonic(bits: u32) -> Result<Mnemonic> {
    let entropy = generate_entropy(bits)?;
    let mnemonic = entropy_to_mnemonic(entropy.as_slice())?;
    log::debug!("generated {}-word mnemonic", mnemonic.word_count());
    Ok(mnemonic)
}

/// Generate a fresh mnemonic with the given number of words.
pub fn generate_mnemonic_words(words: usize) -> Result<Mnemonic> {
    generate_mnemonic(entropy_bits_for_words(words)?)
}

/// Parse and validate a mnemonic phrase (word list membership and checksum).
pub fn parse_mnemonic(phrase: &str) -> Result<Mnemonic> {
    bip39::Mnemonic::parse_in(Language::English, phrase)
        .map(Mnemonic)
        .map_err(|e| WalletError::InvalidMnemonic(map_bip39_error(e)))
}

/// Validate `phrase` and stretch it into a seed.
pub fn mnemonic_to_seed(phrase: &str, passphrase: &str) -> Result<Seed> {
    let mnemonic = parse_mnemonic(phrase)?;
    Ok(mnemonic.to_seed(passphrase))
}

fn map_bip39_error(err: bip39::Error) -> MnemonicFault {
    match err {
        bip39::Error::UnknownWord(position) => MnemonicFault::UnknownWord { position },
        bip39::Error::InvalidChecksum => MnemonicFault::ChecksumMismatch,
        bip39::Error::BadWordCount(count) => MnemonicFault::BadWordCount(count),
        other => MnemonicFault::Other(other.to_string()),
    }
}
