//! Security-specific tests.
//!
//! These tests verify:
//! 1. Malformed inputs are rejected without panicking
//! 2. Secrets never appear in Debug or error output
//! 3. Address validators are total and strict
//! 4. Secret buffers are wiped

use anvil_core::codec::{ethereum, tron};
use anvil_core::{
    derive_account_with, entropy_to_mnemonic, generate_mnemonic, lookup, mnemonic_to_seed,
    parse_derivation_path, parse_mnemonic, registry, validate_address, DeriveRequest,
    MnemonicFault, PathProfile, SecureBuffer, WalletError,
};
use proptest::prelude::*;
use zeroize::Zeroize;

const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

// ============================================================================
// 1. Input Rejection
// ============================================================================

#[test]
fn test_negative_and_odd_entropy_sizes_rejected() {
    for bits in [0u32, 1, 8, 64, 96, 136, 255, 257, 384, u32::MAX] {
        assert!(matches!(
            generate_mnemonic(bits),
            Err(WalletError::InvalidEntropySize(b)) if b == bits
        ));
    }
}

#[test]
fn test_mnemonic_edge_cases_rejected() {
    let cases = [
        "",
        " ",
        "abandon",
        // Upper case is not in the word list.
        "ABANDON abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about",
        // 13 words.
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about",
    ];
    for phrase in cases {
        assert!(
            matches!(mnemonic_to_seed(phrase, ""), Err(WalletError::InvalidMnemonic(_))),
            "accepted {:?}",
            phrase
        );
    }
}

#[test]
fn test_unknown_word_error_omits_word() {
    let phrase = "abandon abandon abandon abandon abandon secretword abandon abandon abandon abandon abandon about";
    let err = parse_mnemonic(phrase).unwrap_err();
    assert_eq!(
        err,
        WalletError::InvalidMnemonic(MnemonicFault::UnknownWord { position: 5 })
    );
    assert!(!err.to_string().contains("secretword"));
    assert!(!format!("{:?}", err).contains("secretword"));
}

#[test]
fn test_hostile_paths_rejected() {
    let long = format!("m/{}", vec!["0'"; 1000].join("/"));
    let cases = [
        "m/44'/0'/0'/0/0\n",
        "m/44'/0'/0'/0/0/",
        "m/44'/0'/0'/0/٣",
        "m/44’/0'/0'/0/0",
        "m/44'/0'/0'/0/99999999999999999999",
        long.as_str(),
    ];
    for text in cases {
        assert!(parse_derivation_path(text, PathProfile::Bip44).is_err(), "{:?}", text);
        assert!(parse_derivation_path(text, PathProfile::Solana).is_err(), "{:?}", text);
    }
}

#[test]
fn test_request_for_unknown_coin_fails_before_derivation() {
    let seed = mnemonic_to_seed(ABANDON, "").unwrap();
    let err = derive_account_with(&seed, &DeriveRequest::new("DOGE2", "m/44'/3'/0'/0/0"))
        .unwrap_err();
    assert_eq!(err, WalletError::UnsupportedCoin("DOGE2".into()));
}

// ============================================================================
// 2. Secret Redaction
// ============================================================================

#[test]
fn test_debug_output_never_contains_secrets() {
    let mnemonic = parse_mnemonic(ABANDON).unwrap();
    let seed = mnemonic.to_seed("");
    let seed_hex = hex::encode(seed.as_bytes());

    assert!(!format!("{:?}", mnemonic).contains("abandon"));
    assert!(!format!("{:?}", seed).contains(&seed_hex[..16]));

    for coin in registry::all() {
        let path = coin.standard_paths[0];
        let account = derive_account_with(&seed, &DeriveRequest::new(coin.symbol, path)).unwrap();
        let secret_hex = hex::encode(account.private_key().as_slice());
        let exported = account.export_private_key().unwrap();

        let debug = format!("{:?}", account);
        assert!(!debug.contains(&secret_hex), "{}", coin.symbol);
        assert!(!debug.contains(exported.as_str()), "{}", coin.symbol);
        assert!(debug.contains("REDACTED"));

        let json = serde_json::to_string(&account.to_public()).unwrap();
        assert!(!json.contains(&secret_hex), "{}", coin.symbol);
        assert!(!json.contains(exported.as_str()), "{}", coin.symbol);
    }
}

#[test]
fn test_secure_buffer_debug_is_redacted() {
    let buffer = SecureBuffer::from_slice(&[0xAB; 32]);
    let debug = format!("{:?}", buffer);
    assert!(!debug.to_lowercase().contains("ab, ab"));
    assert!(!debug.contains("171"));
}

// ============================================================================
// 3. Validator Strictness
// ============================================================================

#[test]
fn test_single_character_corruption_is_caught() {
    let seed = mnemonic_to_seed(ABANDON, "").unwrap();
    for symbol in ["BTC", "DOGE", "TRX"] {
        let path = lookup(symbol).unwrap().standard_paths[0];
        let account = derive_account_with(&seed, &DeriveRequest::new(symbol, path)).unwrap();
        let address = account.address();
        assert!(validate_address(symbol, address));

        // Replace each character with a different Base58 character.
        for (i, c) in address.char_indices() {
            let replacement = if c == '2' { '3' } else { '2' };
            let mut corrupted = address.to_string();
            corrupted.replace_range(i..i + 1, &replacement.to_string());
            assert!(
                !validate_address(symbol, &corrupted),
                "{} accepted {}",
                symbol,
                corrupted
            );
        }
    }
}

#[test]
fn test_checksummed_eth_letter_flip_is_caught() {
    let address = "0x9858EfFD232B4033E47d90003D41EC34EcaEda94";
    for (i, c) in address.char_indices().skip(2) {
        if !c.is_ascii_alphabetic() {
            continue;
        }
        let flipped: String = if c.is_ascii_uppercase() {
            c.to_ascii_lowercase().to_string()
        } else {
            c.to_ascii_uppercase().to_string()
        };
        let mut corrupted = address.to_string();
        corrupted.replace_range(i..i + 1, &flipped);
        assert!(!ethereum::validate_address(&corrupted), "{}", corrupted);
    }
}

#[test]
fn test_tron_hex_rejects_wrong_prefix_and_length() {
    assert!(tron::address_to_hex("1LqBGSKuX5yYUonjxT5qGfpUsXKYYWeabA").is_err());
    assert!(tron::address_to_hex("TUEZSdKsoDHQMeZwihtdoBiN46zxhGWYd").is_err());
    assert!(tron::hex_to_address("0x").is_err());
    assert!(tron::hex_to_address("ff969ddd6b04052f60be05c9ee7ae228dafec5c9e5").is_err());
}

// ============================================================================
// 4. Buffer Wiping
// ============================================================================

#[test]
fn test_take_wipes_source() {
    let mut entropy = [0x5Au8; 16];
    let buffer = SecureBuffer::take(&mut entropy);
    assert_eq!(entropy, [0u8; 16]);

    let mnemonic = entropy_to_mnemonic(buffer.as_slice()).unwrap();
    assert_eq!(mnemonic.word_count(), 12);
}

#[test]
fn test_wiping_caller_copies_keeps_wallet_recoverable() {
    // Entropy and phrase are wiped by the caller once encoded; the mnemonic
    // and the derived accounts own their own copies.
    let mut entropy = vec![0x42u8; 16];
    let mnemonic = entropy_to_mnemonic(&entropy).unwrap();
    entropy.zeroize();
    assert!(entropy.is_empty() || entropy.iter().all(|&b| b == 0));

    let mut phrase = mnemonic.phrase().to_string();
    let seed = mnemonic_to_seed(&phrase, "").unwrap();
    phrase.zeroize();
    assert!(phrase.is_empty());

    let path = lookup("ETH").unwrap().standard_paths[0];
    let account = derive_account_with(&seed, &DeriveRequest::new("ETH", path)).unwrap();
    let mut exported = account.export_private_key().unwrap().to_string();
    let secret_hex = format!("0x{}", hex::encode(account.private_key().as_slice()));
    assert_eq!(exported, secret_hex);
    exported.zeroize();
    assert!(exported.is_empty());

    let again = entropy_to_mnemonic(&[0x42u8; 16]).unwrap();
    let seed_again = again.to_seed("");
    let account_again =
        derive_account_with(&seed_again, &DeriveRequest::new("ETH", path)).unwrap();
    assert_eq!(account.address(), account_again.address());
}

// ============================================================================
// 5. Totality (no panics on arbitrary input)
// ============================================================================

proptest! {
    #[test]
    fn prop_validators_never_panic(symbol in "[A-Za-z]{0,5}", address in "\\PC{0,64}") {
        let _ = validate_address(&symbol, &address);
        for coin in registry::all() {
            let _ = coin.codec.validate_address(&address);
        }
    }

    #[test]
    fn prop_tron_hex_never_panics(text in "\\PC{0,50}") {
        let _ = tron::hex_to_address(&text);
        let _ = tron::address_to_hex(&text);
        let _ = ethereum::to_checksum_address(&text);
    }

    #[test]
    fn prop_mnemonic_parse_never_panics(words in proptest::collection::vec("[a-z]{1,8}", 0..30)) {
        let _ = parse_mnemonic(&words.join(" "));
    }

    #[test]
    fn prop_entropy_round_trips_to_valid_mnemonic(entropy in proptest::collection::vec(any::<u8>(), 32)) {
        let mnemonic = entropy_to_mnemonic(&entropy).unwrap();
        prop_assert_eq!(mnemonic.word_count(), 24);
        prop_assert!(parse_mnemonic(&mnemonic.phrase()).is_ok());
    }
}
