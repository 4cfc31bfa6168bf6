//! End-to-end wallet flows: generate, back up, recover, check.

use anvil_core::{
    derive_account_with, derive_standard_accounts, derive_wallet, generate_mnemonic_words,
    lookup, mnemonic_to_seed, registry, validate_address, ChildPolicy, DeriveRequest,
    PublicAccount,
};

#[test]
fn test_generate_then_recover_gives_same_wallet() {
    let symbols: Vec<&str> = registry::all().iter().map(|c| c.symbol).collect();

    let mnemonic = generate_mnemonic_words(24).unwrap();
    let original = derive_wallet(&mnemonic.to_seed("hunter2"), symbols.as_slice()).unwrap();

    // What the user writes down is the phrase; recovery starts from text.
    let phrase = mnemonic.phrase();
    let recovered = derive_wallet(&mnemonic_to_seed(&phrase, "hunter2").unwrap(), symbols.as_slice())
        .unwrap();

    assert_eq!(original.len(), recovered.len());
    for (a, b) in original.iter().zip(&recovered) {
        assert_eq!(a.symbol(), b.symbol());
        assert_eq!(a.path(), b.path());
        assert_eq!(a.address(), b.address());
        assert_eq!(a.private_key(), b.private_key());
        assert!(validate_address(a.symbol(), a.address()));
    }
}

#[test]
fn test_wrong_passphrase_gives_different_wallet() {
    let mnemonic = generate_mnemonic_words(12).unwrap();
    let phrase = mnemonic.phrase();
    let a = derive_standard_accounts(&mnemonic_to_seed(&phrase, "").unwrap(), "ETH").unwrap();
    let b = derive_standard_accounts(&mnemonic_to_seed(&phrase, " ").unwrap(), "ETH").unwrap();
    for (x, y) in a.iter().zip(&b) {
        assert_ne!(x.address(), y.address());
    }
}

#[test]
fn test_addresses_are_distinct_across_paths() {
    let mnemonic = generate_mnemonic_words(12).unwrap();
    let seed = mnemonic.to_seed("");
    for coin in registry::all() {
        let accounts = derive_standard_accounts(&seed, coin.symbol).unwrap();
        let mut addresses: Vec<&str> = accounts.iter().map(|a| a.address()).collect();
        addresses.sort_unstable();
        addresses.dedup();
        assert_eq!(addresses.len(), coin.standard_paths.len(), "{}", coin.symbol);
    }
}

#[test]
fn test_policies_agree_on_ordinary_paths() {
    let seed = mnemonic_to_seed(
        "legal winner thank year wave sausage worth useful legal winner thank yellow",
        "",
    )
    .unwrap();
    for coin in registry::all() {
        for path in coin.standard_paths {
            let retry = derive_account_with(
                &seed,
                &DeriveRequest::new(coin.symbol, *path).with_policy(ChildPolicy::Retry),
            )
            .unwrap();
            let fail = derive_account_with(
                &seed,
                &DeriveRequest::new(coin.symbol, *path).with_policy(ChildPolicy::Fail),
            )
            .unwrap();
            assert_eq!(retry.address(), fail.address());
            assert_eq!(retry.path().to_string(), *path);
        }
    }
}

#[test]
fn test_public_export_round_trips_through_json() {
    let seed = mnemonic_to_seed(
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about",
        "",
    )
    .unwrap();
    let accounts = derive_standard_accounts(&seed, "BTC").unwrap();
    let public: Vec<PublicAccount> = accounts.iter().map(|a| a.to_public()).collect();

    let json = serde_json::to_string(&public).unwrap();
    let back: Vec<PublicAccount> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, public);
    assert_eq!(back[0].address, "1LqBGSKuX5yYUonjxT5qGfpUsXKYYWeabA");
    assert_eq!(back[0].public_key.len(), 66);
    assert!(back[0].chain_id.is_none());

    assert_eq!(lookup("BTC").unwrap().standard_paths[1], back[1].path);
}
