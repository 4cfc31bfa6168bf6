#![no_main]

use anvil_core::path::{parse_derivation_path, PathProfile};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        for profile in [PathProfile::Bip44, PathProfile::Solana] {
            if let Ok(path) = parse_derivation_path(s, profile) {
                assert_eq!(path.format(), s);
            }
        }
    }
});
