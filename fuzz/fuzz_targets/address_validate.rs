#![no_main]

use anvil_core::codec::{ethereum, tron};
use anvil_core::registry;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Validators and converters are total: any string gives a bool or an Err.
    if let Ok(s) = std::str::from_utf8(data) {
        for coin in registry::all() {
            let _ = coin.codec.validate_address(s);
        }
        if let Ok(hex) = tron::address_to_hex(s) {
            assert_eq!(tron::hex_to_address(&hex).ok().as_deref(), Some(s));
        }
        if let Ok(checksummed) = ethereum::to_checksum_address(s) {
            assert!(ethereum::validate_address(&checksummed));
        }
    }
});
