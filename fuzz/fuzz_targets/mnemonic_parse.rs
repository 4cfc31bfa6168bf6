#![no_main]

use anvil_core::seed::parse_mnemonic;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // parse_mnemonic must return Ok or Err for any UTF-8 input, and an
    // accepted phrase must survive a second parse unchanged.
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(mnemonic) = parse_mnemonic(s) {
            let again = parse_mnemonic(&mnemonic.phrase()).expect("normalized phrase reparses");
            assert_eq!(again, mnemonic);
        }
    }
});
