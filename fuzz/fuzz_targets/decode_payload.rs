#![no_main]

use hwev_decoder::decode_payload;
use libfuzzer_sys::fuzz_target;

// Fuzz target: standalone payload decode with the raw `data` rule.
//
// A successful decode's `data` is a span of the input, so it can never
// be longer than the input itself.
fuzz_target!(|data: &[u8]| {
    if let Ok(payload) = decode_payload(data) {
        assert!(payload.data.len() <= data.len());
    }
});
