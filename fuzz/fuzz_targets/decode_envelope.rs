#![no_main]

use hwev_decoder::EventDecoder;
use libfuzzer_sys::fuzz_target;

// Fuzz target: envelope decode under both fault policies.
//
// Catches bugs in:
// - Key dispatch and the deferred timestamp checkpoint
// - Nested payload recovery after an encoding fault
// - Panics on truncated or non-UTF-8 input
//
// The strict decoder may only fail where the lenient one fails or drops
// a payload; it never succeeds where the lenient one errors.
fuzz_target!(|data: &[u8]| {
    let lenient = EventDecoder::default().envelope_from_slice(data);
    let strict = EventDecoder::strict().envelope_from_slice(data);

    if lenient.is_err() {
        assert!(strict.is_err());
    }
    if let (Ok(lenient), Ok(strict)) = (&lenient, &strict) {
        assert_eq!(lenient, strict);
    }
});
