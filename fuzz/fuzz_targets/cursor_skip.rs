#![no_main]

use hwev_wire::JsonCursor;
use libfuzzer_sys::fuzz_target;

// Fuzz target: JsonCursor::skip and capture_raw.
//
// Catches bugs in:
// - Bracket matching and the nesting limit
// - String scanning across buffer refills
// - Capture bookkeeping when a value straddles a refill
//
// Whatever skip accepts, capture_raw accepts too, and the captured span
// re-skips cleanly.
fuzz_target!(|data: &[u8]| {
    let skipped = JsonCursor::new(data).skip().is_ok();

    let mut cursor = JsonCursor::new(data);
    let captured = cursor.capture_raw().map(<[u8]>::to_vec);
    assert_eq!(skipped, captured.is_ok());

    if let Ok(span) = captured {
        assert!(JsonCursor::new(&span[..]).skip().is_ok());
    }
});
