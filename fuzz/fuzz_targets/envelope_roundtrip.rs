#![no_main]

use arbitrary::Arbitrary;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use hwev_decoder::EventDecoder;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    id: String,
    kind: String,
    version: String,
    data: Vec<u8>,
}

// Fuzz target: arbitrary strings and bytes survive encode -> decode.
//
// The envelope is written with serde_json, so key order and escaping
// differ from any hand-written fixture.
fuzz_target!(|input: Input| {
    let json = serde_json::json!({
        "id": input.id,
        "type": input.kind,
        "data": { "version": input.version, "data": STANDARD.encode(&input.data) },
    });
    let bytes = serde_json::to_vec(&json).unwrap();

    let envelope = EventDecoder::strict().envelope_from_slice(&bytes).unwrap();
    assert_eq!(envelope.id, input.id);
    assert_eq!(envelope.kind, input.kind);
    let payload = envelope.data.unwrap();
    assert_eq!(payload.version, input.version);
    assert_eq!(payload.data, input.data);
});
