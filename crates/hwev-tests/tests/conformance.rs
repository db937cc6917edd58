//! Conformance tests: golden fixture files decoded and rendered to inline
//! insta snapshots.
//!
//! Each test reads a committed `.json` fixture from `tests/golden/`,
//! decodes it with [`EventDecoder`], and renders the result with
//! [`summarize`]. A diff in a snapshot signals either a deliberate
//! behaviour change (accept via `cargo insta review`) or a regression.
//!
//! The fixtures are written by `src/bin/generate_golden.rs`.

use hwev_decoder::{EventDecoder, FaultKind};
use hwev_tests::{golden, summarize};
use insta::assert_snapshot;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn render(fixture: &str) -> String {
    let bytes = golden(fixture);
    let envelope = EventDecoder::default()
        .envelope_from_slice(&bytes)
        .unwrap_or_else(|e| panic!("decode failed for {fixture}: {e}"));
    summarize(&envelope)
}

// ── Envelopes ─────────────────────────────────────────────────────────────────

#[test]
fn minimal() {
    assert_snapshot!(render("minimal.json"), @r#"
    id:      "evt-0001"
    type:    "heartbeat"
    time:    2020-01-01T00:00:00Z
    payload: none
    "#);
}

#[test]
fn full() {
    assert_snapshot!(render("full.json"), @r#"
    id:      "evt-0002"
    type:    "temperature"
    time:    2020-01-01T00:00:00Z
    payload: "v1" 4 bytes 000102ff
    "#);
}

#[test]
fn offset_time() {
    assert_snapshot!(render("offset_time.json"), @r#"
    id:      "evt-0003"
    type:    "motion"
    time:    2021-06-01T14:30:45.125+02:00
    payload: "v2" 2 bytes 6f6b
    "#);
}

#[test]
fn empty_payload() {
    assert_snapshot!(render("empty_payload.json"), @r#"
    id:      "evt-0005"
    type:    "heartbeat"
    time:    none
    payload: "" 0 bytes
    "#);
}

#[test]
fn unknown_fields() {
    assert_snapshot!(render("unknown_fields.json"), @r#"
    id:      "evt-0004"
    type:    "door"
    time:    2022-02-02T02:02:02Z
    payload: "v3" 4 bytes deadbeef
    "#);
}

#[test]
fn escaped_strings() {
    assert_snapshot!(render("escaped_strings.json"), @r#"
    id:      "sensor-é🔥"
    type:    "door \"front\"\tleft"
    time:    2023-07-04T12:00:00Z
    payload: "v/2" 4 bytes 000102ff
    "#);
}

#[test]
fn null_data() {
    assert_snapshot!(render("null_data.json"), @r#"
    id:      "evt-0006"
    type:    "power"
    time:    2020-01-01T00:00:00Z
    payload: "" 0 bytes
    "#);
}

#[test]
fn bad_payload_is_dropped() {
    assert_snapshot!(render("bad_payload.json"), @r#"
    id:      "evt-0007"
    type:    "power"
    time:    2020-01-01T00:00:00Z
    payload: none
    "#);
}

// ── Failures ──────────────────────────────────────────────────────────────────

#[test]
fn bad_payload_fails_strict() {
    let err = EventDecoder::strict()
        .envelope_from_slice(&golden("bad_payload.json"))
        .unwrap_err();
    assert_eq!(err.kind(), FaultKind::Encoding);
    assert_snapshot!(err.to_string(), @"payload data is not valid base64");
}

#[test]
fn bad_timestamp() {
    let bytes = golden("bad_timestamp.json");
    let lenient = EventDecoder::default().envelope_from_slice(&bytes).unwrap_err();
    let strict = EventDecoder::strict().envelope_from_slice(&bytes).unwrap_err();

    assert_eq!(lenient.kind(), FaultKind::Timestamp);
    assert_eq!(strict.kind(), FaultKind::Timestamp);
    assert_eq!(lenient.to_string(), strict.to_string());
    assert_snapshot!(lenient.to_string(), @r#"invalid timestamp "2020-13-45T99:00:00Z""#);
}

// ── Bare payloads ─────────────────────────────────────────────────────────────

#[test]
fn bare_payload_object() {
    let payload = EventDecoder::default()
        .payload_from_slice(&golden("bare_payload.json"))
        .unwrap();
    assert_eq!(payload.version, "v2");
    assert_snapshot!(payload.data_str().unwrap(), @r#"{"reading":21.5,"unit":"C"}"#);
}

#[test]
fn bare_payload_string() {
    let payload = EventDecoder::default()
        .payload_from_slice(&golden("bare_payload_string.json"))
        .unwrap();
    assert_eq!(payload.version, "v1");
    assert_snapshot!(payload.data_str().unwrap(), @r#""AAEC\/w==""#);
}
