//! Golden fixture generator for the hwev conformance test suite.
//!
//! Writes every fixture under `tests/golden/`. Fixtures a conforming
//! producer would emit go through the reference encoder in this crate;
//! the rest are handcrafted to cover input no encoder writes (escapes,
//! unknown keys, broken values).
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin generate_golden -p hwev-tests
//! ```
//!
//! # Generated fixtures
//!
//! | File                       | Contents                                      |
//! |----------------------------|-----------------------------------------------|
//! | minimal.json               | id/type/time only, no payload                 |
//! | full.json                  | header + `v1` payload `[00 01 02 ff]`         |
//! | offset_time.json           | `+02:00` offset with fractional seconds       |
//! | empty_payload.json         | no time, payload with empty version and data  |
//! | unknown_fields.json        | Handcrafted: pretty-printed, extra keys nested|
//! | escaped_strings.json       | Handcrafted: `\u` surrogates, `\"`, `\/`      |
//! | null_data.json             | Handcrafted: `"data": null`                   |
//! | bad_payload.json           | Handcrafted: payload data is not base64       |
//! | bad_timestamp.json         | Handcrafted: month 13                         |
//! | bare_payload.json          | Handcrafted: standalone payload, object data  |
//! | bare_payload_string.json   | Handcrafted: standalone payload, string data  |

#![allow(clippy::pedantic)]

use std::path::Path;

use hwev_tests::{encode_envelope, golden_dir};
use hwev_types::{Envelope, Payload, parse_timestamp};

fn main() {
    let golden = golden_dir();

    generate_encoded(&golden);
    generate_handcrafted(&golden);

    println!("All golden fixtures written to {}", golden.display());
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn write_file(path: &Path, data: &[u8]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create_dir_all");
    }
    std::fs::write(path, data).expect("write_file");
    println!("  wrote {}", path.display());
}

fn envelope(id: &str, kind: &str, time: Option<&str>, data: Option<Payload>) -> Envelope {
    Envelope {
        id: id.to_string(),
        kind: kind.to_string(),
        time: time.map(|t| parse_timestamp(t).expect("fixture timestamp")),
        data,
    }
}

// ── Fixture generators ────────────────────────────────────────────────────────

fn generate_encoded(golden: &Path) {
    let fixtures = [
        (
            "minimal.json",
            envelope("evt-0001", "heartbeat", Some("2020-01-01T00:00:00Z"), None),
        ),
        (
            "full.json",
            envelope(
                "evt-0002",
                "temperature",
                Some("2020-01-01T00:00:00Z"),
                Some(Payload::new("v1", vec![0x00, 0x01, 0x02, 0xFF])),
            ),
        ),
        (
            "offset_time.json",
            envelope(
                "evt-0003",
                "motion",
                Some("2021-06-01T14:30:45.125+02:00"),
                Some(Payload::new("v2", &b"ok"[..])),
            ),
        ),
        (
            "empty_payload.json",
            envelope("evt-0005", "heartbeat", None, Some(Payload::default())),
        ),
    ];

    for (name, fixture) in &fixtures {
        write_file(&golden.join(name), &encode_envelope(fixture));
    }
}

fn generate_handcrafted(golden: &Path) {
    write_file(
        &golden.join("unknown_fields.json"),
        br#"{
  "version": "2",
  "specversion": {"major": 1, "minor": [0, {"patch": null}]},
  "id": "evt-0004",
  "source": "/plant/line-3",
  "type": "door",
  "tags": ["a", "b", {"c": [true, false, -1.5e3]}],
  "time": "2022-02-02T02:02:02Z",
  "": "empty key",
  "data": {
    "schema": {"fields": []},
    "version": "v3",
    "data": "3q2+7w=="
  },
  "trailer": "x"
}
"#,
    );

    write_file(
        &golden.join("escaped_strings.json"),
        br#"{"id":"sensor-\u00e9\ud83d\udd25","type":"door \"front\"\tleft","time":"2023-07-04T12:00:00Z","data":{"version":"v\/2","data":"AAEC\/w=="}}"#,
    );

    write_file(
        &golden.join("null_data.json"),
        br#"{"id":"evt-0006","type":"power","time":"2020-01-01T00:00:00Z","data":null}"#,
    );

    write_file(
        &golden.join("bad_payload.json"),
        br#"{"id":"evt-0007","type":"power","time":"2020-01-01T00:00:00Z","data":{"version":"v1","data":"not*base64"}}"#,
    );

    write_file(
        &golden.join("bad_timestamp.json"),
        br#"{"id":"evt-0008","type":"power","time":"2020-13-45T99:00:00Z"}"#,
    );

    write_file(
        &golden.join("bare_payload.json"),
        br#"{"version":"v2","data":{"reading":21.5,"unit":"C"}}"#,
    );

    write_file(
        &golden.join("bare_payload_string.json"),
        br#"{"data":"AAEC\/w==","version":"v1"}"#,
    );
}
