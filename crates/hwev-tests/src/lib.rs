//! Shared helpers for the hwev integration tests, benches and the golden
//! fixture generator.
//!
//! The reference encoder here writes envelopes the way a conforming
//! producer does: compact JSON, keys in `id, type, time, data` order,
//! payload bytes as standard padded base64.

#![allow(clippy::pedantic)]

use std::io::Read;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use hwev_types::{Envelope, Payload, format_timestamp, parse_timestamp};
use serde_json::Value;

// ── Reference encoder ────────────────────────────────────────────────────────

/// Encode an envelope as compact JSON. Absent `time` and `data` are
/// left out.
pub fn encode_envelope(envelope: &Envelope) -> Vec<u8> {
    let mut fields = vec![
        ("id", Value::from(envelope.id.as_str()).to_string()),
        ("type", Value::from(envelope.kind.as_str()).to_string()),
    ];
    if let Some(time) = envelope.time {
        let text = format_timestamp(time).expect("timestamp has an RFC 3339 form");
        fields.push(("time", Value::from(text).to_string()));
    }
    if let Some(payload) = &envelope.data {
        fields.push(("data", encode_payload(payload)));
    }
    object(&fields).into_bytes()
}

/// Encode a payload object as it appears nested under `data`.
pub fn encode_payload(payload: &Payload) -> String {
    object(&[
        ("version", Value::from(payload.version.as_str()).to_string()),
        ("data", Value::from(STANDARD.encode(&payload.data)).to_string()),
    ])
}

/// Join already-encoded values into an object, keeping field order.
fn object(fields: &[(&str, String)]) -> String {
    let body: Vec<String> = fields
        .iter()
        .map(|(key, value)| format!("{}:{value}", Value::from(*key)))
        .collect();
    format!("{{{}}}", body.join(","))
}

// ── Sample data ──────────────────────────────────────────────────────────────

/// A deterministic envelope that differs for every `seq`.
///
/// Every third envelope has no payload; payload sizes cycle through
/// 0..64 bytes.
pub fn sample_envelope(seq: usize) -> Envelope {
    let time = parse_timestamp(&format!(
        "2024-03-{:02}T{:02}:{:02}:{:02}Z",
        seq % 28 + 1,
        seq % 24,
        seq % 60,
        (seq * 7) % 60
    ))
    .expect("generated timestamp is valid");

    let data = (seq % 3 != 0).then(|| {
        let bytes: Vec<u8> = (0..seq % 64).map(|i| (i * 31 + seq) as u8).collect();
        Payload::new(format!("v{}", seq % 4), bytes)
    });

    Envelope {
        id: format!("evt-{seq:06}"),
        kind: ["temperature", "door", "motion", "power"][seq % 4].to_string(),
        time: Some(time),
        data,
    }
}

/// An envelope carrying `len` payload bytes covering every byte value.
pub fn large_envelope(len: usize) -> Envelope {
    Envelope {
        id: "evt-large".to_string(),
        kind: "firmware".to_string(),
        time: Some(parse_timestamp("2024-01-01T00:00:00Z").expect("valid timestamp")),
        data: Some(Payload::new("v9", (0..len).map(|i| i as u8).collect::<Vec<_>>())),
    }
}

// ── Rendering ────────────────────────────────────────────────────────────────

/// Render an envelope as stable multi-line text for snapshot tests.
///
/// ```text
/// id:      "evt-1"
/// type:    "temperature"
/// time:    2020-01-01T00:00:00Z
/// payload: "v1" 4 bytes 000102ff
/// ```
///
/// Payload bytes beyond the first 16 are elided.
pub fn summarize(envelope: &Envelope) -> String {
    let time = match envelope.time {
        Some(time) => format_timestamp(time).expect("timestamp has an RFC 3339 form"),
        None => "none".to_string(),
    };
    let payload = match &envelope.data {
        Some(payload) => {
            let mut line = format!("{:?} {} bytes", payload.version, payload.data.len());
            if !payload.data.is_empty() {
                let shown = &payload.data[..payload.data.len().min(16)];
                line.push(' ');
                line.push_str(&hex::encode(shown));
                if payload.data.len() > 16 {
                    line.push('…');
                }
            }
            line
        }
        None => "none".to_string(),
    };
    [
        format!("id:      {:?}", envelope.id),
        format!("type:    {:?}", envelope.kind),
        format!("time:    {time}"),
        format!("payload: {payload}"),
    ]
    .join("\n")
}

// ── Readers ──────────────────────────────────────────────────────────────────

/// Hands out at most `step` bytes per `read`, so tokens straddle buffer
/// refills.
pub struct Trickle<'a> {
    bytes: &'a [u8],
    step: usize,
}

impl<'a> Trickle<'a> {
    pub fn new(bytes: &'a [u8], step: usize) -> Self {
        Self {
            bytes,
            step: step.max(1),
        }
    }
}

impl Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.step.min(buf.len()).min(self.bytes.len());
        buf[..n].copy_from_slice(&self.bytes[..n]);
        self.bytes = &self.bytes[n..];
        Ok(n)
    }
}

/// Yields `bytes`, then fails with an I/O error instead of reporting EOF.
pub struct FailAfter<'a> {
    bytes: &'a [u8],
}

impl<'a> FailAfter<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }
}

impl Read for FailAfter<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if self.bytes.is_empty() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "link dropped",
            ));
        }
        let n = buf.len().min(self.bytes.len());
        buf[..n].copy_from_slice(&self.bytes[..n]);
        self.bytes = &self.bytes[n..];
        Ok(n)
    }
}

// ── Golden fixtures ──────────────────────────────────────────────────────────

/// Directory holding the committed golden fixtures.
pub fn golden_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/golden")
}

/// Read `tests/golden/<name>`.
pub fn golden(name: &str) -> Vec<u8> {
    let path = golden_dir().join(name);
    std::fs::read(&path)
        .unwrap_or_else(|e| panic!("failed to read golden fixture {}: {e}", path.display()))
}
