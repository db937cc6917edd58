/// Implementation of `hwev decode`.
///
/// Decodes one envelope and prints it as JSON on stdout. The payload's
/// bytes are re-encoded as base64 and the timestamp is printed in
/// RFC 3339, so the output is itself a valid envelope.
///
/// ```text
/// {
///   "id": "evt-1",
///   "type": "temperature",
///   "time": "2020-01-01T00:00:00Z",
///   "data": { "version": "v1", "data": "AAEC/w==" }
/// }
/// ```
///
/// Absent `time` and `data` are left out of the output.
use std::io::{self, Write as _};

use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use hwev_types::{Envelope, Payload, format_timestamp};
use serde::Serialize;

use crate::{DecodeArgs, decoder_for, open_input};

#[derive(Serialize)]
struct EnvelopeView<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<PayloadView<'a>>,
}

#[derive(Serialize)]
struct PayloadView<'a> {
    version: &'a str,
    data: String,
}

impl<'a> EnvelopeView<'a> {
    fn new(envelope: &'a Envelope) -> Result<Self> {
        let time = envelope
            .time
            .map(format_timestamp)
            .transpose()
            .context("cannot render timestamp")?;
        Ok(Self {
            id: &envelope.id,
            kind: &envelope.kind,
            time,
            data: envelope.data.as_ref().map(PayloadView::new),
        })
    }
}

impl<'a> PayloadView<'a> {
    fn new(payload: &'a Payload) -> Self {
        Self {
            version: &payload.version,
            data: STANDARD.encode(&payload.data),
        }
    }
}

/// Run the `hwev decode` command.
///
/// # Errors
///
/// Returns an error if the input cannot be opened, the envelope does
/// not decode, or stdout cannot be written.
pub fn run(args: &DecodeArgs) -> Result<()> {
    let source = open_input(&args.file)?;
    let envelope = decoder_for(args.strict)
        .decode_envelope(source)
        .with_context(|| format!("failed to decode {}", args.file.display()))?;

    let view = EnvelopeView::new(&envelope)?;
    let json = if args.compact {
        serde_json::to_string(&view)?
    } else {
        serde_json::to_string_pretty(&view)?
    };

    writeln!(io::stdout().lock(), "{json}").context("cannot write to stdout")?;
    Ok(())
}
