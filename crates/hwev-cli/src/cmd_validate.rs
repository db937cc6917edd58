/// Implementation of `hwev validate`.
///
/// Decodes every file as an envelope and prints one line per file:
///
/// ```text
/// ✓ events/a.json: id=evt-1 type=temperature payload=4 bytes
/// ✓ events/b.json: id=evt-2 type=door payload=none
/// ✗ events/c.json: timestamp fault: invalid timestamp "yesterday"
/// ```
///
/// The command exits with code 1 if any file failed. A file that does
/// not open counts as a failure like any other.
use std::error::Error as _;
use std::path::Path;

use anyhow::{Result, anyhow};
use hwev_decoder::{DecodeError, EventDecoder, FaultKind};
use hwev_types::Envelope;

use crate::{ValidateArgs, decoder_for, open_input};

/// Run the `hwev validate` command.
///
/// # Errors
///
/// Returns an error naming the failure count when any file fails.
pub fn run(args: &ValidateArgs) -> Result<()> {
    let decoder = decoder_for(args.strict);
    let mut failed = 0usize;

    for path in &args.files {
        match check(&decoder, path) {
            Ok(envelope) => println!("✓ {}: {}", path.display(), summary(&envelope)),
            Err(diagnostic) => {
                failed += 1;
                println!("✗ {}: {diagnostic}", path.display());
            }
        }
    }

    if failed == 0 {
        Ok(())
    } else {
        Err(anyhow!(
            "{failed} of {} file{} failed validation",
            args.files.len(),
            if args.files.len() == 1 { "" } else { "s" }
        ))
    }
}

fn check(decoder: &EventDecoder, path: &Path) -> Result<Envelope, String> {
    let source = open_input(path).map_err(|e| format!("{e:#}"))?;
    decoder.decode_envelope(source).map_err(|e| {
        tracing::debug!(path = %path.display(), kind = ?e.kind(), "validation failed");
        decode_error_diagnostic(&e)
    })
}

fn summary(envelope: &Envelope) -> String {
    let payload = match &envelope.data {
        Some(payload) => format!("{} bytes", payload.data.len()),
        None => "none".to_string(),
    };
    format!("id={} type={} payload={payload}", envelope.id, envelope.kind)
}

// ── Error formatting ──────────────────────────────────────────────────────────

/// Prefix the error with its fault class and append its cause, if any.
///
/// ```text
/// ┌───────────┬────────────────────────────────────────────────────────┐
/// │ FaultKind │ Diagnostic                                             │
/// ├───────────┼────────────────────────────────────────────────────────┤
/// │ Tokenizer │ "malformed input: <wire error>"                        │
/// │ Timestamp │ "timestamp fault: <type error>: <parse error>"         │
/// │ Encoding  │ "payload fault: <decode error>: <serde/base64 error>"  │
/// └───────────┴────────────────────────────────────────────────────────┘
/// ```
fn decode_error_diagnostic(e: &DecodeError) -> String {
    let class = match e.kind() {
        FaultKind::Tokenizer => "malformed input",
        FaultKind::Timestamp => "timestamp fault",
        FaultKind::Encoding => "payload fault",
    };
    let mut diagnostic = format!("{class}: {e}");
    // Transparent variants already print their inner error; walk past it.
    let mut cause = match e {
        DecodeError::Tokenizer(inner) => inner.source(),
        DecodeError::Type(inner) => inner.source(),
        other => other.source(),
    };
    while let Some(err) = cause {
        diagnostic.push_str(": ");
        diagnostic.push_str(&err.to_string());
        cause = err.source();
    }
    diagnostic
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_diagnostic_names_the_class() {
        let err = EventDecoder::default()
            .envelope_from_slice(br#"{"time":"yesterday"}"#)
            .unwrap_err();
        let diagnostic = decode_error_diagnostic(&err);
        assert!(diagnostic.starts_with("timestamp fault: "), "{diagnostic}");
        assert!(diagnostic.contains("yesterday"), "{diagnostic}");
    }

    #[test]
    fn syntax_diagnostic_names_the_class() {
        let err = EventDecoder::default()
            .envelope_from_slice(br#"{"id" "a"}"#)
            .unwrap_err();
        assert!(decode_error_diagnostic(&err).starts_with("malformed input: "));
    }

    #[test]
    fn check_reads_files_from_disk() {
        let path =
            std::env::temp_dir().join(format!("hwev-validate-{}.json", std::process::id()));
        std::fs::write(&path, br#"{"id":"disk","type":"t","time":"oops"}"#).unwrap();

        let diagnostic = check(&EventDecoder::default(), &path).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(diagnostic.starts_with("timestamp fault: "), "{diagnostic}");
    }

    #[test]
    fn missing_file_is_a_failure() {
        let path = Path::new("/nonexistent/hwev/envelope.json");
        let diagnostic = check(&EventDecoder::default(), path).unwrap_err();
        assert!(diagnostic.starts_with("cannot read "), "{diagnostic}");
    }

    #[test]
    fn summary_counts_payload_bytes() {
        let envelope = EventDecoder::default()
            .envelope_from_slice(br#"{"id":"x","type":"t","data":{"data":"AAEC/w=="}}"#)
            .unwrap();
        assert_eq!(summary(&envelope), "id=x type=t payload=4 bytes");
    }
}
