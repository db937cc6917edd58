use std::io::Read;

use hwev_types::Envelope;
use hwev_wire::JsonCursor;

use crate::config::{DecoderConfig, PayloadFaults, TimestampFaults};
use crate::error::DecodeError;
use crate::payload::read_nested_payload;
use crate::timestamp::read_timestamp;

/// Top-level keys of an envelope.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EnvelopeField {
    Id,
    Kind,
    Time,
    Data,
    Version,
    Unknown,
}

impl EnvelopeField {
    fn from_key(key: &str) -> Self {
        match key {
            "id" => Self::Id,
            "type" => Self::Kind,
            "time" => Self::Time,
            "data" => Self::Data,
            "version" => Self::Version,
            _ => Self::Unknown,
        }
    }
}

/// Walk one envelope object and assemble the record.
///
/// Every key read is a checkpoint. A timestamp fault recorded under
/// [`TimestampFaults::Deferred`] is raised at the first checkpoint
/// after it, ahead of anything that key read produced.
pub(crate) fn read_envelope<R: Read>(
    cursor: &mut JsonCursor<R>,
    config: &DecoderConfig,
) -> Result<Envelope, DecodeError> {
    let mut envelope = Envelope::default();
    let mut pending: Option<DecodeError> = None;

    loop {
        let field = cursor.next_key().map(|key| key.map(EnvelopeField::from_key));
        if let Some(fault) = pending.take() {
            return Err(fault);
        }
        let Some(field) = field? else {
            break;
        };

        match field {
            EnvelopeField::Id => envelope.id = cursor.read_string()?,
            EnvelopeField::Kind => envelope.kind = cursor.read_string()?,
            EnvelopeField::Time => match read_timestamp(cursor) {
                Ok(time) => envelope.time = Some(time),
                Err(e @ DecodeError::Type(_))
                    if config.timestamp_faults == TimestampFaults::Deferred =>
                {
                    pending = Some(e);
                }
                Err(e) => return Err(e),
            },
            EnvelopeField::Data => match read_nested_payload(cursor) {
                Ok(payload) => envelope.set_data(payload),
                Err(e) if e.is_encoding_fault() && config.payload_faults == PayloadFaults::Ignore => {
                    tracing::debug!(error = %e, offset = cursor.offset(), "dropping undecodable payload");
                }
                Err(e) => return Err(e),
            },
            EnvelopeField::Version | EnvelopeField::Unknown => cursor.skip()?,
        }
    }

    Ok(envelope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FaultKind;
    use hwev_types::Payload;

    fn lenient(input: &str) -> Result<Envelope, DecodeError> {
        let mut cursor = JsonCursor::new(input.as_bytes());
        read_envelope(&mut cursor, &DecoderConfig::default())
    }

    fn strict(input: &str) -> Result<Envelope, DecodeError> {
        let mut cursor = JsonCursor::new(input.as_bytes());
        read_envelope(&mut cursor, &DecoderConfig::strict())
    }

    #[test]
    fn full_envelope() {
        let envelope = lenient(
            r#"{"id":"evt-1","type":"temp","time":"2020-01-01T00:00:00Z",
                "data":{"version":"v1","data":"AAEC/w=="}}"#,
        )
        .unwrap();
        assert_eq!(envelope.id, "evt-1");
        assert_eq!(envelope.kind, "temp");
        assert_eq!(envelope.time.map(|t| t.unix_timestamp()), Some(1_577_836_800));
        assert_eq!(envelope.data, Some(Payload::new("v1", vec![0, 1, 2, 255])));
    }

    #[test]
    fn missing_data_is_absent() {
        let envelope = lenient(r#"{"id":"a","type":"b","time":"2020-01-01T00:00:00Z"}"#).unwrap();
        assert!(!envelope.has_data());
    }

    #[test]
    fn null_data_is_present_and_empty() {
        let envelope = lenient(r#"{"id":"a","data":null}"#).unwrap();
        assert_eq!(envelope.data, Some(Payload::default()));
    }

    #[test]
    fn null_envelope_is_empty() {
        assert_eq!(lenient("null").unwrap(), Envelope::default());
        assert_eq!(lenient("{}").unwrap(), Envelope::default());
    }

    #[test]
    fn version_and_unknown_keys_are_skipped() {
        let envelope = lenient(
            r#"{"version":{"major":2},"extra":[1,[2,[3]]],"":"blank","id":"x","type":"y"}"#,
        )
        .unwrap();
        assert_eq!(envelope.id, "x");
        assert_eq!(envelope.kind, "y");
    }

    #[test]
    fn duplicate_keys_last_wins() {
        let envelope = lenient(r#"{"id":"first","id":"second"}"#).unwrap();
        assert_eq!(envelope.id, "second");
    }

    #[test]
    fn bad_timestamp_fails_in_both_modes() {
        let input = r#"{"id":"a","type":"b","time":"not-a-time"}"#;
        assert_eq!(lenient(input).unwrap_err().kind(), FaultKind::Timestamp);
        assert_eq!(strict(input).unwrap_err().kind(), FaultKind::Timestamp);
    }

    #[test]
    fn deferred_timestamp_fault_surfaces_at_next_key() {
        let input = r#"{"time":"bad","id":"after"}"#;

        let mut cursor = JsonCursor::new(input.as_bytes());
        let err = read_envelope(&mut cursor, &DecoderConfig::default()).unwrap_err();
        assert_eq!(err.kind(), FaultKind::Timestamp);
        // The `,"id":` key was read before the fault was raised.
        assert_eq!(cursor.offset(), r#"{"time":"bad","id":"#.len());

        let mut cursor = JsonCursor::new(input.as_bytes());
        let err = read_envelope(&mut cursor, &DecoderConfig::strict()).unwrap_err();
        assert_eq!(err.kind(), FaultKind::Timestamp);
        assert_eq!(cursor.offset(), r#"{"time":"bad""#.len());
    }

    #[test]
    fn deferred_timestamp_fault_beats_later_syntax_error() {
        let err = lenient(r#"{"time":"bad" "id":"x"}"#).unwrap_err();
        assert_eq!(err.kind(), FaultKind::Timestamp);

        let err = lenient(r#"{"time":"bad""#).unwrap_err();
        assert_eq!(err.kind(), FaultKind::Timestamp);
    }

    #[test]
    fn non_string_time_is_tokenizer_fault() {
        let err = lenient(r#"{"time":1577836800}"#).unwrap_err();
        assert_eq!(err.kind(), FaultKind::Tokenizer);
    }

    #[test]
    fn lenient_drops_bad_payload() {
        let envelope = lenient(r#"{"id":"a","data":{"data":"@@@"},"type":"b"}"#).unwrap();
        assert_eq!(envelope.id, "a");
        assert_eq!(envelope.kind, "b");
        assert!(!envelope.has_data());
    }

    #[test]
    fn strict_propagates_bad_payload() {
        let err = strict(r#"{"id":"a","data":{"data":"@@@"},"type":"b"}"#).unwrap_err();
        assert_eq!(err.kind(), FaultKind::Encoding);
    }

    #[test]
    fn payload_syntax_error_always_fails() {
        let err = lenient(r#"{"id":"a","data":{"data" "AQ=="}}"#).unwrap_err();
        assert_eq!(err.kind(), FaultKind::Tokenizer);
    }

    #[test]
    fn truncated_envelope_fails() {
        for input in [r#"{"id":"a""#, r#"{"id":"#, r#"{"id":"a","type"#, "{", ""] {
            assert_eq!(
                lenient(input).unwrap_err().kind(),
                FaultKind::Tokenizer,
                "input {input:?}"
            );
        }
    }
}
