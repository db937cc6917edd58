use std::io::Read;
use std::sync::LazyLock;

use hwev_types::{BarePayload, Envelope};

use crate::config::DecoderConfig;
use crate::envelope::read_envelope;
use crate::error::DecodeError;
use crate::payload::read_bare_payload;
use crate::pool::CursorPool;

/// Decodes envelopes and bare payloads through a shared cursor pool.
///
/// One `EventDecoder` is meant to live for the whole process and be
/// shared by reference across threads. Every call leases its own
/// cursor, so calls never observe each other.
///
/// ```text
///   bytes ──► pool.acquire ──► read_envelope ─┬─► read_timestamp
///                                             └─► read_nested_payload
///         ◄── Envelope ◄── (cursor released on drop)
/// ```
///
/// # Example
///
/// ```rust
/// use hwev_decoder::EventDecoder;
///
/// let decoder = EventDecoder::default();
/// let envelope = decoder
///     .envelope_from_slice(br#"{"id":"a","type":"b","time":"2020-01-01T00:00:00Z"}"#)
///     .unwrap();
/// assert_eq!(envelope.id, "a");
/// assert!(envelope.data.is_none());
/// ```
#[derive(Debug)]
pub struct EventDecoder {
    pool: CursorPool,
    config: DecoderConfig,
}

impl EventDecoder {
    pub fn new(config: DecoderConfig) -> Self {
        Self {
            pool: CursorPool::from_config(&config),
            config,
        }
    }

    /// A decoder using [`DecoderConfig::strict`].
    pub fn strict() -> Self {
        Self::new(DecoderConfig::strict())
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    pub fn pool(&self) -> &CursorPool {
        &self.pool
    }

    /// Decode one envelope from `source`.
    ///
    /// Only the bytes of the first JSON value are consumed; anything
    /// after it is left unread.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] for malformed JSON, I/O failure, a bad
    /// timestamp, or (under [`PayloadFaults::Propagate`]) a payload
    /// that cannot be decoded. No partial envelope is returned.
    ///
    /// [`PayloadFaults::Propagate`]: crate::PayloadFaults::Propagate
    pub fn decode_envelope<R: Read>(&self, source: R) -> Result<Envelope, DecodeError> {
        let mut cursor = self.pool.acquire(source);
        let envelope = read_envelope(&mut *cursor, &self.config)?;
        tracing::trace!(
            id = %envelope.id,
            kind = %envelope.kind,
            bytes = cursor.offset(),
            "decoded envelope"
        );
        Ok(envelope)
    }

    /// Decode a standalone `{version, data}` record, keeping `data` as
    /// its raw JSON span.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Tokenizer`] for malformed JSON or I/O
    /// failure. The raw rule never raises encoding faults.
    pub fn decode_payload<R: Read>(&self, source: R) -> Result<BarePayload, DecodeError> {
        let mut cursor = self.pool.acquire(source);
        let payload = read_bare_payload(&mut *cursor)?;
        tracing::trace!(
            version = %payload.version,
            bytes = cursor.offset(),
            "decoded bare payload"
        );
        Ok(payload)
    }

    /// [`decode_envelope`](Self::decode_envelope) over an in-memory buffer.
    ///
    /// # Errors
    ///
    /// As for [`decode_envelope`](Self::decode_envelope).
    pub fn envelope_from_slice(&self, bytes: &[u8]) -> Result<Envelope, DecodeError> {
        self.decode_envelope(bytes)
    }

    /// [`decode_payload`](Self::decode_payload) over an in-memory buffer.
    ///
    /// # Errors
    ///
    /// As for [`decode_payload`](Self::decode_payload).
    pub fn payload_from_slice(&self, bytes: &[u8]) -> Result<BarePayload, DecodeError> {
        self.decode_payload(bytes)
    }
}

impl Default for EventDecoder {
    fn default() -> Self {
        Self::new(DecoderConfig::default())
    }
}

static SHARED: LazyLock<EventDecoder> = LazyLock::new(EventDecoder::default);

/// The process-wide decoder with the default (lenient) configuration.
pub fn shared() -> &'static EventDecoder {
    &SHARED
}

/// Decode an envelope with the [`shared`] decoder.
///
/// # Errors
///
/// See [`EventDecoder::decode_envelope`].
pub fn decode_envelope<R: Read>(source: R) -> Result<Envelope, DecodeError> {
    shared().decode_envelope(source)
}

/// Decode a bare payload with the [`shared`] decoder.
///
/// # Errors
///
/// See [`EventDecoder::decode_payload`].
pub fn decode_payload<R: Read>(source: R) -> Result<BarePayload, DecodeError> {
    shared().decode_payload(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FaultKind;

    const GOOD: &[u8] = br#"{"id":"a","type":"b","time":"2020-01-01T00:00:00Z","data":{"version":"v1","data":"AAEC/w=="}}"#;

    #[test]
    fn sequential_decodes_reuse_one_cursor() {
        let decoder = EventDecoder::default();
        for _ in 0..10 {
            let envelope = decoder.envelope_from_slice(GOOD).unwrap();
            assert_eq!(envelope.data.unwrap().data, vec![0, 1, 2, 255]);
        }
        let stats = decoder.pool().stats();
        assert_eq!(stats.created, 1);
        assert_eq!(stats.reused, 9);
    }

    #[test]
    fn failure_does_not_affect_next_decode() {
        let decoder = EventDecoder::default();
        assert!(decoder.envelope_from_slice(br#"{"id":"a","#).is_err());
        assert!(decoder.envelope_from_slice(br#"{"time":"nope","id":"a"}"#).is_err());

        let envelope = decoder.envelope_from_slice(GOOD).unwrap();
        assert_eq!(envelope.id, "a");
        assert_eq!(decoder.pool().stats().created, 1);
    }

    #[test]
    fn strict_decoder_propagates_payload_faults() {
        let input = br#"{"id":"a","data":{"data":"%%"}}"#;
        assert!(EventDecoder::default().envelope_from_slice(input).unwrap().data.is_none());

        let err = EventDecoder::strict().envelope_from_slice(input).unwrap_err();
        assert_eq!(err.kind(), FaultKind::Encoding);
    }

    #[test]
    fn bare_payload_through_decoder() {
        let payload = EventDecoder::default()
            .payload_from_slice(br#"{"version":"v1","data":"AAEC/w=="}"#)
            .unwrap();
        assert_eq!(payload.data, br#""AAEC/w==""#);
    }

    #[test]
    fn reads_from_any_source() {
        let envelope = decode_envelope(std::io::Cursor::new(GOOD.to_vec())).unwrap();
        assert_eq!(envelope.kind, "b");

        let payload = decode_payload(&b"null"[..]).unwrap();
        assert_eq!(payload, BarePayload::default());
    }

    #[test]
    fn trailing_bytes_are_left_unread() {
        let envelope = decode_envelope(&br#"{"id":"a"} trailing garbage"#[..]).unwrap();
        assert_eq!(envelope.id, "a");
    }

    #[test]
    fn tiny_buffers_still_decode() {
        let decoder = EventDecoder::new(DecoderConfig {
            buffer_capacity: 1,
            ..DecoderConfig::default()
        });
        let envelope = decoder.envelope_from_slice(GOOD).unwrap();
        assert_eq!(envelope.data.unwrap().version, "v1");
    }
}
