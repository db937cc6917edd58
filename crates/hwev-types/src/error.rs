/// Errors raised while turning decoded tokens into typed values.
///
/// These sit one level above tokenizer faults: the bytes were valid
/// JSON, but a value did not mean what its field requires.
///
/// ```text
/// ┌─────────────────────────────────────────────────────┐
/// │ TypeError (this crate)                              │
/// │   ├── InvalidTimestamp for non-RFC 3339 `time`      │
/// │   └── UnformattableTimestamp on the render side     │
/// └─────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, thiserror::Error)]
pub enum TypeError {
  /// The `time` field held a string that is not an RFC 3339 timestamp.
  ///
  /// The offending text is kept verbatim for diagnostics.
  #[error("invalid timestamp {value:?}")]
  InvalidTimestamp {
    value: String,
    #[source]
    source: time::error::Parse,
  },

  /// A timestamp could not be rendered back to RFC 3339 (for example a
  /// year outside 0..=9999).
  #[error("timestamp cannot be formatted as RFC 3339")]
  UnformattableTimestamp(#[source] time::error::Format),
}
