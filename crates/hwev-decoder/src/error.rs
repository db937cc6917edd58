use hwev_types::TypeError;
use hwev_wire::WireError;

/// Errors that can occur while decoding an envelope or a bare payload.
///
/// A decode call returns at most one of these and never a partially
/// filled record alongside it.
///
/// Error hierarchy:
///
/// ```text
///   DecodeError
///   ├── Tokenizer(WireError)   ← malformed JSON, I/O, poisoned cursor
///   ├── Type(TypeError)        ← `time` is not an RFC 3339 timestamp
///   ├── InvalidQuoting         ← payload `data` span is not a JSON string
///   └── InvalidBase64          ← unquoted payload `data` is not base64
/// ```
///
/// [`kind`](DecodeError::kind) folds these into the three fault classes
/// callers usually branch on.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The byte stream is not well-formed JSON, or the source failed.
    #[error(transparent)]
    Tokenizer(#[from] WireError),

    /// A value was well-formed JSON but not a valid typed value.
    #[error(transparent)]
    Type(#[from] TypeError),

    /// The nested payload's `data` span could not be unquoted.
    ///
    /// Raised when `data` holds a number, an object, an array, or a
    /// string literal that serde_json refuses.
    #[error("payload data is not a JSON string literal")]
    InvalidQuoting(#[source] serde_json::Error),

    /// The unquoted `data` text is not standard padded base64.
    #[error("payload data is not valid base64")]
    InvalidBase64(#[source] base64::DecodeError),
}

/// Coarse classification of a [`DecodeError`].
///
/// ```text
/// ┌───────────┬────────────────────────────────────────────────────┐
/// │ Kind      │ Raised when                                        │
/// ├───────────┼────────────────────────────────────────────────────┤
/// │ Tokenizer │ JSON syntax, UTF-8, nesting depth, I/O             │
/// │ Timestamp │ `time` present but not RFC 3339                    │
/// │ Encoding  │ payload `data` badly quoted or not base64          │
/// └───────────┴────────────────────────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaultKind {
    Tokenizer,
    Timestamp,
    Encoding,
}

impl DecodeError {
    pub fn kind(&self) -> FaultKind {
        match self {
            Self::Tokenizer(_) => FaultKind::Tokenizer,
            Self::Type(_) => FaultKind::Timestamp,
            Self::InvalidQuoting(_) | Self::InvalidBase64(_) => FaultKind::Encoding,
        }
    }

    /// Whether this is a payload encoding fault, the only kind an
    /// envelope decode may swallow.
    pub fn is_encoding_fault(&self) -> bool {
        self.kind() == FaultKind::Encoding
    }
}
