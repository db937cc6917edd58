/// Tokenizer-level faults raised by [`JsonCursor`](crate::JsonCursor).
///
/// Every variant that points into the input carries the byte `offset`
/// (counted from the start of the source) where the problem was seen.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The source ran out in the middle of a token.
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEof { offset: usize },

    /// A structural byte did not fit the grammar at this position.
    #[error("unexpected byte {found:#04X} at offset {offset}, expected {expected}")]
    UnexpectedByte {
        found: u8,
        offset: usize,
        expected: &'static str,
    },

    /// A `true`, `false` or `null` literal was misspelled.
    #[error("invalid literal at offset {offset}")]
    InvalidLiteral { offset: usize },

    /// A backslash escape inside a string was not a JSON escape, or a
    /// `\u` escape named an unpaired surrogate.
    #[error("invalid escape sequence at offset {offset}")]
    InvalidEscape { offset: usize },

    /// A decoded string was not valid UTF-8.
    #[error("invalid UTF-8 in string ending at offset {offset}")]
    InvalidUtf8 { offset: usize },

    /// A raw control character (below 0x20) appeared inside a string.
    #[error("unescaped control character at offset {offset}")]
    ControlCharacter { offset: usize },

    /// Nested arrays/objects went deeper than the cursor allows.
    #[error("nesting deeper than {limit} levels")]
    DepthExceeded { limit: usize },

    /// The cursor already failed once; it refuses reads until reset.
    #[error("cursor already failed at offset {offset}")]
    Poisoned { offset: usize },

    /// I/O error from the underlying byte source.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
