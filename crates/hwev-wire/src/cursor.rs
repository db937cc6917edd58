use std::io::{ErrorKind, Read};

use crate::error::WireError;
use crate::state::{CursorState, MAX_DEPTH};

/// Streaming pull tokenizer over a JSON byte source.
///
/// The cursor never builds a document tree. Callers walk an object one
/// key at a time with [`next_key`](Self::next_key) and decide per key
/// whether to read the value ([`read_string`](Self::read_string)), keep
/// its raw bytes ([`capture_raw`](Self::capture_raw)) or throw it away
/// ([`skip`](Self::skip)).
///
/// ```text
///   let mut cursor = JsonCursor::new(reader);
///   while let Some(key) = cursor.next_key()? {
///       match key {
///           "id" => { /* cursor.read_string()? */ }
///           _    => { /* cursor.skip()? */ }
///       }
///   }
/// ```
///
/// # Faults
///
/// Every read returns a `Result`. The first failure also poisons the
/// cursor: any later read returns [`WireError::Poisoned`] with the
/// offset of the original failure, so a caller that ignores one error
/// cannot keep reading from a misaligned position. Poisoning is cleared
/// only by [`CursorState::reset`].
pub struct JsonCursor<R> {
    source: R,
    state: CursorState,
}

impl<R> JsonCursor<R> {
    /// Detach the reusable state, dropping the source.
    pub fn into_state(self) -> CursorState {
        self.state
    }

    /// Move the reusable state out, leaving an empty, allocation-free
    /// state behind. Every later read on this cursor sees end of input.
    ///
    /// Lets a guard that only holds `&mut self` (a `Drop` impl) hand the
    /// state back to a pool.
    pub fn detach_state(&mut self) -> CursorState {
        std::mem::replace(&mut self.state, CursorState::detached())
    }

    /// Read-only view of the attached state.
    pub fn state(&self) -> &CursorState {
        &self.state
    }

    /// Number of source bytes consumed so far.
    pub fn offset(&self) -> usize {
        self.state.consumed + self.state.head
    }

    /// Whether a read on this cursor has failed.
    pub fn is_poisoned(&self) -> bool {
        self.state.is_poisoned()
    }
}

impl<R: Read> JsonCursor<R> {
    /// Create a cursor with a freshly allocated state.
    pub fn new(source: R) -> Self {
        Self::with_state(source, CursorState::new())
    }

    /// Attach a (possibly recycled) state to a new source.
    ///
    /// The state is reset first, so nothing from its previous source
    /// survives.
    pub fn with_state(source: R, mut state: CursorState) -> Self {
        state.reset();
        Self { source, state }
    }

    /// Advance to the next key of the current object.
    ///
    /// Behaves like a streaming iterator's object walk:
    ///
    ///   - `{` or `,` introduces a key, returned as `Some(key)`.
    ///   - `}` closes the object and returns `None`.
    ///   - a literal `null` where an object was expected reads as an
    ///     empty object and returns `None`.
    ///
    /// Because the end of the object is `None`, a literal empty key
    /// (`""`) comes back as `Some("")` like any other key.
    ///
    /// # Errors
    ///
    /// Any [`WireError`]; the cursor is poisoned afterwards.
    pub fn next_key(&mut self) -> Result<Option<&str>, WireError> {
        self.guard()?;
        let found = self.read_key();
        if !self.track(found)? {
            return Ok(None);
        }

        let offset = self.offset();
        match std::str::from_utf8(&self.state.scratch) {
            Ok(key) => Ok(Some(key)),
            Err(_) => {
                self.state.poisoned_at.get_or_insert(offset);
                Err(WireError::InvalidUtf8 { offset })
            }
        }
    }

    /// Read a string value.
    ///
    /// A literal `null` reads as the empty string. Any other token is
    /// an error.
    ///
    /// # Errors
    ///
    /// Any [`WireError`]; the cursor is poisoned afterwards.
    pub fn read_string(&mut self) -> Result<String, WireError> {
        self.guard()?;
        let value = self.read_string_value();
        self.track(value)
    }

    /// Consume the next value of any type without interpreting it.
    ///
    /// Objects and arrays are skipped iteratively, so the call costs
    /// O(size of the value) and never recurses.
    ///
    /// # Errors
    ///
    /// Any [`WireError`]; the cursor is poisoned afterwards.
    pub fn skip(&mut self) -> Result<(), WireError> {
        self.guard()?;
        let skipped = self.skip_value();
        self.track(skipped)
    }

    /// Consume the next value and return its exact source bytes.
    ///
    /// Leading whitespace is not part of the span. For a string value
    /// the span keeps its quotes and escapes as written, e.g. the
    /// source `"a\"b"` comes back as those six bytes.
    ///
    /// The bytes live in the state's capture area and are overwritten
    /// by the next capture; copy them if they must outlive the cursor.
    ///
    /// # Errors
    ///
    /// Any [`WireError`]; the cursor is poisoned afterwards.
    pub fn capture_raw(&mut self) -> Result<&[u8], WireError> {
        self.guard()?;
        let captured = self.capture_value();
        self.track(captured)?;
        Ok(&self.state.capture)
    }

    fn guard(&self) -> Result<(), WireError> {
        match self.state.poisoned_at {
            Some(offset) => Err(WireError::Poisoned { offset }),
            None => Ok(()),
        }
    }

    fn track<T>(&mut self, result: Result<T, WireError>) -> Result<T, WireError> {
        if result.is_err() && self.state.poisoned_at.is_none() {
            self.state.poisoned_at = Some(self.offset());
        }
        result
    }

    // ── Buffer management ────────────────────────────────────────────────

    /// Refill the read buffer once `head == tail`. Returns `false` at EOF.
    ///
    /// If a capture is running, the bytes about to be discarded are
    /// moved into the capture area first.
    fn fill(&mut self) -> Result<bool, WireError> {
        let state = &mut self.state;
        if let Some(start) = state.capture_from {
            state.capture.extend_from_slice(&state.buf[start..state.tail]);
            state.capture_from = Some(0);
        }
        state.consumed += state.tail;
        state.head = 0;
        state.tail = 0;

        loop {
            match self.source.read(&mut state.buf) {
                Ok(0) => return Ok(false),
                Ok(n) => {
                    state.tail = n;
                    return Ok(true);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(WireError::Io(e)),
            }
        }
    }

    fn peek(&mut self) -> Result<Option<u8>, WireError> {
        if self.state.head == self.state.tail && !self.fill()? {
            return Ok(None);
        }
        Ok(Some(self.state.buf[self.state.head]))
    }

    fn next_byte(&mut self) -> Result<u8, WireError> {
        match self.peek()? {
            Some(b) => {
                self.state.head += 1;
                Ok(b)
            }
            None => Err(WireError::UnexpectedEof {
                offset: self.offset(),
            }),
        }
    }

    /// Skip whitespace and peek at the next significant byte.
    fn peek_token(&mut self) -> Result<Option<u8>, WireError> {
        while let Some(b) = self.peek()? {
            if !matches!(b, b' ' | b'\t' | b'\n' | b'\r') {
                return Ok(Some(b));
            }
            self.state.head += 1;
        }
        Ok(None)
    }

    /// Skip whitespace and consume the next significant byte.
    fn next_token(&mut self) -> Result<u8, WireError> {
        match self.peek_token()? {
            Some(b) => {
                self.state.head += 1;
                Ok(b)
            }
            None => Err(WireError::UnexpectedEof {
                offset: self.offset(),
            }),
        }
    }

    /// Build an error for a byte that was just consumed.
    fn unexpected(&self, found: u8, expected: &'static str) -> WireError {
        WireError::UnexpectedByte {
            found,
            offset: self.offset() - 1,
            expected,
        }
    }

    fn expect_literal(&mut self, rest: &[u8]) -> Result<(), WireError> {
        let offset = self.offset();
        for &want in rest {
            if self.next_byte()? != want {
                return Err(WireError::InvalidLiteral { offset: offset - 1 });
            }
        }
        Ok(())
    }

    // ── Objects and strings ──────────────────────────────────────────────

    /// Returns `true` when a key was decoded into the scratch area.
    fn read_key(&mut self) -> Result<bool, WireError> {
        match self.next_token()? {
            b'{' => {
                if self.peek_token()? == Some(b'}') {
                    self.state.head += 1;
                    return Ok(false);
                }
                self.read_field_name()?;
                Ok(true)
            }
            b',' => {
                self.read_field_name()?;
                Ok(true)
            }
            b'}' => Ok(false),
            b'n' => {
                self.expect_literal(b"ull")?;
                Ok(false)
            }
            found => Err(self.unexpected(found, "'{', ',' or '}'")),
        }
    }

    fn read_field_name(&mut self) -> Result<(), WireError> {
        let quote = self.next_token()?;
        if quote != b'"' {
            return Err(self.unexpected(quote, "object key"));
        }
        self.read_string_body()?;
        let colon = self.next_token()?;
        if colon != b':' {
            return Err(self.unexpected(colon, "':'"));
        }
        Ok(())
    }

    fn read_string_value(&mut self) -> Result<String, WireError> {
        match self.next_token()? {
            b'"' => {
                self.read_string_body()?;
                let offset = self.offset();
                std::str::from_utf8(&self.state.scratch)
                    .map(str::to_owned)
                    .map_err(|_| WireError::InvalidUtf8 { offset })
            }
            b'n' => {
                self.expect_literal(b"ull")?;
                Ok(String::new())
            }
            found => Err(self.unexpected(found, "string")),
        }
    }

    /// Decode the rest of a string (opening quote already consumed) into
    /// the scratch area. Plain runs are copied a buffer-chunk at a time.
    fn read_string_body(&mut self) -> Result<(), WireError> {
        self.state.scratch.clear();
        loop {
            if self.state.head == self.state.tail && !self.fill()? {
                return Err(WireError::UnexpectedEof {
                    offset: self.offset(),
                });
            }

            let state = &mut self.state;
            let chunk = &state.buf[state.head..state.tail];
            let Some(stop) = chunk
                .iter()
                .position(|&b| b == b'"' || b == b'\\' || b < 0x20)
            else {
                state.scratch.extend_from_slice(chunk);
                state.head = state.tail;
                continue;
            };

            state.scratch.extend_from_slice(&chunk[..stop]);
            state.head += stop + 1;
            let found = state.buf[state.head - 1];
            match found {
                b'"' => return Ok(()),
                b'\\' => self.read_escape()?,
                _ => {
                    return Err(WireError::ControlCharacter {
                        offset: self.offset() - 1,
                    });
                }
            }
        }
    }

    fn read_escape(&mut self) -> Result<(), WireError> {
        let decoded = match self.next_byte()? {
            b'"' => b'"',
            b'\\' => b'\\',
            b'/' => b'/',
            b'b' => 0x08,
            b'f' => 0x0C,
            b'n' => b'\n',
            b'r' => b'\r',
            b't' => b'\t',
            b'u' => {
                let ch = self.read_unicode_escape()?;
                let mut utf8 = [0u8; 4];
                self.state
                    .scratch
                    .extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
                return Ok(());
            }
            _ => {
                return Err(WireError::InvalidEscape {
                    offset: self.offset() - 1,
                });
            }
        };
        self.state.scratch.push(decoded);
        Ok(())
    }

    /// Decode the `XXXX` of a `\uXXXX` escape, pulling in the low half
    /// of a surrogate pair when needed.
    fn read_unicode_escape(&mut self) -> Result<char, WireError> {
        let offset = self.offset();
        let high = self.read_hex4()?;

        let code = match high {
            0xD800..=0xDBFF => {
                if self.next_byte()? != b'\\' || self.next_byte()? != b'u' {
                    return Err(WireError::InvalidEscape { offset });
                }
                let low = self.read_hex4()?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(WireError::InvalidEscape { offset });
                }
                0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(low) - 0xDC00)
            }
            0xDC00..=0xDFFF => return Err(WireError::InvalidEscape { offset }),
            _ => u32::from(high),
        };

        char::from_u32(code).ok_or(WireError::InvalidEscape { offset })
    }

    fn read_hex4(&mut self) -> Result<u16, WireError> {
        let mut value: u16 = 0;
        for _ in 0..4 {
            let b = self.next_byte()?;
            let digit = char::from(b)
                .to_digit(16)
                .ok_or(WireError::InvalidEscape {
                    offset: self.offset() - 1,
                })?;
            #[allow(clippy::cast_possible_truncation)]
            let digit = digit as u16;
            value = (value << 4) | digit;
        }
        Ok(value)
    }

    // ── Skipping and capture ─────────────────────────────────────────────

    /// Skip one complete value. Brackets are matched against a reusable
    /// stack, so `{]` is rejected while nothing recurses.
    fn skip_value(&mut self) -> Result<(), WireError> {
        self.state.nesting.clear();
        loop {
            let b = self.next_token()?;
            match b {
                b'{' | b'[' => {
                    if self.state.nesting.len() == MAX_DEPTH {
                        return Err(WireError::DepthExceeded { limit: MAX_DEPTH });
                    }
                    self.state.nesting.push(b);
                    continue;
                }
                b'}' | b']' => {
                    let open = if b == b'}' { b'{' } else { b'[' };
                    if self.state.nesting.pop() != Some(open) {
                        return Err(self.unexpected(b, "matching bracket"));
                    }
                }
                b',' | b':' if !self.state.nesting.is_empty() => continue,
                b'"' => self.skip_string_body()?,
                b't' => self.expect_literal(b"rue")?,
                b'f' => self.expect_literal(b"alse")?,
                b'n' => self.expect_literal(b"ull")?,
                b'-' | b'0'..=b'9' => self.skip_number()?,
                found => return Err(self.unexpected(found, "value")),
            }

            if self.state.nesting.is_empty() {
                return Ok(());
            }
        }
    }

    fn skip_string_body(&mut self) -> Result<(), WireError> {
        loop {
            if self.state.head == self.state.tail && !self.fill()? {
                return Err(WireError::UnexpectedEof {
                    offset: self.offset(),
                });
            }

            let state = &mut self.state;
            let chunk = &state.buf[state.head..state.tail];
            let Some(stop) = chunk
                .iter()
                .position(|&b| b == b'"' || b == b'\\' || b < 0x20)
            else {
                state.head = state.tail;
                continue;
            };

            state.head += stop + 1;
            let found = state.buf[state.head - 1];
            match found {
                b'"' => return Ok(()),
                b'\\' => {
                    self.next_byte()?;
                }
                _ => {
                    return Err(WireError::ControlCharacter {
                        offset: self.offset() - 1,
                    });
                }
            }
        }
    }

    fn skip_number(&mut self) -> Result<(), WireError> {
        while let Some(b) = self.peek()? {
            if !matches!(b, b'0'..=b'9' | b'.' | b'e' | b'E' | b'+' | b'-') {
                break;
            }
            self.state.head += 1;
        }
        Ok(())
    }

    fn capture_value(&mut self) -> Result<(), WireError> {
        self.state.capture.clear();
        if self.peek_token()?.is_none() {
            return Err(WireError::UnexpectedEof {
                offset: self.offset(),
            });
        }

        self.state.capture_from = Some(self.state.head);
        let skipped = self.skip_value();
        if let Some(start) = self.state.capture_from.take() {
            let state = &mut self.state;
            state.capture.extend_from_slice(&state.buf[start..state.head]);
        }
        skipped
    }
}
