//! Reversing the JSON string-literal encoding of a captured span.
//!
//! [`JsonCursor::capture_raw`](crate::JsonCursor::capture_raw) hands back a
//! string value exactly as it was written, quotes and escapes included.
//! [`unquote`] turns that span back into the string it denotes.

/// Decode a JSON string literal (`"..."`, escapes allowed) into its value.
///
/// Surrounding whitespace is tolerated. Anything that is not a single
/// JSON string (a number, an object, `null`, an unterminated literal)
/// is an error.
///
/// # Errors
///
/// Returns the [`serde_json::Error`] describing why `span` is not a
/// valid string literal.
pub fn unquote(span: &[u8]) -> Result<String, serde_json::Error> {
    serde_json::from_slice::<String>(span)
}
