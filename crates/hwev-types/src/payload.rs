/// The versioned binary body nested in an envelope's `data` key.
///
/// `data` holds genuine binary content. On the wire it travels as a
/// base64 string inside a JSON string value:
///
/// ```text
///   bytes [0x00, 0x01, 0x02, 0xFF]
///     → base64         AAEC/w==
///     → JSON value     "data": "AAEC/w=="
/// ```
///
/// The decoder captures the raw span `"AAEC/w=="` (quotes included),
/// unquotes it and base64-decodes the result to get back to the bytes.
///
/// An empty or missing `data` is an empty vector, never an error.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Payload {
    /// Payload schema version; the empty string is the default.
    pub version: String,
    pub data: Vec<u8>,
}

impl Payload {
    pub fn new(version: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            version: version.into(),
            data: data.into(),
        }
    }
}

/// A standalone `{version, data}` record decoded on its own, outside
/// any envelope.
///
/// Unlike [`Payload`], `data` here is the raw source span of the `data`
/// value copied verbatim: a string keeps its quotes and escapes, an
/// object keeps its braces. Nothing is unquoted and nothing is
/// base64-decoded.
///
/// ```text
///   {"version":"v1","data":"AAEC/w=="}
///     → BarePayload { version: "v1", data: b"\"AAEC/w==\"" }
/// ```
///
/// The two rules for the same key name are kept apart on purpose:
/// callers that already hold payload-only bytes depend on getting the
/// span untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BarePayload {
    pub version: String,
    /// Raw JSON text of the `data` value; empty when the key was absent.
    pub data: Vec<u8>,
}

impl BarePayload {
    /// The raw `data` span as text, if it is valid UTF-8.
    pub fn data_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.data).ok()
    }
}
