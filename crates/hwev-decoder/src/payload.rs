use std::io::Read;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use hwev_types::{BarePayload, Payload};
use hwev_wire::{JsonCursor, literal};

use crate::error::DecodeError;

/// Keys the payload readers act on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PayloadField {
    Version,
    Data,
    Unknown,
}

impl PayloadField {
    fn from_key(key: &str) -> Self {
        match key {
            "version" => Self::Version,
            "data" => Self::Data,
            _ => Self::Unknown,
        }
    }
}

/// Read the payload object nested under an envelope's `data` key.
///
/// `data` is double-encoded: the captured span is a JSON string literal
/// whose text is base64. See [`decode_double_encoded_data`].
///
/// An encoding fault does not stop the walk. The rest of the object is
/// still consumed so the enclosing reader stays on its own next key,
/// then the first fault is returned. Tokenizer faults return at once.
pub(crate) fn read_nested_payload<R: Read>(
    cursor: &mut JsonCursor<R>,
) -> Result<Payload, DecodeError> {
    let mut payload = Payload::default();
    let mut fault = None;

    while let Some(field) = cursor.next_key()?.map(PayloadField::from_key) {
        match field {
            PayloadField::Version => payload.version = cursor.read_string()?,
            PayloadField::Data => match decode_double_encoded_data(cursor.capture_raw()?) {
                Ok(bytes) => payload.data = bytes,
                Err(e) => {
                    fault.get_or_insert(e);
                }
            },
            PayloadField::Unknown => cursor.skip()?,
        }
    }

    match fault {
        Some(e) => Err(e),
        None => Ok(payload),
    }
}

/// Read a standalone payload object, keeping `data` as raw JSON text.
///
/// Whatever value sits under `data` is copied byte for byte; see
/// [`copy_raw_data`]. No base64 step happens here.
pub(crate) fn read_bare_payload<R: Read>(
    cursor: &mut JsonCursor<R>,
) -> Result<BarePayload, DecodeError> {
    let mut payload = BarePayload::default();

    while let Some(field) = cursor.next_key()?.map(PayloadField::from_key) {
        match field {
            PayloadField::Version => payload.version = cursor.read_string()?,
            PayloadField::Data => payload.data = copy_raw_data(cursor.capture_raw()?),
            PayloadField::Unknown => cursor.skip()?,
        }
    }

    Ok(payload)
}

/// Turn a captured `data` span back into bytes.
///
/// ```text
///   span  "AAEC/w=="          (quotes part of the span)
///     │ unquote
///   text  AAEC/w==
///     │ base64, standard alphabet, padded
///   bytes [0x00, 0x01, 0x02, 0xFF]
/// ```
///
/// A `null` span yields no bytes.
fn decode_double_encoded_data(span: &[u8]) -> Result<Vec<u8>, DecodeError> {
    if span == b"null" {
        return Ok(Vec::new());
    }
    let text = literal::unquote(span).map_err(DecodeError::InvalidQuoting)?;
    STANDARD.decode(text).map_err(DecodeError::InvalidBase64)
}

fn copy_raw_data(span: &[u8]) -> Vec<u8> {
    span.to_vec()
}
