use std::io::Read;

use hwev_types::OffsetDateTime;
use hwev_wire::JsonCursor;

use crate::error::DecodeError;

/// Read the next string token and parse it as an RFC 3339 timestamp.
///
/// Tokenizer faults come back as [`DecodeError::Tokenizer`], a string
/// that does not parse as [`DecodeError::Type`]. Deciding *when* the
/// latter aborts the decode is the envelope reader's job.
pub(crate) fn read_timestamp<R: Read>(
    cursor: &mut JsonCursor<R>,
) -> Result<OffsetDateTime, DecodeError> {
    let text = cursor.read_string()?;
    Ok(hwev_types::parse_timestamp(&text)?)
}
