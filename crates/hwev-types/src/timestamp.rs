use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::TypeError;

/// Parse an RFC 3339 timestamp such as `2021-03-04T05:06:07.123456789Z`
/// or `2021-03-04T07:06:07+02:00`.
///
/// The UTC offset written in the input is preserved on the returned
/// value; two timestamps naming the same instant compare equal either way.
///
/// # Errors
///
/// [`TypeError::InvalidTimestamp`] carrying the input text when it does
/// not match the RFC 3339 grammar (the empty string included).
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, TypeError> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|source| TypeError::InvalidTimestamp {
        value: value.to_string(),
        source,
    })
}

/// Render a timestamp as RFC 3339, the inverse of [`parse_timestamp`].
///
/// # Errors
///
/// [`TypeError::UnformattableTimestamp`] when the value has no RFC 3339
/// form (years before 0 or after 9999, or sub-minute offsets).
pub fn format_timestamp(value: OffsetDateTime) -> Result<String, TypeError> {
    value
        .format(&Rfc3339)
        .map_err(TypeError::UnformattableTimestamp)
}
