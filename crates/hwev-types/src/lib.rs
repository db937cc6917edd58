#![warn(clippy::pedantic)]

pub mod error;
pub mod envelope;
pub mod payload;
pub mod timestamp;

pub use envelope::Envelope;
pub use error::TypeError;
pub use payload::{BarePayload, Payload};
pub use timestamp::{format_timestamp, parse_timestamp};
pub use time::OffsetDateTime;
