#![warn(clippy::pedantic)]

pub mod config;
pub mod decoder;
pub mod error;
pub mod pool;

mod envelope;
mod payload;
mod timestamp;

pub use config::{DecoderConfig, PayloadFaults, TimestampFaults};
pub use decoder::{EventDecoder, decode_envelope, decode_payload, shared};
pub use error::{DecodeError, FaultKind};
pub use pool::{CursorPool, PoolStats, PooledCursor};
