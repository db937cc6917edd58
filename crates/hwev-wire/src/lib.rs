#![warn(clippy::pedantic)]

pub mod cursor;
pub mod error;
pub mod literal;
pub mod state;

pub use cursor::JsonCursor;
pub use error::WireError;
pub use state::{CursorState, DEFAULT_BUFFER_CAPACITY, MAX_DEPTH};
