//! OCPP-J wire envelope.
//!
//! The parser is panic-free: malformed input is reported as `OcppError`
//! instead of panicking or indexing raw buffers.

pub mod envelope;

pub use envelope::{parse, Call, CallError, CallResult, Envelope, MessageKind, MIN_FRAME_ELEMENTS};
