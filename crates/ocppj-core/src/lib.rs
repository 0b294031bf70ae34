//! ocppj core: transport-agnostic OCPP-J primitives and error types.
//!
//! This crate defines the envelope format, the bounded field types and the
//! error surface shared by the dispatcher and any payload validator. It
//! carries no transport or runtime dependencies.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths surface as `OcppError`/`Result` so malformed frames
//! never crash the process.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;
pub mod types;

/// Shared result type.
pub use error::{ErrorCategory, ErrorCode, OcppError, Result};
