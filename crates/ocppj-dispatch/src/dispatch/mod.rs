//! Dispatcher module exports.
//!
//! Re-exports the registry, dispatcher, hook and validator types so
//! downstream consumers can depend on this module directly.

pub mod dispatcher;
pub mod hooks;
pub mod registry;
pub mod validator;

pub use dispatcher::{Dispatched, Dispatcher, Rejection};
pub use hooks::{Outcome, PostHook, PreHook};
pub use registry::Registry;
pub use validator::{Decoded, Request, RequestValidator, Validator};
