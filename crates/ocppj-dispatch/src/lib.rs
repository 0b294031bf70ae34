//! ocppj dispatch library entry.
//!
//! This crate wires the validator registry, hook pipeline, dispatcher,
//! built-in action validators and observability into one stack. It is
//! consumed by the replay binary (`main.rs`) and by integration tests.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod actions;
pub mod app_state;
pub mod config;
pub mod dispatch;
pub mod obs;
pub mod replay;

pub use app_state::AppState;
pub use dispatch::{Dispatched, Dispatcher, Outcome, Registry, Rejection, Validator};
