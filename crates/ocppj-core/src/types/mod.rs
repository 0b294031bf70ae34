//! Payload field types shared by action validators.

pub mod cistring;
pub mod fields;

pub use cistring::{CiString, CiString20, CiString25, CiString255, CiString50, CiString500};
pub use fields::{FieldError, FieldErrors, Violation};
