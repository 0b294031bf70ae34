//! Pre/post validation hooks and panic isolation.
//!
//! One hook of each kind can be installed at a time (last writer wins). The
//! post hook sees every attempted action, including unrouted ones and ones
//! whose pre hook panicked.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use serde_json::value::RawValue;

use ocppj_core::error::{OcppError, Result};

use super::validator::Decoded;

/// Called with the action name and raw payload before validation.
pub type PreHook = Arc<dyn Fn(&str, &RawValue) + Send + Sync>;

/// Called with the action name and the validation result.
pub type PostHook = Arc<dyn Fn(&str, std::result::Result<&Decoded, &OcppError>) + Send + Sync>;

/// Terminal state of one validation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Validator ran and accepted the payload.
    Validated,
    /// Validator ran (or a hook failed around it) and the call was rejected.
    ValidationFailed,
    /// No validator registered for the action.
    Unrouted,
}

impl Outcome {
    pub fn of(res: std::result::Result<&Decoded, &OcppError>) -> Self {
        match res {
            Ok(_) => Outcome::Validated,
            Err(OcppError::UnregisteredAction(_)) => Outcome::Unrouted,
            Err(_) => Outcome::ValidationFailed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Validated => "validated",
            Outcome::ValidationFailed => "validation_failed",
            Outcome::Unrouted => "unrouted",
        }
    }
}

/// Run a hook, turning a panic into [`OcppError::HookPanicked`].
pub(crate) fn run_hook(hook: &'static str, action: &str, f: impl FnOnce()) -> Result<()> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|p| {
        let message = panic_message(p.as_ref());
        tracing::error!(hook, action, %message, "hook panicked");
        OcppError::HookPanicked {
            hook,
            action: action.to_string(),
            message,
        }
    })
}

/// Run a validator, turning a panic into [`OcppError::ValidatorPanicked`].
pub(crate) fn run_validator(action: &str, f: impl FnOnce() -> Result<Decoded>) -> Result<Decoded> {
    catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|p| {
        let message = panic_message(p.as_ref());
        tracing::error!(action, %message, "validator panicked");
        Err(OcppError::ValidatorPanicked {
            action: action.to_string(),
            message,
        })
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
