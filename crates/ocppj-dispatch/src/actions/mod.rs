//! Built-in action validators (OCPP 1.6 request shapes).
//!
//! These cover a small, representative set of actions. Other actions are
//! registered by the embedding application the same way.

pub mod authorize;
pub mod boot_notification;
pub mod change_configuration;
pub mod data_transfer;
pub mod heartbeat;

use std::sync::Arc;

use ocppj_core::error::Result;

use crate::dispatch::{Registry, Request, RequestValidator, Validator};

pub use authorize::Authorize;
pub use boot_notification::BootNotification;
pub use change_configuration::ChangeConfiguration;
pub use data_transfer::DataTransfer;
pub use heartbeat::Heartbeat;

type Builder = fn() -> Arc<dyn Validator>;

fn build<T: Request>() -> Arc<dyn Validator> {
    Arc::new(RequestValidator::<T>::new())
}

const BUILTINS: &[(&str, Builder)] = &[
    (Authorize::ACTION, build::<Authorize>),
    (BootNotification::ACTION, build::<BootNotification>),
    (ChangeConfiguration::ACTION, build::<ChangeConfiguration>),
    (DataTransfer::ACTION, build::<DataTransfer>),
    (Heartbeat::ACTION, build::<Heartbeat>),
];

/// Names of every built-in action.
pub fn builtin_actions() -> impl Iterator<Item = &'static str> {
    BUILTINS.iter().map(|(name, _)| *name)
}

/// Validator for a built-in action, `None` for anything else.
pub fn validator_for(action: &str) -> Option<Arc<dyn Validator>> {
    BUILTINS
        .iter()
        .find(|(name, _)| *name == action)
        .map(|(_, build)| build())
}

/// Register every built-in action.
pub fn register_all(registry: &Registry) -> Result<()> {
    for (name, build) in BUILTINS {
        registry.register(*name, build())?;
    }
    Ok(())
}
