//! Shared application state: registry, dispatcher and metrics wired from config.
//!
//! Startup errors are explicit (`Result` instead of panic).

use std::sync::Arc;

use ocppj_core::error::{OcppError, Result};

use crate::actions;
use crate::config::{DispatchConfig, DuplicatePolicy};
use crate::dispatch::{Dispatcher, Registry, Validator};
use crate::obs::{DispatchMetrics, ObservabilityHooks};

/// Extra validators supplied by the embedding application.
pub type ExtraValidators = Vec<(String, Arc<dyn Validator>)>;

#[derive(Clone)]
pub struct AppState {
    cfg: Arc<DispatchConfig>,
    dispatcher: Dispatcher,
    metrics: Option<Arc<DispatchMetrics>>,
}

impl AppState {
    pub fn new(cfg: DispatchConfig) -> Result<Self> {
        Self::with_validators(cfg, Vec::new())
    }

    /// Build state, registering `extra` after the built-ins. `extra` may
    /// override a built-in only when `dispatch.on_duplicate` is `replace`.
    pub fn with_validators(cfg: DispatchConfig, extra: ExtraValidators) -> Result<Self> {
        let registry = Arc::new(Registry::new());
        let policy = cfg.dispatch.on_duplicate;

        // 1) Built-in actions
        let enabled: Vec<&str> = if cfg.dispatch.actions.is_empty() {
            actions::builtin_actions().collect()
        } else {
            cfg.dispatch.actions.iter().map(String::as_str).collect()
        };
        for name in enabled {
            let validator = actions::validator_for(name)
                .ok_or_else(|| OcppError::Config(format!("unknown built-in action: {name}")))?;
            add(&registry, policy, name, validator)?;
        }

        // 2) Application validators
        for (name, validator) in extra {
            add(&registry, policy, &name, validator)?;
        }

        // 3) Hooks
        let metrics = cfg.hooks.metrics.then(|| Arc::new(DispatchMetrics::new()));
        let mut hooks = ObservabilityHooks::new().with_logging(cfg.hooks.log);
        if let Some(m) = &metrics {
            hooks = hooks.with_metrics(Arc::clone(m));
        }
        hooks.install(&registry);

        if cfg.dispatch.freeze_registry {
            registry.freeze();
        }

        tracing::info!(
            actions = ?registry.actions(),
            frozen = registry.is_frozen(),
            max_frame_bytes = cfg.dispatch.max_frame_bytes,
            "dispatcher ready"
        );

        let dispatcher =
            Dispatcher::new(registry).with_max_frame_bytes(cfg.dispatch.max_frame_bytes);

        Ok(Self {
            cfg: Arc::new(cfg),
            dispatcher,
            metrics,
        })
    }

    pub fn cfg(&self) -> &DispatchConfig {
        &self.cfg
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn registry(&self) -> &Registry {
        self.dispatcher.registry()
    }

    pub fn metrics(&self) -> Option<Arc<DispatchMetrics>> {
        self.metrics.clone()
    }
}

fn add(
    registry: &Registry,
    policy: DuplicatePolicy,
    name: &str,
    validator: Arc<dyn Validator>,
) -> Result<()> {
    match policy {
        DuplicatePolicy::Reject => registry.register(name, validator),
        DuplicatePolicy::Replace => registry.replace(name, validator).map(|_| ()),
    }
}
