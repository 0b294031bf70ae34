//! Logging and metrics hooks for the dispatcher.
//!
//! Only one pre and one post hook can be installed, so logging and metrics
//! are folded into a single pair.

use std::cell::Cell;
use std::sync::Arc;
use std::time::Instant;

use serde_json::value::RawValue;

use ocppj_core::error::OcppError;

use crate::dispatch::{Decoded, Outcome, PostHook, PreHook, Registry};

use super::metrics::DispatchMetrics;

/// Label used instead of the peer-supplied name for unrouted actions.
const UNROUTED_LABEL: &str = "_unrouted";

thread_local! {
    // Validation is synchronous, so pre and post run on the same thread.
    static STARTED: Cell<Option<Instant>> = const { Cell::new(None) };
}

#[derive(Clone, Default)]
pub struct ObservabilityHooks {
    log: bool,
    metrics: Option<Arc<DispatchMetrics>>,
}

impl ObservabilityHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_logging(mut self, on: bool) -> Self {
        self.log = on;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<DispatchMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.log || self.metrics.is_some()
    }

    pub fn pre_hook(&self) -> PreHook {
        let log = self.log;
        let timed = self.metrics.is_some();
        Arc::new(move |action: &str, payload: &RawValue| {
            if timed {
                STARTED.with(|s| s.set(Some(Instant::now())));
            }
            if log {
                tracing::debug!(action, payload_bytes = payload.get().len(), "validating");
            }
        })
    }

    pub fn post_hook(&self) -> PostHook {
        let log = self.log;
        let metrics = self.metrics.clone();
        Arc::new(move |action: &str, res: Result<&Decoded, &OcppError>| {
            let outcome = Outcome::of(res);
            let label = match outcome {
                Outcome::Unrouted => UNROUTED_LABEL,
                _ => action,
            };

            if let Some(m) = &metrics {
                m.attempts
                    .inc(&[("action", label), ("outcome", outcome.as_str())]);
                if let Some(started) = STARTED.with(|s| s.take()) {
                    m.validate_duration
                        .observe(&[("action", label)], started.elapsed());
                }
            }

            if log {
                match res {
                    Ok(decoded) => {
                        tracing::debug!(action, decoded = decoded.type_name(), "validated")
                    }
                    Err(e) => tracing::warn!(
                        action,
                        outcome = outcome.as_str(),
                        code = e.error_code().as_str(),
                        error = %e,
                        "rejected"
                    ),
                }
            }
        })
    }

    /// Install the pair, or clear both slots when nothing is enabled.
    pub fn install(&self, registry: &Registry) {
        if self.is_enabled() {
            registry.set_pre_hook(Some(self.pre_hook()));
            registry.set_post_hook(Some(self.post_hook()));
        } else {
            registry.set_pre_hook(None);
            registry.set_post_hook(None);
        }
    }
}
