//! In-process observability for dispatch: tracing hooks and metrics.
//!
//! Metrics are stored as atomics in `DashMap`s and rendered in Prometheus
//! text format on demand (the replay binary dumps them at exit).

pub mod hooks;
pub mod metrics;

pub use hooks::ObservabilityHooks;
pub use metrics::DispatchMetrics;
