#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use serde_json::value::RawValue;

use ocppj_core::error::OcppError;
use ocppj_dispatch::config::{self, DispatchConfig};
use ocppj_dispatch::dispatch::{Decoded, Validator};
use ocppj_dispatch::AppState;

fn accept_unit() -> Arc<dyn Validator> {
    Arc::new(|_: &RawValue| -> ocppj_core::Result<Decoded> { Ok(Decoded::new(())) })
}

#[test]
fn default_state_registers_builtins_and_freezes() {
    let app = AppState::new(DispatchConfig::default()).unwrap();
    assert_eq!(app.registry().len(), 5);
    assert!(app.registry().is_frozen());
    assert!(app.metrics().is_some());
}

#[test]
fn subset_of_builtins() {
    let cfg = config::load_from_str(
        "version: 1\ndispatch:\n  actions: [Heartbeat]\n  freeze_registry: false\n",
    )
    .unwrap();
    let app = AppState::new(cfg).unwrap();
    assert_eq!(app.registry().actions(), vec!["Heartbeat"]);
    assert!(!app.registry().is_frozen());

    let rej = app
        .dispatcher()
        .dispatch(br#"[2,"1","Authorize",{"idTag":"A"}]"#)
        .unwrap_err();
    assert!(matches!(rej.error, OcppError::UnregisteredAction(_)));
}

#[test]
fn extra_validator_conflicts_depend_on_policy() {
    let extra = || vec![("Authorize".to_string(), accept_unit())];

    let err = AppState::with_validators(DispatchConfig::default(), extra())
        .err()
        .expect("duplicate rejected");
    assert!(matches!(err, OcppError::DuplicateAction(ref a) if a == "Authorize"));

    let cfg = config::load_from_str("version: 1\ndispatch:\n  on_duplicate: replace\n").unwrap();
    let app = AppState::with_validators(cfg, extra()).unwrap();
    let d = app
        .dispatcher()
        .dispatch(br#"[2,"1","Authorize",{"anything":true}]"#)
        .unwrap();
    assert_eq!(d.id(), "1");
}

#[test]
fn extra_validator_for_new_action() {
    let app = AppState::with_validators(
        DispatchConfig::default(),
        vec![("StatusNotification".to_string(), accept_unit())],
    )
    .unwrap();
    assert!(app.registry().contains("StatusNotification"));
    assert_eq!(app.registry().len(), 6);
}

#[test]
fn frame_limit_comes_from_config() {
    let cfg = config::load_from_str("version: 1\ndispatch:\n  max_frame_bytes: 64\n").unwrap();
    let app = AppState::new(cfg).unwrap();
    let frame = format!(r#"[2,"1","DataTransfer",{{"vendorId":"{}"}}]"#, "v".repeat(100));
    let rej = app.dispatcher().dispatch(frame.as_bytes()).unwrap_err();
    assert!(matches!(rej.error, OcppError::FrameTooLarge { .. }));
}

#[test]
fn metrics_track_attempts_by_outcome() {
    let app = AppState::new(DispatchConfig::default()).unwrap();
    let d = app.dispatcher();
    d.dispatch(br#"[2,"1","Heartbeat",{}]"#).unwrap();
    d.dispatch(br#"[2,"2","Heartbeat",{}]"#).unwrap();
    d.dispatch(br#"[2,"3","Authorize",{}]"#).unwrap_err();
    d.dispatch(br#"[2,"4","Reset",{}]"#).unwrap_err();

    let m = app.metrics().unwrap();
    assert_eq!(
        m.attempts
            .get(&[("action", "Heartbeat"), ("outcome", "validated")]),
        2
    );
    assert_eq!(
        m.attempts
            .get(&[("outcome", "validation_failed"), ("action", "Authorize")]),
        1
    );
    assert_eq!(
        m.attempts
            .get(&[("action", "_unrouted"), ("outcome", "unrouted")]),
        1
    );
    assert_eq!(m.validate_duration.count(&[("action", "Heartbeat")]), 2);

    let text = m.render();
    assert!(text.contains("# TYPE ocppj_validate_attempts_total counter"));
    assert!(text.contains(
        "ocppj_validate_attempts_total{action=\"Heartbeat\",outcome=\"validated\"} 2"
    ));
    assert!(text.contains("ocppj_validate_duration_micros_count{action=\"Heartbeat\"} 2"));
    assert!(!text.contains("Reset"));
}

#[test]
fn hooks_disabled_leaves_metrics_off() {
    let cfg =
        config::load_from_str("version: 1\nhooks:\n  log: false\n  metrics: false\n").unwrap();
    let app = AppState::new(cfg).unwrap();
    assert!(app.metrics().is_none());
    assert!(app
        .dispatcher()
        .dispatch(br#"[2,"1","Heartbeat",{}]"#)
        .is_ok());
}
