//! Property tests for the envelope parser.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use proptest::prelude::*;
use serde_json::{json, Value};

use ocppj_core::protocol::{parse, Envelope, MessageKind};
use ocppj_core::OcppError;

fn id_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9-]{1,36}"
}

fn action_strategy() -> impl Strategy<Value = String> {
    "[A-Z][A-Za-z]{0,31}"
}

fn payload_strategy() -> impl Strategy<Value = Value> {
    prop::collection::btree_map("[a-zA-Z]{1,12}", prop_oneof![
        any::<i64>().prop_map(Value::from),
        "[ -~]{0,20}".prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
    ], 0..6)
    .prop_map(|m| Value::Object(m.into_iter().collect()))
}

/// Correctly typed elements for a frame of `kind`, discriminator first.
fn full_frame(kind: MessageKind) -> Vec<Value> {
    match kind {
        MessageKind::Call => vec![json!(2), json!("id-1"), json!("Heartbeat"), json!({})],
        MessageKind::CallResult => vec![json!(3), json!("id-1"), json!({})],
        MessageKind::CallError => vec![
            json!(4),
            json!("id-1"),
            json!("GenericError"),
            json!("boom"),
            json!({}),
        ],
    }
}

fn kind_strategy() -> impl Strategy<Value = MessageKind> {
    prop_oneof![
        Just(MessageKind::Call),
        Just(MessageKind::CallResult),
        Just(MessageKind::CallError),
    ]
}

#[test]
fn prop_call_round_trip() {
    proptest!(|(id in id_strategy(), action in action_strategy(), payload in payload_strategy())| {
        let frame = serde_json::to_vec(&json!([2, id, action, payload])).unwrap();
        let env = parse(&frame).unwrap();

        let Envelope::Call(call) = env else {
            panic!("expected CALL");
        };
        prop_assert_eq!(&call.id, &id);
        prop_assert_eq!(&call.action, &action);
        let back: Value = serde_json::from_str(call.payload.get()).unwrap();
        prop_assert_eq!(back, payload);

        // serializing the envelope again yields the same JSON value
        let again: Value = serde_json::from_slice(&Envelope::Call(call).to_vec().unwrap()).unwrap();
        let orig: Value = serde_json::from_slice(&frame).unwrap();
        prop_assert_eq!(again, orig);
    });
}

#[test]
fn prop_short_frames_always_fail_arity() {
    proptest!(|(kind in kind_strategy(), cut in 0usize..5)| {
        let mut elems = full_frame(kind);
        prop_assume!(cut < elems.len());
        elems.truncate(cut);

        let frame = serde_json::to_vec(&Value::Array(elems)).unwrap();
        let err = parse(&frame).expect_err("short frame must fail");
        prop_assert!(err.is_arity(), "kind={kind} cut={cut} err={err}");
    });
}

#[test]
fn prop_exact_arity_always_parses() {
    proptest!(|(kind in kind_strategy())| {
        let frame = serde_json::to_vec(&Value::Array(full_frame(kind))).unwrap();
        let env = parse(&frame).unwrap();
        prop_assert_eq!(env.kind(), kind);
    });
}

#[test]
fn prop_unknown_discriminator_rejected() {
    proptest!(|(disc in any::<i64>().prop_filter("defined kinds", |d| !(2..=4).contains(d)))| {
        let frame = serde_json::to_vec(&json!([disc, "id", {}])).unwrap();
        let err = parse(&frame).expect_err("unknown kind must fail");
        prop_assert!(matches!(err, OcppError::UnsupportedMessageKind(ref d) if *d == disc.to_string()));
    });
}

#[test]
fn zero_and_negative_discriminators_rejected() {
    for disc in [0i64, -1, -2, 1, 5, i64::MIN, i64::MAX] {
        let frame = serde_json::to_vec(&json!([disc, "id", "x", {}])).unwrap();
        let err = parse(&frame).unwrap_err();
        assert!(
            matches!(err, OcppError::UnsupportedMessageKind(ref d) if *d == disc.to_string()),
            "disc={disc} err={err}"
        );
    }
}

#[test]
fn discriminators_beyond_i64_are_unknown_kinds() {
    for disc in ["18446744073709551615", "-9223372036854775809", "100000000000000000000000"] {
        let frame = format!(r#"[{disc},"id",{{}}]"#);
        let err = parse(frame.as_bytes()).unwrap_err();
        assert!(
            matches!(err, OcppError::UnsupportedMessageKind(ref d) if d == disc),
            "disc={disc} err={err:?}"
        );
    }

    for not_integer in ["2.0", "2e0", "\"2\"", "true"] {
        let frame = format!(r#"[{not_integer},"id",{{}}]"#);
        let err = parse(frame.as_bytes()).unwrap_err();
        assert!(
            matches!(err, OcppError::ElementType { index: 0, .. }),
            "{not_integer}: {err:?}"
        );
    }
}
