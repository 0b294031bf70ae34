#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use serde_json::json;

use ocppj_core::types::{CiString20, FieldErrors, Violation};
use ocppj_core::{ErrorCode, OcppError};

#[test]
fn text_fields_record_every_problem() {
    let mut errs = FieldErrors::new();

    let missing = errs.require_text("a", None, CiString20::new);
    let null = errs.require_text("b", Some(json!(null)), CiString20::new);
    let number = errs.require_text("c", Some(json!(42)), CiString20::new);
    let long = errs.require_text("d", Some(json!("x".repeat(21))), CiString20::new);
    let ok = errs.require_text("e", Some(json!("fine")), CiString20::new);

    assert!(missing.is_none() && null.is_none() && number.is_none() && long.is_none());
    assert_eq!(ok.unwrap().as_str(), "fine");

    let got: Vec<(&str, &Violation)> = errs
        .iter()
        .map(|e| (e.field.as_str(), &e.violation))
        .collect();
    assert_eq!(
        got,
        vec![
            ("a", &Violation::Required),
            ("b", &Violation::Required),
            (
                "c",
                &Violation::WrongType {
                    expected: "a string",
                    actual: "a number"
                }
            ),
            ("d", &Violation::TooLong { max: 20, actual: 21 }),
        ]
    );
    assert_eq!(
        errs.to_string(),
        "a: value is required; b: value is required; c: expected a string, got a number; \
         d: length 21 exceeds maximum of 20"
    );
}

#[test]
fn optional_text_treats_null_as_absent() {
    let mut errs = FieldErrors::new();
    assert!(errs.optional_text("a", None, CiString20::new).is_none());
    assert!(errs.optional_text("b", Some(json!(null)), CiString20::new).is_none());
    assert!(errs.is_empty());

    assert!(errs.optional_text("c", Some(json!([1])), CiString20::new).is_none());
    assert_eq!(errs.len(), 1);
    assert_eq!(errs.iter().next().unwrap().violation.kind(), "type");
}

#[test]
fn validation_code_follows_most_specific_violation() {
    let code = |violations: Vec<Violation>| {
        let mut errs = FieldErrors::new();
        for v in violations {
            errs.push("f", v);
        }
        OcppError::Validation(errs).error_code()
    };

    let too_long = || Violation::TooLong { max: 20, actual: 21 };
    let wrong = || Violation::WrongType {
        expected: "a string",
        actual: "a boolean",
    };

    assert_eq!(code(vec![too_long()]), ErrorCode::PropertyConstraintViolation);
    assert_eq!(
        code(vec![too_long(), Violation::Required]),
        ErrorCode::OccurrenceConstraintViolation
    );
    assert_eq!(
        code(vec![Violation::Required, wrong(), too_long()]),
        ErrorCode::TypeConstraintViolation
    );
}
