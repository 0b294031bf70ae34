#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use serde_json::value::RawValue;

use ocppj_core::error::{ErrorCode, OcppError};
use ocppj_core::types::Violation;
use ocppj_dispatch::actions::{
    self, BootNotification, ChangeConfiguration, DataTransfer, Heartbeat,
};
use ocppj_dispatch::dispatch::Decoded;

fn run(action: &str, payload: &str) -> ocppj_core::Result<Decoded> {
    let v = actions::validator_for(action).expect("built-in");
    let raw = RawValue::from_string(payload.to_string()).unwrap();
    v.validate(&raw)
}

fn field_errors(res: ocppj_core::Result<Decoded>) -> Vec<(String, Violation)> {
    match res {
        Err(OcppError::Validation(errs)) => errs
            .iter()
            .map(|e| (e.field.clone(), e.violation.clone()))
            .collect(),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn boot_notification_minimal_and_full() {
    let minimal = run(
        "BootNotification",
        r#"{"chargePointVendor":"VendorX","chargePointModel":"SingleSocketCharger"}"#,
    )
    .unwrap()
    .downcast::<BootNotification>()
    .unwrap();
    assert_eq!(minimal.charge_point_vendor.as_str(), "VendorX");
    assert!(minimal.firmware_version.is_none());

    let full = run(
        "BootNotification",
        r#"{"chargePointVendor":"VendorX","chargePointModel":"M1",
            "chargePointSerialNumber":"CP-0001","chargeBoxSerialNumber":"CB-0001",
            "firmwareVersion":"1.2.3","iccid":"8931","imsi":"2040",
            "meterType":"DIN","meterSerialNumber":"MTR-7"}"#,
    )
    .unwrap()
    .downcast::<BootNotification>()
    .unwrap();
    assert_eq!(full.meter_serial_number.unwrap().as_str(), "MTR-7");
}

#[test]
fn boot_notification_reports_every_bad_field() {
    let long = "V".repeat(21);
    let payload = format!(
        r#"{{"chargePointVendor":"{long}","chargePointModel":"M\u0001","firmwareVersion":"{}"}}"#,
        "f".repeat(51)
    );
    let errs = field_errors(run("BootNotification", &payload));

    assert_eq!(
        errs,
        vec![
            (
                "chargePointVendor".to_string(),
                Violation::TooLong {
                    max: 20,
                    actual: 21
                }
            ),
            (
                "chargePointModel".to_string(),
                Violation::InvalidChar {
                    ch: '\u{1}',
                    position: 1
                }
            ),
            (
                "firmwareVersion".to_string(),
                Violation::TooLong {
                    max: 50,
                    actual: 51
                }
            ),
        ]
    );
}

#[test]
fn validation_message_joins_fields() {
    let err = run(
        "ChangeConfiguration",
        &format!(r#"{{"key":"{}","value":"{}"}}"#, "k".repeat(51), "v".repeat(501)),
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "validation failed: key: length 51 exceeds maximum of 50; \
         value: length 501 exceeds maximum of 500"
    );
    assert_eq!(err.error_code(), ErrorCode::PropertyConstraintViolation);
}

#[test]
fn change_configuration_accepts_bounds() {
    let ok = run(
        "ChangeConfiguration",
        &format!(r#"{{"key":"{}","value":"{}"}}"#, "k".repeat(50), "v".repeat(500)),
    )
    .unwrap();
    let req = ok.downcast::<ChangeConfiguration>().unwrap();
    assert_eq!(req.key.len(), 50);
    assert_eq!(req.value.len(), 500);
}

#[test]
fn data_transfer_requires_vendor_id() {
    let errs = field_errors(run("DataTransfer", r#"{"vendorId":""}"#));
    assert_eq!(errs, vec![("vendorId".to_string(), Violation::Required)]);

    let ok = run(
        "DataTransfer",
        r#"{"vendorId":"com.example","messageId":"Ping","data":"free text \n ok"}"#,
    )
    .unwrap()
    .downcast::<DataTransfer>()
    .unwrap();
    assert_eq!(ok.message_id.unwrap().as_str(), "Ping");
    assert_eq!(ok.data.as_deref(), Some("free text \n ok"));
}

#[test]
fn heartbeat_rejects_unknown_fields() {
    assert!(run("Heartbeat", "{}").unwrap().is::<Heartbeat>());

    let err = run("Heartbeat", r#"{"extra":1}"#).unwrap_err();
    assert!(matches!(err, OcppError::PayloadType(_)), "{err:?}");
}

#[test]
fn boot_notification_reports_missing_and_bad_fields_together() {
    let payload = format!(
        r#"{{"chargePointVendor":"{}","firmwareVersion":"{}"}}"#,
        "V".repeat(21),
        "F".repeat(51)
    );
    let errs = field_errors(run("BootNotification", &payload));

    assert_eq!(
        errs,
        vec![
            (
                "chargePointVendor".to_string(),
                Violation::TooLong {
                    max: 20,
                    actual: 21
                }
            ),
            ("chargePointModel".to_string(), Violation::Required),
            (
                "firmwareVersion".to_string(),
                Violation::TooLong {
                    max: 50,
                    actual: 51
                }
            ),
        ]
    );
}

#[test]
fn wrong_types_and_missing_fields_are_classified() {
    let err = run("Authorize", r#"{"idTag":42}"#).unwrap_err();
    assert_eq!(err.error_code(), ErrorCode::TypeConstraintViolation);
    assert_eq!(
        err.to_string(),
        "validation failed: idTag: expected a string, got a number"
    );

    let err = run("ChangeConfiguration", r#"{"key":"HeartbeatInterval"}"#).unwrap_err();
    assert_eq!(err.error_code(), ErrorCode::OccurrenceConstraintViolation);
    assert_eq!(err.to_string(), "validation failed: value: value is required");

    let errs = field_errors(run(
        "ChangeConfiguration",
        &format!(r#"{{"key":"{}","value":true}}"#, "k".repeat(51)),
    ));
    assert_eq!(errs.len(), 2);
    assert_eq!(errs[0].1.kind(), "length");
    assert_eq!(errs[1].1.kind(), "type");

    let err = run("Authorize", r#"[]"#).unwrap_err();
    assert!(matches!(err, OcppError::PayloadType(_)), "{err:?}");
    assert_eq!(err.error_code(), ErrorCode::TypeConstraintViolation);
}

#[test]
fn null_optional_fields_count_as_absent() {
    let ok = run(
        "DataTransfer",
        r#"{"vendorId":"com.example","messageId":null,"data":null}"#,
    )
    .unwrap()
    .downcast::<DataTransfer>()
    .unwrap();
    assert!(ok.message_id.is_none());
    assert!(ok.data.is_none());

    let errs = field_errors(run("Authorize", r#"{"idTag":null}"#));
    assert_eq!(errs, vec![("idTag".to_string(), Violation::Required)]);
}

#[test]
fn unknown_builtin_is_none() {
    assert!(actions::validator_for("Reset").is_none());
    assert_eq!(actions::builtin_actions().count(), 5);
}
