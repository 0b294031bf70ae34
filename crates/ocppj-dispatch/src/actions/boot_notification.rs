use serde::Deserialize;
use serde_json::Value;

use ocppj_core::types::{CiString20, CiString25, CiString50, FieldErrors};

use crate::dispatch::Request;

/// `BootNotification.req`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootNotification {
    pub charge_point_vendor: CiString20,
    pub charge_point_model: CiString20,
    pub charge_point_serial_number: Option<CiString25>,
    pub charge_box_serial_number: Option<CiString25>,
    pub firmware_version: Option<CiString50>,
    pub iccid: Option<CiString20>,
    pub imsi: Option<CiString20>,
    pub meter_type: Option<CiString25>,
    pub meter_serial_number: Option<CiString25>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BootNotificationWire {
    #[serde(default)]
    pub charge_point_vendor: Option<Value>,
    #[serde(default)]
    pub charge_point_model: Option<Value>,
    #[serde(default)]
    pub charge_point_serial_number: Option<Value>,
    #[serde(default)]
    pub charge_box_serial_number: Option<Value>,
    #[serde(default)]
    pub firmware_version: Option<Value>,
    #[serde(default)]
    pub iccid: Option<Value>,
    #[serde(default)]
    pub imsi: Option<Value>,
    #[serde(default)]
    pub meter_type: Option<Value>,
    #[serde(default)]
    pub meter_serial_number: Option<Value>,
}

impl Request for BootNotification {
    const ACTION: &'static str = "BootNotification";
    type Wire = BootNotificationWire;

    fn from_wire(w: BootNotificationWire) -> Result<Self, FieldErrors> {
        let mut errs = FieldErrors::new();
        let vendor =
            errs.require_text("chargePointVendor", w.charge_point_vendor, CiString20::new);
        let model = errs.require_text("chargePointModel", w.charge_point_model, CiString20::new);
        let cp_serial = errs.optional_text(
            "chargePointSerialNumber",
            w.charge_point_serial_number,
            CiString25::new,
        );
        let box_serial = errs.optional_text(
            "chargeBoxSerialNumber",
            w.charge_box_serial_number,
            CiString25::new,
        );
        let firmware = errs.optional_text("firmwareVersion", w.firmware_version, CiString50::new);
        let iccid = errs.optional_text("iccid", w.iccid, CiString20::new);
        let imsi = errs.optional_text("imsi", w.imsi, CiString20::new);
        let meter_type = errs.optional_text("meterType", w.meter_type, CiString25::new);
        let meter_serial =
            errs.optional_text("meterSerialNumber", w.meter_serial_number, CiString25::new);

        match (vendor, model) {
            (Some(charge_point_vendor), Some(charge_point_model)) if errs.is_empty() => Ok(Self {
                charge_point_vendor,
                charge_point_model,
                charge_point_serial_number: cp_serial,
                charge_box_serial_number: box_serial,
                firmware_version: firmware,
                iccid,
                imsi,
                meter_type,
                meter_serial_number: meter_serial,
            }),
            _ => Err(errs),
        }
    }
}
