use serde::Deserialize;
use serde_json::Value;

use ocppj_core::types::{CiString255, CiString50, FieldErrors, Violation};

use crate::dispatch::Request;

/// `DataTransfer.req`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTransfer {
    pub vendor_id: CiString255,
    pub message_id: Option<CiString50>,
    /// Vendor-defined text, unconstrained by the protocol.
    pub data: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DataTransferWire {
    #[serde(default)]
    pub vendor_id: Option<Value>,
    #[serde(default)]
    pub message_id: Option<Value>,
    #[serde(default)]
    pub data: Option<Value>,
}

fn vendor_id(raw: String) -> Result<CiString255, Violation> {
    let v = CiString255::new(raw)?;
    if v.is_empty() {
        return Err(Violation::Required);
    }
    Ok(v)
}

impl Request for DataTransfer {
    const ACTION: &'static str = "DataTransfer";
    type Wire = DataTransferWire;

    fn from_wire(wire: DataTransferWire) -> Result<Self, FieldErrors> {
        let mut errs = FieldErrors::new();
        let vendor_id = errs.require_text("vendorId", wire.vendor_id, vendor_id);
        let message_id = errs.optional_text("messageId", wire.message_id, CiString50::new);
        let data = errs.optional_text("data", wire.data, Ok);

        match vendor_id {
            Some(vendor_id) if errs.is_empty() => Ok(Self {
                vendor_id,
                message_id,
                data,
            }),
            _ => Err(errs),
        }
    }
}
