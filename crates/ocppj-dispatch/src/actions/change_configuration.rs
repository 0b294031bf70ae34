use serde::Deserialize;
use serde_json::Value;

use ocppj_core::types::{CiString50, CiString500, FieldErrors};

use crate::dispatch::Request;

/// `ChangeConfiguration.req`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeConfiguration {
    pub key: CiString50,
    pub value: CiString500,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChangeConfigurationWire {
    #[serde(default)]
    pub key: Option<Value>,
    #[serde(default)]
    pub value: Option<Value>,
}

impl Request for ChangeConfiguration {
    const ACTION: &'static str = "ChangeConfiguration";
    type Wire = ChangeConfigurationWire;

    fn from_wire(wire: ChangeConfigurationWire) -> Result<Self, FieldErrors> {
        let mut errs = FieldErrors::new();
        let key = errs.require_text("key", wire.key, CiString50::new);
        let value = errs.require_text("value", wire.value, CiString500::new);
        match (key, value) {
            (Some(key), Some(value)) => Ok(Self { key, value }),
            _ => Err(errs),
        }
    }
}
