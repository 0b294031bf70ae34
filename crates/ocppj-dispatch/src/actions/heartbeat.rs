use serde::Deserialize;

use ocppj_core::types::FieldErrors;

use crate::dispatch::Request;

/// `Heartbeat.req` (empty object).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Heartbeat;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeartbeatWire {}

impl Request for Heartbeat {
    const ACTION: &'static str = "Heartbeat";
    type Wire = HeartbeatWire;

    fn from_wire(_wire: HeartbeatWire) -> Result<Self, FieldErrors> {
        Ok(Heartbeat)
    }
}
