use serde::Deserialize;
use serde_json::Value;

use ocppj_core::types::{CiString20, FieldErrors};

use crate::dispatch::Request;

/// `Authorize.req`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authorize {
    pub id_tag: CiString20,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AuthorizeWire {
    #[serde(default)]
    pub id_tag: Option<Value>,
}

impl Request for Authorize {
    const ACTION: &'static str = "Authorize";
    type Wire = AuthorizeWire;

    fn from_wire(wire: AuthorizeWire) -> Result<Self, FieldErrors> {
        let mut errs = FieldErrors::new();
        match errs.require_text("idTag", wire.id_tag, CiString20::new) {
            Some(id_tag) => Ok(Self { id_tag }),
            None => Err(errs),
        }
    }
}
