//! OCPP-J envelope: a JSON array tagged by an integer message kind.
//!
//! - CALL:       `[2, id, action, payload]`
//! - CALLRESULT: `[3, id, payload]`
//! - CALLERROR:  `[4, id, errorCode, errorDescription, errorDetails]`
//!
//! Parsing rules:
//! - Elements are kept as `RawValue`; payloads are never re-parsed here.
//! - No indexing, no `unwrap()`; arity is checked before any destructuring.
//! - All-or-nothing: a failing frame never yields a partial envelope.

use std::fmt;

use serde::Serialize;
use serde_json::json;
use serde_json::value::{to_raw_value, RawValue};

use crate::error::{ErrorCode, OcppError, Result};

/// Minimum element count of any frame (`[3, id, payload]`).
pub const MIN_FRAME_ELEMENTS: usize = 3;

/// Message kind discriminator (element 0 of the array).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Call,
    CallResult,
    CallError,
}

impl MessageKind {
    /// Integer written on the wire.
    pub fn code(self) -> u8 {
        match self {
            MessageKind::Call => 2,
            MessageKind::CallResult => 3,
            MessageKind::CallError => 4,
        }
    }

    /// Exact element count of a frame of this kind.
    pub fn arity(self) -> usize {
        match self {
            MessageKind::Call => 4,
            MessageKind::CallResult => 3,
            MessageKind::CallError => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::Call => "CALL",
            MessageKind::CallResult => "CALLRESULT",
            MessageKind::CallError => "CALLERROR",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<i64> for MessageKind {
    type Error = OcppError;

    fn try_from(v: i64) -> Result<Self> {
        match v {
            2 => Ok(MessageKind::Call),
            3 => Ok(MessageKind::CallResult),
            4 => Ok(MessageKind::CallError),
            other => Err(OcppError::UnsupportedMessageKind(other.to_string())),
        }
    }
}

/// Client-initiated request.
#[derive(Debug, Clone)]
pub struct Call {
    pub id: String,
    pub action: String,
    pub payload: Box<RawValue>,
}

impl Call {
    pub fn new(
        id: impl Into<String>,
        action: impl Into<String>,
        payload: &impl Serialize,
    ) -> Result<Self> {
        Ok(Self {
            id: non_empty_id(id.into())?,
            action: action.into(),
            payload: raw_json(payload)?,
        })
    }
}

/// Success response. The action is implied by the pending CALL with the same id.
#[derive(Debug, Clone)]
pub struct CallResult {
    pub id: String,
    pub payload: Box<RawValue>,
}

impl CallResult {
    pub fn new(id: impl Into<String>, payload: &impl Serialize) -> Result<Self> {
        Ok(Self {
            id: non_empty_id(id.into())?,
            payload: raw_json(payload)?,
        })
    }
}

/// Failure response.
#[derive(Debug, Clone)]
pub struct CallError {
    pub id: String,
    pub error_code: String,
    pub error_description: String,
    pub error_details: Box<RawValue>,
}

impl CallError {
    pub fn new(
        id: impl Into<String>,
        code: ErrorCode,
        description: impl Into<String>,
        details: &impl Serialize,
    ) -> Result<Self> {
        Ok(Self {
            id: non_empty_id(id.into())?,
            error_code: code.as_str().to_string(),
            error_description: description.into(),
            error_details: raw_json(details)?,
        })
    }

    /// Build the reply for a failed CALL. Field violations are listed under
    /// `errorDetails.fields`.
    pub fn from_error(id: impl Into<String>, err: &OcppError) -> Result<Self> {
        let details = match err {
            OcppError::Validation(fields) => {
                let fields: Vec<_> = fields
                    .iter()
                    .map(|f| {
                        json!({
                            "field": f.field,
                            "violation": f.violation.kind(),
                            "message": f.violation.to_string(),
                        })
                    })
                    .collect();
                json!({ "fields": fields })
            }
            _ => json!({}),
        };
        Self::new(id, err.error_code(), err.to_string(), &details)
    }

    /// Typed error code, when the peer sent a recognised one.
    pub fn code(&self) -> Option<ErrorCode> {
        self.error_code.parse().ok()
    }
}

/// Parsed frame of any kind.
#[derive(Debug, Clone)]
pub enum Envelope {
    Call(Call),
    CallResult(CallResult),
    CallError(CallError),
}

impl Envelope {
    pub fn kind(&self) -> MessageKind {
        match self {
            Envelope::Call(_) => MessageKind::Call,
            Envelope::CallResult(_) => MessageKind::CallResult,
            Envelope::CallError(_) => MessageKind::CallError,
        }
    }

    /// Correlation id shared by all kinds.
    pub fn id(&self) -> &str {
        match self {
            Envelope::Call(c) => &c.id,
            Envelope::CallResult(r) => &r.id,
            Envelope::CallError(e) => &e.id,
        }
    }

    /// Serialize to the wire array.
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        let out = match self {
            Envelope::Call(c) => {
                serde_json::to_vec(&(MessageKind::Call.code(), &c.id, &c.action, &c.payload))
            }
            Envelope::CallResult(r) => {
                serde_json::to_vec(&(MessageKind::CallResult.code(), &r.id, &r.payload))
            }
            Envelope::CallError(e) => serde_json::to_vec(&(
                MessageKind::CallError.code(),
                &e.id,
                &e.error_code,
                &e.error_description,
                &e.error_details,
            )),
        };
        out.map_err(|e| OcppError::Internal(format!("envelope encode failed: {e}")))
    }
}

impl From<Call> for Envelope {
    fn from(c: Call) -> Self {
        Envelope::Call(c)
    }
}

impl From<CallResult> for Envelope {
    fn from(r: CallResult) -> Self {
        Envelope::CallResult(r)
    }
}

impl From<CallError> for Envelope {
    fn from(e: CallError) -> Self {
        Envelope::CallError(e)
    }
}

/// Decode a raw frame into an envelope.
pub fn parse(raw: &[u8]) -> Result<Envelope> {
    let elems: Vec<Box<RawValue>> =
        serde_json::from_slice(raw).map_err(|e| OcppError::Json(e.to_string()))?;

    if elems.len() < MIN_FRAME_ELEMENTS {
        return Err(OcppError::FrameTooShort(elems.len()));
    }

    let kind = elems
        .first()
        .ok_or(OcppError::FrameTooShort(0))
        .and_then(|e| kind_at(e))?;

    let actual = elems.len();
    if actual != kind.arity() {
        return Err(OcppError::Arity {
            kind,
            expected: kind.arity(),
            actual,
        });
    }

    let arity_err = |_| OcppError::Arity {
        kind,
        expected: kind.arity(),
        actual,
    };

    match kind {
        MessageKind::Call => {
            let [_, id, action, payload]: [Box<RawValue>; 4] =
                elems.try_into().map_err(arity_err)?;
            Ok(Envelope::Call(Call {
                id: id_at(&id)?,
                action: string_at(&action, 2, "action")?,
                payload,
            }))
        }
        MessageKind::CallResult => {
            let [_, id, payload]: [Box<RawValue>; 3] = elems.try_into().map_err(arity_err)?;
            Ok(Envelope::CallResult(CallResult {
                id: id_at(&id)?,
                payload,
            }))
        }
        MessageKind::CallError => {
            let [_, id, code, description, details]: [Box<RawValue>; 5] =
                elems.try_into().map_err(arity_err)?;
            Ok(Envelope::CallError(CallError {
                id: id_at(&id)?,
                error_code: string_at(&code, 2, "error code")?,
                error_description: string_at(&description, 3, "error description")?,
                error_details: details,
            }))
        }
    }
}

/// Element 0. Any integer literal outside 2..=4 is an unknown kind, including
/// ones that do not fit in an `i64`.
fn kind_at(raw: &RawValue) -> Result<MessageKind> {
    let text = raw.get().trim();
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(OcppError::ElementType {
            index: 0,
            name: "message kind",
            expected: "an integer",
        });
    }
    match text.parse::<i64>() {
        Ok(v) => MessageKind::try_from(v),
        Err(_) => Err(OcppError::UnsupportedMessageKind(text.to_string())),
    }
}

fn string_at(raw: &RawValue, index: usize, name: &'static str) -> Result<String> {
    serde_json::from_str(raw.get()).map_err(|_| OcppError::ElementType {
        index,
        name,
        expected: "a string",
    })
}

fn id_at(raw: &RawValue) -> Result<String> {
    non_empty_id(string_at(raw, 1, "message id")?)
}

fn non_empty_id(id: String) -> Result<String> {
    if id.is_empty() {
        return Err(OcppError::EmptyId);
    }
    Ok(id)
}

fn raw_json(v: &impl Serialize) -> Result<Box<RawValue>> {
    to_raw_value(v).map_err(|e| OcppError::Internal(format!("payload encode failed: {e}")))
}
