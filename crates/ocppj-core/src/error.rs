//! Shared error type across ocppj crates.

use std::fmt;
use std::str::FromStr;

use serde_json::error::Category;
use thiserror::Error;

use crate::protocol::MessageKind;
use crate::types::{FieldErrors, Violation};

/// OCPP-J error codes carried in CALLERROR frames (stable wire API).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Requested action is not known by the receiver.
    NotImplemented,
    /// Requested action is recognized but not supported.
    NotSupported,
    /// Internal failure while processing the action.
    InternalError,
    /// Payload for the action is incomplete.
    ProtocolError,
    /// Security issue while processing the action.
    SecurityError,
    /// Payload is syntactically incorrect or does not follow the structure.
    FormationViolation,
    /// A field value is outside its allowed bounds.
    PropertyConstraintViolation,
    /// A field occurs too often or too rarely (e.g. missing required field).
    OccurrenceConstraintViolation,
    /// A field has the wrong data type.
    TypeConstraintViolation,
    /// Any other error.
    GenericError,
}

impl ErrorCode {
    /// String written on the wire. OCPP 1.6 spellings, including its
    /// historical `Occurence` typo.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::NotImplemented => "NotImplemented",
            ErrorCode::NotSupported => "NotSupported",
            ErrorCode::InternalError => "InternalError",
            ErrorCode::ProtocolError => "ProtocolError",
            ErrorCode::SecurityError => "SecurityError",
            ErrorCode::FormationViolation => "FormationViolation",
            ErrorCode::PropertyConstraintViolation => "PropertyConstraintViolation",
            ErrorCode::OccurrenceConstraintViolation => "OccurenceConstraintViolation",
            ErrorCode::TypeConstraintViolation => "TypeConstraintViolation",
            ErrorCode::GenericError => "GenericError",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorCode {
    type Err = OcppError;

    /// Accepts both the 1.6 and the 2.0.1 spellings.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "NotImplemented" => Ok(ErrorCode::NotImplemented),
            "NotSupported" => Ok(ErrorCode::NotSupported),
            "InternalError" => Ok(ErrorCode::InternalError),
            "ProtocolError" => Ok(ErrorCode::ProtocolError),
            "SecurityError" => Ok(ErrorCode::SecurityError),
            "FormationViolation" | "FormatViolation" => Ok(ErrorCode::FormationViolation),
            "PropertyConstraintViolation" => Ok(ErrorCode::PropertyConstraintViolation),
            "OccurenceConstraintViolation" | "OccurrenceConstraintViolation" => {
                Ok(ErrorCode::OccurrenceConstraintViolation)
            }
            "TypeConstraintViolation" => Ok(ErrorCode::TypeConstraintViolation),
            "GenericError" => Ok(ErrorCode::GenericError),
            other => Err(OcppError::UnknownErrorCode(other.to_string())),
        }
    }
}

/// Coarse error taxonomy used by callers to decide what to do with a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Invalid JSON, wrong arity, wrong element type. Fatal to the frame.
    Format,
    /// No validator registered for the action.
    Routing,
    /// Payload decoded but violates field constraints.
    Validation,
    /// Registry misuse, configuration, panicking hook or validator.
    Internal,
}

impl ErrorCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCategory::Format => "format",
            ErrorCategory::Routing => "routing",
            ErrorCategory::Validation => "validation",
            ErrorCategory::Internal => "internal",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, OcppError>;

/// Unified error type used by core and dispatch.
#[derive(Debug, Error)]
pub enum OcppError {
    #[error("invalid frame json: {0}")]
    Json(String),
    #[error("frame too large: {len} bytes (max {max})")]
    FrameTooLarge { len: usize, max: usize },
    #[error("frame too short: {0} elements (at least 3 required)")]
    FrameTooShort(usize),
    #[error("{kind} frame must have exactly {expected} elements, got {actual}")]
    Arity {
        kind: MessageKind,
        expected: usize,
        actual: usize,
    },
    #[error("unsupported message kind: {0}")]
    UnsupportedMessageKind(String),
    #[error("element {index} ({name}) must be {expected}")]
    ElementType {
        index: usize,
        name: &'static str,
        expected: &'static str,
    },
    #[error("message id must not be empty")]
    EmptyId,
    #[error("unregistered action: {0}")]
    UnregisteredAction(String),
    #[error("malformed payload: {0}")]
    PayloadSyntax(String),
    #[error("payload missing required field: {0}")]
    PayloadMissingField(String),
    #[error("payload field has wrong type: {0}")]
    PayloadType(String),
    #[error("validation failed: {0}")]
    Validation(FieldErrors),
    #[error("action already registered: {0}")]
    DuplicateAction(String),
    #[error("registry is frozen")]
    RegistryFrozen,
    #[error("{hook} hook panicked for action {action}: {message}")]
    HookPanicked {
        hook: &'static str,
        action: String,
        message: String,
    },
    #[error("validator panicked for action {action}: {message}")]
    ValidatorPanicked { action: String, message: String },
    #[error("unknown error code: {0}")]
    UnknownErrorCode(String),
    #[error("config: {0}")]
    Config(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl OcppError {
    /// Classify a payload decode failure reported by serde_json.
    pub fn payload(e: serde_json::Error) -> Self {
        match e.classify() {
            Category::Data => {
                let msg = e.to_string();
                if msg.starts_with("missing field") {
                    OcppError::PayloadMissingField(msg)
                } else {
                    OcppError::PayloadType(msg)
                }
            }
            Category::Syntax | Category::Eof | Category::Io => {
                OcppError::PayloadSyntax(e.to_string())
            }
        }
    }

    /// Map the error to the OCPP code used in a CALLERROR reply.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            OcppError::Json(_)
            | OcppError::FrameTooLarge { .. }
            | OcppError::FrameTooShort(_)
            | OcppError::Arity { .. }
            | OcppError::ElementType { .. }
            | OcppError::EmptyId
            | OcppError::PayloadSyntax(_) => ErrorCode::FormationViolation,
            OcppError::UnsupportedMessageKind(_) => ErrorCode::ProtocolError,
            OcppError::UnregisteredAction(_) => ErrorCode::NotImplemented,
            OcppError::PayloadMissingField(_) => ErrorCode::OccurrenceConstraintViolation,
            OcppError::PayloadType(_) => ErrorCode::TypeConstraintViolation,
            OcppError::Validation(fields) => validation_code(fields),
            OcppError::UnknownErrorCode(_) => ErrorCode::GenericError,
            OcppError::DuplicateAction(_)
            | OcppError::RegistryFrozen
            | OcppError::HookPanicked { .. }
            | OcppError::ValidatorPanicked { .. }
            | OcppError::Config(_)
            | OcppError::Internal(_) => ErrorCode::InternalError,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            OcppError::Json(_)
            | OcppError::FrameTooLarge { .. }
            | OcppError::FrameTooShort(_)
            | OcppError::Arity { .. }
            | OcppError::UnsupportedMessageKind(_)
            | OcppError::ElementType { .. }
            | OcppError::EmptyId => ErrorCategory::Format,
            OcppError::UnregisteredAction(_) => ErrorCategory::Routing,
            OcppError::PayloadSyntax(_)
            | OcppError::PayloadMissingField(_)
            | OcppError::PayloadType(_)
            | OcppError::Validation(_) => ErrorCategory::Validation,
            OcppError::DuplicateAction(_)
            | OcppError::RegistryFrozen
            | OcppError::HookPanicked { .. }
            | OcppError::ValidatorPanicked { .. }
            | OcppError::UnknownErrorCode(_)
            | OcppError::Config(_)
            | OcppError::Internal(_) => ErrorCategory::Internal,
        }
    }

    /// True when the frame was not valid JSON at all (transport corruption),
    /// as opposed to valid JSON that breaks the envelope rules.
    pub fn is_json(&self) -> bool {
        matches!(self, OcppError::Json(_))
    }

    /// True for both the short-frame check and per-kind arity mismatches.
    pub fn is_arity(&self) -> bool {
        matches!(self, OcppError::FrameTooShort(_) | OcppError::Arity { .. })
    }
}

/// Most specific code for a set of field violations: a wrong type wins over
/// a missing value, which wins over a value out of bounds.
fn validation_code(fields: &FieldErrors) -> ErrorCode {
    let has = |pred: fn(&Violation) -> bool| fields.iter().any(|f| pred(&f.violation));
    if has(|v| matches!(v, Violation::WrongType { .. })) {
        ErrorCode::TypeConstraintViolation
    } else if has(|v| matches!(v, Violation::Required)) {
        ErrorCode::OccurrenceConstraintViolation
    } else {
        ErrorCode::PropertyConstraintViolation
    }
}
