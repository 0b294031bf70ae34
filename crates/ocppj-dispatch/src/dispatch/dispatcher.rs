use std::sync::Arc;

use serde_json::value::RawValue;
use thiserror::Error;

use ocppj_core::error::{OcppError, Result};
use ocppj_core::protocol::{self, CallError, CallResult, Envelope};

use super::hooks::{run_hook, run_validator, Outcome};
use super::registry::Registry;
use super::validator::Decoded;

/// Successful dispatch of one frame.
#[derive(Debug)]
pub enum Dispatched {
    /// CALL whose payload passed its action's validator.
    Call {
        id: String,
        action: String,
        payload: Decoded,
    },
    /// Responses are passed through; correlating them to a pending CALL
    /// happens outside the dispatcher.
    CallResult(CallResult),
    CallError(CallError),
}

impl Dispatched {
    pub fn id(&self) -> &str {
        match self {
            Dispatched::Call { id, .. } => id,
            Dispatched::CallResult(r) => &r.id,
            Dispatched::CallError(e) => &e.id,
        }
    }
}

/// Failed dispatch of one frame.
///
/// `id` is set once the envelope parsed, which is exactly when a CALLERROR
/// reply can be addressed.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct Rejection {
    pub id: Option<String>,
    pub action: Option<String>,
    /// `None` when the frame never reached validation.
    pub outcome: Option<Outcome>,
    #[source]
    pub error: OcppError,
}

impl Rejection {
    fn unparsed(error: OcppError) -> Self {
        Self {
            id: None,
            action: None,
            outcome: None,
            error,
        }
    }

    /// CALLERROR reply for this rejection, if it can be addressed.
    pub fn call_error(&self) -> Result<Option<CallError>> {
        match &self.id {
            Some(id) => CallError::from_error(id.as_str(), &self.error).map(Some),
            None => Ok(None),
        }
    }
}

/// Parses frames and routes CALL payloads through the registry.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
    max_frame_bytes: Option<usize>,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            max_frame_bytes: None,
        }
    }

    /// Reject frames longer than `max` bytes before decoding them.
    pub fn with_max_frame_bytes(mut self, max: usize) -> Self {
        self.max_frame_bytes = Some(max);
        self
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Parse one frame and, for CALLs, validate its payload.
    pub fn dispatch(&self, frame: &[u8]) -> std::result::Result<Dispatched, Rejection> {
        if let Some(max) = self.max_frame_bytes {
            if frame.len() > max {
                return Err(Rejection::unparsed(OcppError::FrameTooLarge {
                    len: frame.len(),
                    max,
                }));
            }
        }

        match protocol::parse(frame).map_err(Rejection::unparsed)? {
            Envelope::Call(call) => match self.validate(&call.action, &call.payload) {
                Ok(payload) => Ok(Dispatched::Call {
                    id: call.id,
                    action: call.action,
                    payload,
                }),
                Err(error) => Err(Rejection {
                    outcome: Some(Outcome::of(Err(&error))),
                    id: Some(call.id),
                    action: Some(call.action),
                    error,
                }),
            },
            Envelope::CallResult(r) => Ok(Dispatched::CallResult(r)),
            Envelope::CallError(e) => Ok(Dispatched::CallError(e)),
        }
    }

    /// Hook-wrapped validation of one payload: pre hook, validator, post hook.
    ///
    /// Entry point for envelope sources other than OCPP-J frames. A missing
    /// validator yields [`OcppError::UnregisteredAction`]; panics in hooks or
    /// the validator come back as errors. The post hook observes every
    /// outcome, but a post hook panic replaces the result.
    pub fn validate(&self, action: &str, payload: &RawValue) -> Result<Decoded> {
        let route = self.registry.route(action);

        let pre = match &route.pre {
            Some(pre) => run_hook("pre", action, || pre(action, payload)),
            None => Ok(()),
        };

        let result = match (pre, &route.validator) {
            (Err(e), _) => Err(e),
            (Ok(()), Some(v)) => run_validator(action, || v.validate(payload)),
            (Ok(()), None) => Err(OcppError::UnregisteredAction(action.to_string())),
        };

        if let Some(post) = &route.post {
            run_hook("post", action, || post(action, result.as_ref()))?;
        }
        result
    }
}
