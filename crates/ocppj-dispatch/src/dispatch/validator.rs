//! Per-action payload validator capability.

use std::any::{self, Any};
use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::value::RawValue;
use serde_json::Value;

use ocppj_core::error::{OcppError, Result};
use ocppj_core::types::FieldErrors;

/// Validated, decoded payload. The concrete type is owned by the validator
/// that produced it; callers downcast to the request type they expect.
pub struct Decoded {
    type_name: &'static str,
    value: Box<dyn Any + Send + Sync>,
}

impl Decoded {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            type_name: any::type_name::<T>(),
            value: Box::new(value),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Take the value out, or get `self` back when the type does not match.
    pub fn downcast<T: Any>(self) -> std::result::Result<T, Self> {
        let type_name = self.type_name;
        match self.value.downcast::<T>() {
            Ok(v) => Ok(*v),
            Err(value) => Err(Self { type_name, value }),
        }
    }
}

impl fmt::Debug for Decoded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Decoded").field(&self.type_name).finish()
    }
}

/// Validates the raw payload of one action and decodes it.
pub trait Validator: Send + Sync {
    fn validate(&self, payload: &RawValue) -> Result<Decoded>;
}

impl<F> Validator for F
where
    F: Fn(&RawValue) -> Result<Decoded> + Send + Sync,
{
    fn validate(&self, payload: &RawValue) -> Result<Decoded> {
        self(payload)
    }
}

/// A request payload described by its wire shape plus field checks.
///
/// `Wire` keeps field values as loose JSON (`Option<Value>`) so a missing or
/// mistyped field does not stop decoding; [`Request::from_wire`] checks every
/// field and reports all violations together.
pub trait Request: Sized + Send + Sync + 'static {
    /// Action name this payload belongs to.
    const ACTION: &'static str;

    type Wire: DeserializeOwned;

    fn from_wire(wire: Self::Wire) -> std::result::Result<Self, FieldErrors>;
}

/// [`Validator`] for any [`Request`] type.
pub struct RequestValidator<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T: Request> RequestValidator<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T: Request> Default for RequestValidator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Request> Validator for RequestValidator<T> {
    fn validate(&self, payload: &RawValue) -> Result<Decoded> {
        let value: Value = serde_json::from_str(payload.get()).map_err(OcppError::payload)?;
        if !value.is_object() {
            return Err(OcppError::PayloadType(format!(
                "payload must be a JSON object, got {}",
                payload.get()
            )));
        }
        let wire: T::Wire = serde_json::from_value(value).map_err(OcppError::payload)?;
        let req = T::from_wire(wire).map_err(OcppError::Validation)?;
        Ok(Decoded::new(req))
    }
}
