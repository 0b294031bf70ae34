//! Per-field constraint violations and their aggregation.
//!
//! Payload validators check every field and collect all failures instead of
//! stopping at the first one, so a single CALLERROR can list them all.

use std::fmt;

use serde_json::Value;

/// One broken constraint on a single value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Value longer than the type allows (lengths counted in chars).
    TooLong { max: usize, actual: usize },
    /// Char outside printable ASCII `[0x20, 0x7E]`.
    InvalidChar { ch: char, position: usize },
    /// Required value absent or empty.
    Required,
    /// JSON value of the wrong type, e.g. a number where text belongs.
    WrongType {
        expected: &'static str,
        actual: &'static str,
    },
    /// Any other constraint, described in words.
    Invalid(String),
}

impl Violation {
    /// Short machine-friendly tag, used in CALLERROR details.
    pub fn kind(&self) -> &'static str {
        match self {
            Violation::TooLong { .. } => "length",
            Violation::InvalidChar { .. } => "charset",
            Violation::Required => "required",
            Violation::WrongType { .. } => "type",
            Violation::Invalid(_) => "invalid",
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::TooLong { max, actual } => {
                write!(f, "length {actual} exceeds maximum of {max}")
            }
            Violation::InvalidChar { ch, position } => write!(
                f,
                "character U+{:04X} at position {position} is not printable ASCII",
                *ch as u32
            ),
            Violation::Required => f.write_str("value is required"),
            Violation::WrongType { expected, actual } => {
                write!(f, "expected {expected}, got {actual}")
            }
            Violation::Invalid(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for Violation {}

/// A violation attributed to a named payload field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub violation: Violation,
}

impl FieldError {
    pub fn new(field: impl Into<String>, violation: Violation) -> Self {
        Self {
            field: field.into(),
            violation,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.violation)
    }
}

/// All field violations of one payload, joined into a single error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, violation: Violation) {
        self.errors.push(FieldError::new(field, violation));
    }

    /// Record the violation (if any) and hand back the value on success.
    pub fn require<T>(&mut self, field: &str, res: Result<T, Violation>) -> Option<T> {
        match res {
            Ok(v) => Some(v),
            Err(violation) => {
                self.push(field, violation);
                None
            }
        }
    }

    /// Same as [`FieldErrors::require`] for absent-allowed fields. `None`
    /// means absent or invalid; an invalid value is recorded.
    pub fn optional<T>(&mut self, field: &str, res: Option<Result<T, Violation>>) -> Option<T> {
        res.and_then(|r| self.require(field, r))
    }

    /// Required text field read from loosely typed wire JSON. Absent or
    /// `null` records [`Violation::Required`], anything but a string records
    /// [`Violation::WrongType`], and a string goes through `check`.
    pub fn require_text<T>(
        &mut self,
        field: &str,
        value: Option<Value>,
        check: impl FnOnce(String) -> Result<T, Violation>,
    ) -> Option<T> {
        let res = match value {
            None | Some(Value::Null) => Err(Violation::Required),
            Some(v) => text(v).and_then(check),
        };
        self.require(field, res)
    }

    /// [`FieldErrors::require_text`] for absent-allowed fields; `null`
    /// counts as absent.
    pub fn optional_text<T>(
        &mut self,
        field: &str,
        value: Option<Value>,
        check: impl FnOnce(String) -> Result<T, Violation>,
    ) -> Option<T> {
        match value {
            None | Some(Value::Null) => None,
            Some(v) => self.require(field, text(v).and_then(check)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

fn text(value: Value) -> Result<String, Violation> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(Violation::WrongType {
            expected: "a string",
            actual: json_type(&other),
        }),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

impl From<FieldError> for FieldErrors {
    fn from(e: FieldError) -> Self {
        Self { errors: vec![e] }
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
