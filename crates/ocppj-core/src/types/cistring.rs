//! Case-insensitive bounded strings (`CiStringNType` in OCPP).
//!
//! Construction is the only way in and always validates:
//! - at most `N` chars;
//! - every char in printable ASCII `[0x20, 0x7E]`.
//!
//! Length is checked before charset, so an over-long value reports the
//! length violation even if it also carries bad chars.

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use super::fields::Violation;

/// Bounded printable-ASCII string of at most `N` chars.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CiString<const N: usize>(String);

pub type CiString20 = CiString<20>;
pub type CiString25 = CiString<25>;
pub type CiString50 = CiString<50>;
pub type CiString255 = CiString<255>;
pub type CiString500 = CiString<500>;

impl<const N: usize> CiString<N> {
    pub const MAX_LEN: usize = N;

    /// Validate and wrap `raw`.
    pub fn new(raw: impl Into<String>) -> Result<Self, Violation> {
        let raw = raw.into();
        check::<N>(&raw)?;
        Ok(Self(raw))
    }

    pub fn max_len(&self) -> usize {
        N
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// OCPP compares these case-insensitively.
    pub fn eq_ignore_case(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

fn check<const N: usize>(raw: &str) -> Result<(), Violation> {
    let actual = raw.chars().count();
    if actual > N {
        return Err(Violation::TooLong { max: N, actual });
    }
    if let Some((position, ch)) = raw
        .chars()
        .enumerate()
        .find(|(_, c)| !matches!(c, '\u{20}'..='\u{7E}'))
    {
        return Err(Violation::InvalidChar { ch, position });
    }
    Ok(())
}

impl<const N: usize> fmt::Display for CiString<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<const N: usize> Deref for CiString<N> {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl<const N: usize> AsRef<str> for CiString<N> {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<const N: usize> FromStr for CiString<N> {
    type Err = Violation;

    fn from_str(s: &str) -> Result<Self, Violation> {
        Self::new(s)
    }
}

impl<const N: usize> TryFrom<String> for CiString<N> {
    type Error = Violation;

    fn try_from(s: String) -> Result<Self, Violation> {
        Self::new(s)
    }
}

impl<const N: usize> TryFrom<&str> for CiString<N> {
    type Error = Violation;

    fn try_from(s: &str) -> Result<Self, Violation> {
        Self::new(s)
    }
}

impl<const N: usize> From<CiString<N>> for String {
    fn from(s: CiString<N>) -> String {
        s.0
    }
}

impl<const N: usize> Serialize for CiString<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de, const N: usize> Deserialize<'de> for CiString<N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(de::Error::custom)
    }
}
