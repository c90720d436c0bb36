//! Validated tenant (clinic) identifier.
//!
//! A clinic id is 1 to 64 ASCII characters drawn from `[A-Za-z0-9_-]` and
//! must start with a letter or digit. The same shape applies to the clinic id
//! carried in a token and to the target of an administrative override.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const MAX_LEN: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClinicIdError {
    Empty,
    TooLong,
    InvalidStart,
    InvalidCharacter,
}

impl std::error::Error for ClinicIdError {}

// Display never echoes the rejected value.
impl fmt::Display for ClinicIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("clinic id cannot be empty"),
            Self::TooLong => write!(f, "clinic id cannot exceed {} characters", MAX_LEN),
            Self::InvalidStart => f.write_str("clinic id must start with a letter or digit"),
            Self::InvalidCharacter => {
                f.write_str("clinic id may only contain letters, digits, '-' and '_'")
            }
        }
    }
}

#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClinicId(String);

impl ClinicId {
    pub fn new(value: impl Into<String>) -> Result<Self, ClinicIdError> {
        let value = value.into();
        Self::validate(&value)?;
        Ok(Self(value))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }

    fn validate(value: &str) -> Result<(), ClinicIdError> {
        let first = value.chars().next().ok_or(ClinicIdError::Empty)?;

        if value.len() > MAX_LEN {
            return Err(ClinicIdError::TooLong);
        }
        if !first.is_ascii_alphanumeric() {
            return Err(ClinicIdError::InvalidStart);
        }
        if !value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ClinicIdError::InvalidCharacter);
        }

        Ok(())
    }
}

impl fmt::Debug for ClinicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClinicId({})", self.0)
    }
}

impl fmt::Display for ClinicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ClinicId {
    type Err = ClinicIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ClinicId {
    type Error = ClinicIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ClinicId> for String {
    fn from(id: ClinicId) -> Self {
        id.0
    }
}

impl AsRef<str> for ClinicId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ClinicId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ClinicId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
