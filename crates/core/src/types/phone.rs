//! Phone number type.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Pakistani mobile numbers: optional +92/0092/0 country prefix, then a
/// 3xx network code, an optional dash, and the 7-digit subscriber number.
static PK_MOBILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\+92|0092|0)?3\d{2}-?\d{7}$").expect("valid phone pattern"));

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input is not a recognizable Pakistani mobile number.
    #[error("phone number must be a valid Pakistani mobile number (e.g. 0300-1234567)")]
    InvalidFormat,
}

/// A Pakistani mobile phone number.
///
/// Stored as entered (surrounding whitespace trimmed); validation is
/// shape-only.
///
/// ## Examples
///
/// ```
/// use rivaaj_core::Phone;
///
/// assert!(Phone::parse("0300-1234567").is_ok());
/// assert!(Phone::parse("+923001234567").is_ok());
/// assert!(Phone::parse("12345").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Parse a `Phone` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`PhoneError::Empty`] for blank input and
    /// [`PhoneError::InvalidFormat`] when the shape does not match a
    /// Pakistani mobile number.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PhoneError::Empty);
        }
        if !PK_MOBILE.is_match(trimmed) {
            return Err(PhoneError::InvalidFormat);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Phone` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
