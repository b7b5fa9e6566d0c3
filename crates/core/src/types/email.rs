//! Email address type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Why a string failed to parse as an [`Email`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum EmailError {
    /// Nothing was entered.
    #[error("email address cannot be empty")]
    Empty,
    /// Longer than the RFC 5321 limit.
    #[error("email address is too long (max {max} characters)")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// No local part, no @ separator, or no domain.
    #[error("enter a valid email address, like name@example.com")]
    Malformed,
}

/// A customer's email address.
///
/// Validation is structural only: something before an @, something after
/// it, within the RFC 5321 length limit. Deliverability is the identity
/// service's concern, confirmed when the customer redeems a code sent to
/// the address.
///
/// ## Examples
///
/// ```
/// use rivaaj_core::Email;
///
/// assert!(Email::parse("customer@example.com").is_ok());
/// assert!(Email::parse("no-at-symbol").is_err());
/// assert!(Email::parse("@example.com").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse an `Email`, trimming surrounding whitespace first.
    ///
    /// # Errors
    ///
    /// Returns an error when the trimmed input is empty, longer than
    /// [`Self::MAX_LENGTH`], or not of the form `local@domain`.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(EmailError::Empty);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        match s.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
                Ok(Self(s.to_owned()))
            }
            _ => Err(EmailError::Malformed),
        }
    }

    /// The address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Email` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_ordinary_addresses() {
        assert!(Email::parse("ayesha@example.com").is_ok());
        assert!(Email::parse("ayesha.khan+orders@mail.example.pk").is_ok());
        assert!(Email::parse("a@b").is_ok());
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let email = Email::parse("  ayesha@example.com ").unwrap();
        assert_eq!(email.as_str(), "ayesha@example.com");
    }

    #[test]
    fn test_parse_rejects_blank_input() {
        assert!(matches!(Email::parse(""), Err(EmailError::Empty)));
        assert!(matches!(Email::parse("   "), Err(EmailError::Empty)));
    }

    #[test]
    fn test_parse_rejects_overlong_input() {
        let long = format!("{}@example.com", "a".repeat(Email::MAX_LENGTH));
        assert!(matches!(Email::parse(&long), Err(EmailError::TooLong { .. })));
    }

    #[test]
    fn test_parse_rejects_malformed_shapes() {
        for input in ["no-at-symbol", "@example.com", "ayesha@"] {
            assert!(matches!(Email::parse(input), Err(EmailError::Malformed)), "{input}");
        }
    }

    #[test]
    fn test_display_and_from_str_round_trip() {
        let email: Email = "ayesha@example.com".parse().unwrap();
        assert_eq!(email.to_string(), "ayesha@example.com");
    }

    #[test]
    fn test_serializes_as_a_bare_string() {
        let email = Email::parse("ayesha@example.com").unwrap();
        let json = serde_json::to_string(&email).unwrap();
        assert_eq!(json, "\"ayesha@example.com\"");

        let back: Email = serde_json::from_str(&json).unwrap();
        assert_eq!(back, email);
    }
}
