//! Identity service error types.

use rivaaj_core::{EmailError, PhoneError};

/// Errors raised by identity operations.
///
/// Validation variants come from local checks that run before any remote
/// call; the rest map what the identity service answered.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Email address failed local validation.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Phone number failed local validation.
    #[error("invalid phone number: {0}")]
    InvalidPhone(#[from] PhoneError),

    /// Password shorter than the minimum length.
    #[error("password must be at least {min} characters")]
    WeakPassword { min: usize },

    /// Wrong email/password pair. Deliberately does not say which.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Registration attempted with an email that already has an account.
    #[error("an account with this email already exists")]
    EmailTaken,

    /// Password reset code was wrong or expired.
    #[error("reset code is invalid or has expired")]
    InvalidResetCode,

    /// The identity service could not be reached or answered garbage.
    #[error("identity service unavailable: {reason}")]
    Unavailable { reason: String },

    /// The identity service refused the request for another reason.
    #[error("identity service rejected the request: {message}")]
    Rejected { message: String },
}

impl AuthError {
    pub(crate) fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    pub(crate) fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
