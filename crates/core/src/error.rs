//! Shared gateway error taxonomy.
//!
//! Both gateway clients (storefront catalog/order and admin) speak to the
//! same hosted backend, so they share one error type. Nothing here is
//! fatal: every variant is meant to be caught at the operation boundary
//! and rendered as user-visible state.

use thiserror::Error;

/// Errors from the remote catalog/order gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Backend configuration missing, endpoint unreachable, or request
    /// timed out. Surfaced as a visible per-screen error state; callers
    /// do not retry automatically.
    #[error("backend unavailable: {reason}")]
    Unavailable {
        /// What made the backend unreachable.
        reason: String,
    },

    /// The backend rejected an insert, update, or delete. The message is
    /// the backend's own text, surfaced verbatim to the user.
    #[error("{message}")]
    RemoteWrite {
        /// Backend-provided rejection text.
        message: String,
    },

    /// The requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The backend answered with a body this client cannot decode.
    #[error("malformed backend response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl GatewayError {
    /// Build an [`GatewayError::Unavailable`] from any reason text.
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// The unavailable state for a client constructed without backend
    /// configuration.
    #[must_use]
    pub fn not_configured() -> Self {
        Self::unavailable("backend endpoint and key are not configured")
    }

    /// Build a [`GatewayError::RemoteWrite`] carrying the backend's text.
    #[must_use]
    pub fn remote_write(message: impl Into<String>) -> Self {
        Self::RemoteWrite {
            message: message.into(),
        }
    }

    /// Whether this error is the unavailable state (as opposed to a
    /// rejection from a reachable backend).
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}
