//! Error types for storefront operations.

use rivaaj_core::GatewayError;

use crate::auth::AuthError;
use crate::checkout::ValidationError;

/// Convenience alias for storefront operation results.
pub type Result<T> = std::result::Result<T, StorefrontError>;

/// Top-level error for session operations.
///
/// Messages are written to be shown to the customer as-is; the embedding
/// UI decides where (inline, toast, redirect to sign-in).
#[derive(Debug, thiserror::Error)]
pub enum StorefrontError {
    /// Nobody is signed in. The triggering action is dropped, never
    /// queued for replay after sign-in.
    #[error("sign in to continue")]
    AuthenticationRequired,

    /// Local input validation failed before anything left the device.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The catalog/order gateway failed or is not configured.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The identity service rejected or failed an operation.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl StorefrontError {
    /// `true` for errors the UI should answer with the sign-in prompt.
    #[must_use]
    pub const fn requires_sign_in(&self) -> bool {
        matches!(self, Self::AuthenticationRequired)
    }
}

// ============================================================================
// Tests
// ============================================================================
