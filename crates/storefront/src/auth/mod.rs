//! Customer identity and the delegated identity-service boundary.
//!
//! The storefront never stores or checks credentials itself. Everything
//! credential-shaped goes through an [`IdentityGateway`]: the hosted
//! service hashes passwords, issues session tokens, and delivers password
//! reset codes out-of-band (email). This crate only holds who is signed
//! in right now, and runs cheap local validation so obviously broken
//! input never leaves the device.

mod client;
mod error;

pub use client::IdentityClient;
pub use error::AuthError;

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use rivaaj_core::{Email, Phone, UserId};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// The signed-in customer as the UI sees them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: Email,
    pub full_name: String,
}

/// A signed-in customer plus the token that proves it.
///
/// `SecretString` keeps the token out of `Debug` output.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: CurrentUser,
    pub access_token: SecretString,
}

/// Registration form contents, validated before the remote call.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

impl NewCustomer {
    /// Run the local checks a gateway implementation applies before
    /// talking to the identity service.
    ///
    /// # Errors
    ///
    /// Returns the first failing check: email shape, Pakistani mobile
    /// number shape, then password length.
    pub fn validate(&self) -> Result<(Email, Phone), AuthError> {
        let email = Email::parse(&self.email)?;
        let phone = Phone::parse(&self.phone)?;
        validate_password(&self.password)?;
        Ok((email, phone))
    }
}

pub(crate) fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

/// The identity service seam.
///
/// [`IdentityClient`] implements this against the hosted service; tests
/// substitute fakes. Credential storage, token issuance and reset-code
/// delivery all live on the other side of this trait. Reset codes in
/// particular travel out-of-band to the customer's inbox; no method here
/// ever returns one.
#[async_trait]
pub trait IdentityGateway {
    /// Exchange an email/password pair for a signed-in identity.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidCredentials`] for a wrong pair,
    /// [`AuthError::Unavailable`] when the service cannot be reached.
    async fn login(&self, email: &str, password: &str) -> Result<AuthenticatedUser, AuthError>;

    /// Create an account and sign it in.
    ///
    /// # Errors
    ///
    /// A validation variant when the profile fails local checks,
    /// [`AuthError::EmailTaken`] when the address already has an account.
    async fn register(&self, customer: &NewCustomer) -> Result<AuthenticatedUser, AuthError>;

    /// Revoke a session token.
    ///
    /// # Errors
    ///
    /// Returns an error when the service refuses or cannot be reached;
    /// callers may still drop their local identity.
    async fn logout(&self, access_token: &SecretString) -> Result<(), AuthError>;

    /// Ask the service to send a reset code to `email`.
    ///
    /// Succeeds without revealing whether the address has an account.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidEmail`] for a malformed address,
    /// [`AuthError::Unavailable`] when the service cannot be reached.
    async fn request_password_reset(&self, email: &str) -> Result<(), AuthError>;

    /// Redeem a reset code from the customer's inbox for a new password.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidResetCode`] for a wrong or expired code,
    /// [`AuthError::WeakPassword`] when the replacement is too short.
    async fn confirm_password_reset(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), AuthError>;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn customer() -> NewCustomer {
        NewCustomer {
            full_name: "Ayesha Khan".to_owned(),
            email: "ayesha@example.com".to_owned(),
            phone: "0300-1234567".to_owned(),
            password: "kurta-season".to_owned(),
        }
    }

    #[test]
    fn test_valid_customer_passes() {
        let (email, phone) = customer().validate().unwrap();
        assert_eq!(email.as_str(), "ayesha@example.com");
        assert_eq!(phone.as_str(), "0300-1234567");
    }

    #[test]
    fn test_bad_email_is_rejected_first() {
        let mut bad = customer();
        bad.email = "not-an-email".to_owned();
        assert!(matches!(bad.validate(), Err(AuthError::InvalidEmail(_))));
    }

    #[test]
    fn test_bad_phone_is_rejected() {
        let mut bad = customer();
        bad.phone = "042-1234567".to_owned();
        assert!(matches!(bad.validate(), Err(AuthError::InvalidPhone(_))));
    }

    #[test]
    fn test_short_password_is_rejected() {
        let mut bad = customer();
        bad.password = "12345".to_owned();
        assert!(matches!(
            bad.validate(),
            Err(AuthError::WeakPassword { min: MIN_PASSWORD_LENGTH })
        ));
    }

    #[test]
    fn test_minimum_length_password_passes() {
        let mut ok = customer();
        ok.password = "123456".to_owned();
        assert!(ok.validate().is_ok());
    }
}
