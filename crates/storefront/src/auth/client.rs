//! Identity client for the hosted auth service.
//!
//! Speaks the backend's `/auth/v1` endpoints: password grant for login,
//! signup, token revocation, and the two-step recovery flow (send code,
//! redeem code). The service owns credential hashing and emails the
//! recovery code itself; this client never sees stored credentials and
//! never returns a reset code to the caller.

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::instrument;
use url::Url;
use uuid::Uuid;

use rivaaj_core::{Email, UserId};

use super::{
    validate_password, AuthError, AuthenticatedUser, CurrentUser, IdentityGateway, NewCustomer,
};
use crate::backend::{endpoint_url, snippet, REQUEST_TIMEOUT};
use crate::config::BackendConfig;

/// Client for the hosted identity service.
///
/// Unconfigured (no backend endpoint/key), every call reports
/// [`AuthError::Unavailable`] without touching the network.
#[derive(Debug, Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    endpoint: Option<AuthEndpoint>,
}

#[derive(Clone)]
struct AuthEndpoint {
    base: Url,
    api_key: SecretString,
}

impl std::fmt::Debug for AuthEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthEndpoint")
            .field("base", &self.base.as_str())
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl IdentityClient {
    #[must_use]
    pub fn from_config(backend: Option<&BackendConfig>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: backend.map(|cfg| AuthEndpoint {
                base: cfg.base_url.clone(),
                api_key: cfg.api_key.clone(),
            }),
        }
    }

    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }

    fn endpoint(&self) -> Result<&AuthEndpoint, AuthError> {
        self.endpoint
            .as_ref()
            .ok_or_else(|| AuthError::unavailable("identity service not configured"))
    }

    /// POST a JSON body to an auth endpoint and hand back status + body.
    async fn post_auth(
        &self,
        endpoint: &AuthEndpoint,
        path: &str,
        query: &[(&str, &str)],
        body: &serde_json::Value,
        bearer: Option<&SecretString>,
    ) -> Result<(StatusCode, String), AuthError> {
        let url = endpoint_url(&endpoint.base, path);
        let mut request = self
            .http
            .post(&url)
            .timeout(REQUEST_TIMEOUT)
            .query(query)
            .header("apikey", endpoint.api_key.expose_secret())
            .json(body);
        if let Some(token) = bearer {
            request = request.bearer_auth(token.expose_secret());
        }
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;
        Ok((status, text))
    }
}

#[async_trait]
impl IdentityGateway for IdentityClient {
    #[instrument(skip(self, password))]
    async fn login(&self, email: &str, password: &str) -> Result<AuthenticatedUser, AuthError> {
        let endpoint = self.endpoint()?;
        let body = serde_json::json!({ "email": email, "password": password });
        let (status, text) = self
            .post_auth(endpoint, "auth/v1/token", &[("grant_type", "password")], &body, None)
            .await?;

        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            return Err(AuthError::InvalidCredentials);
        }
        if !status.is_success() {
            return Err(rejection(status, &text));
        }
        let session: SessionResponse = decode(&text)?;
        session.into_authenticated()
    }

    #[instrument(skip(self, customer))]
    async fn register(&self, customer: &NewCustomer) -> Result<AuthenticatedUser, AuthError> {
        let (email, phone) = customer.validate()?;
        let endpoint = self.endpoint()?;
        let body = serde_json::json!({
            "email": email.as_str(),
            "password": customer.password,
            "data": {
                "fullName": customer.full_name,
                "phone": phone.as_str(),
            },
        });
        let (status, text) = self
            .post_auth(endpoint, "auth/v1/signup", &[], &body, None)
            .await?;

        if status == StatusCode::CONFLICT || status == StatusCode::UNPROCESSABLE_ENTITY {
            return Err(AuthError::EmailTaken);
        }
        if !status.is_success() {
            let message = rejection_message(&text);
            if message.to_lowercase().contains("already registered") {
                return Err(AuthError::EmailTaken);
            }
            return Err(rejection(status, &text));
        }
        let session: SessionResponse = decode(&text)?;
        session.into_authenticated()
    }

    #[instrument(skip_all)]
    async fn logout(&self, access_token: &SecretString) -> Result<(), AuthError> {
        let endpoint = self.endpoint()?;
        let (status, text) = self
            .post_auth(
                endpoint,
                "auth/v1/logout",
                &[],
                &serde_json::json!({}),
                Some(access_token),
            )
            .await?;
        // An already-dead token is revoked enough.
        if status.is_success() || status == StatusCode::UNAUTHORIZED {
            return Ok(());
        }
        Err(rejection(status, &text))
    }

    #[instrument(skip(self))]
    async fn request_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let email = Email::parse(email)?;
        let endpoint = self.endpoint()?;
        let body = serde_json::json!({ "email": email.as_str() });
        let (status, text) = self
            .post_auth(endpoint, "auth/v1/recover", &[], &body, None)
            .await?;
        if status.is_success() {
            return Ok(());
        }
        Err(rejection(status, &text))
    }

    #[instrument(skip(self, code, new_password))]
    async fn confirm_password_reset(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let email = Email::parse(email)?;
        validate_password(new_password)?;
        let endpoint = self.endpoint()?;

        // Redeem the emailed code for a short-lived recovery session.
        let body = serde_json::json!({
            "type": "recovery",
            "email": email.as_str(),
            "token": code,
        });
        let (status, text) = self
            .post_auth(endpoint, "auth/v1/verify", &[], &body, None)
            .await?;
        if matches!(
            status,
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            return Err(AuthError::InvalidResetCode);
        }
        if !status.is_success() {
            return Err(rejection(status, &text));
        }
        let session: SessionResponse = decode(&text)?;

        // Set the new password under that session.
        let url = endpoint_url(&endpoint.base, "auth/v1/user");
        let response = self
            .http
            .put(&url)
            .timeout(REQUEST_TIMEOUT)
            .header("apikey", endpoint.api_key.expose_secret())
            .bearer_auth(&session.access_token)
            .json(&serde_json::json!({ "password": new_password }))
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let text = response.text().await.map_err(transport_error)?;
        Err(rejection(status, &text))
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct SessionResponse {
    access_token: String,
    user: RemoteUser,
}

#[derive(Debug, Deserialize)]
struct RemoteUser {
    id: Uuid,
    email: String,
    #[serde(default)]
    user_metadata: UserMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct UserMetadata {
    #[serde(default, rename = "fullName")]
    full_name: Option<String>,
}

impl SessionResponse {
    fn into_authenticated(self) -> Result<AuthenticatedUser, AuthError> {
        let email = Email::parse(&self.user.email)?;
        Ok(AuthenticatedUser {
            user: CurrentUser {
                id: UserId::new(self.user.id),
                email,
                full_name: self.user.user_metadata.full_name.unwrap_or_default(),
            },
            access_token: SecretString::from(self.access_token),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
}

// ============================================================================
// Helpers
// ============================================================================

fn transport_error(err: reqwest::Error) -> AuthError {
    if err.is_timeout() {
        AuthError::unavailable("request timed out")
    } else {
        AuthError::unavailable(err.to_string())
    }
}

fn decode<T: serde::de::DeserializeOwned>(text: &str) -> Result<T, AuthError> {
    serde_json::from_str(text).map_err(|err| {
        tracing::error!(error = %err, body = %snippet(text), "malformed identity service response");
        AuthError::unavailable("malformed identity service response")
    })
}

fn rejection_message(text: &str) -> String {
    serde_json::from_str::<ErrorBody>(text)
        .ok()
        .and_then(|body| body.error_description.or(body.msg))
        .unwrap_or_else(|| snippet(text))
}

fn rejection(status: StatusCode, text: &str) -> AuthError {
    if status.is_server_error() {
        return AuthError::unavailable(format!("identity service answered {status}"));
    }
    AuthError::rejected(rejection_message(text))
}

// ============================================================================
// Tests
// ============================================================================
