//! Admin configuration loaded from environment variables.
//!
//! Reads the same backend pair as the storefront:
//! - `RIVAAJ_BACKEND_URL` - Base URL of the hosted backend
//! - `RIVAAJ_BACKEND_KEY` - API key; must be authorized for admin writes
//!
//! Both absent runs the console in a degraded mode where every operation
//! reports the backend unavailable. Only one of the two set is a
//! misconfiguration and fails loudly.

use secrecy::SecretString;
use url::Url;

/// Environment variable holding the backend base URL.
pub const BACKEND_URL_VAR: &str = "RIVAAJ_BACKEND_URL";
/// Environment variable holding the backend API key.
pub const BACKEND_KEY_VAR: &str = "RIVAAJ_BACKEND_KEY";

const PLACEHOLDER_PATTERNS: &[&str] = &[
    "password", "secret", "changeme", "change-me", "change_me", "example",
    "test", "demo", "sample", "placeholder", "xxx", "todo", "fixme",
];

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// One of a pair of environment variables is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    /// An environment variable has an invalid value.
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    /// A secret matches a known placeholder pattern.
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Back-office configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Hosted backend connection, or `None` for the degraded mode.
    pub backend: Option<BackendConfig>,
}

/// Connection settings for the hosted backend.
#[derive(Clone)]
pub struct BackendConfig {
    pub base_url: Url,
    pub api_key: SecretString,
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl AdminConfig {
    /// Load configuration from environment variables, reading `.env`
    /// first when one exists.
    ///
    /// # Errors
    ///
    /// Returns an error for a half-configured backend pair, an
    /// unparseable URL, or a placeholder key.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup(BACKEND_URL_VAR);
        let key = lookup(BACKEND_KEY_VAR);
        if url.is_none() && key.is_none() {
            tracing::warn!(
                "{BACKEND_URL_VAR} and {BACKEND_KEY_VAR} not set; admin operations will report unavailable"
            );
            return Ok(Self { backend: None });
        }
        let url = url.ok_or_else(|| ConfigError::MissingEnvVar(BACKEND_URL_VAR.to_owned()))?;
        let key = key.ok_or_else(|| ConfigError::MissingEnvVar(BACKEND_KEY_VAR.to_owned()))?;

        let base_url = Url::parse(&url)
            .map_err(|e| ConfigError::InvalidEnvVar(BACKEND_URL_VAR.to_owned(), e.to_string()))?;
        reject_placeholder_key(&key)?;
        Ok(Self {
            backend: Some(BackendConfig {
                base_url,
                api_key: SecretString::from(key),
            }),
        })
    }
}

fn reject_placeholder_key(key: &str) -> Result<(), ConfigError> {
    let lowered = key.to_lowercase();
    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lowered.contains(*p)) {
        return Err(ConfigError::InsecureSecret(
            BACKEND_KEY_VAR.to_owned(),
            format!("contains placeholder pattern '{pattern}'"),
        ));
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
