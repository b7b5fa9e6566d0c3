//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! Both optional, but they travel together:
//! - `RIVAAJ_BACKEND_URL` - Base URL of the hosted backend
//! - `RIVAAJ_BACKEND_KEY` - API key sent with every backend request
//!
//! With neither set the engine runs in a degraded mode where every gateway
//! call reports an unavailable backend. Setting exactly one of the two is
//! treated as a misconfiguration and fails loudly.

use secrecy::{ExposeSecret, SecretString};
use url::Url;

/// Environment variable holding the backend base URL.
pub const BACKEND_URL_VAR: &str = "RIVAAJ_BACKEND_URL";
/// Environment variable holding the backend API key.
pub const BACKEND_KEY_VAR: &str = "RIVAAJ_BACKEND_KEY";

/// Substrings that indicate a placeholder rather than a real key.
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

/// Storefront engine configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Hosted backend connection, or `None` for the degraded mode.
    pub backend: Option<BackendConfig>,
}

/// Connection settings for the hosted backend.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct BackendConfig {
    /// Base URL, e.g. `https://shop.example.com`.
    pub base_url: Url,
    /// API key sent as both `apikey` and bearer token.
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

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` first so a local `.env` file is picked up.
    ///
    /// # Errors
    ///
    /// Returns an error if only one of the backend variables is set, the
    /// URL does not parse, or the key looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// `true` when a backend connection is configured.
    #[must_use]
    pub const fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = match (lookup(BACKEND_URL_VAR), lookup(BACKEND_KEY_VAR)) {
            (None, None) => {
                tracing::warn!(
                    "{BACKEND_URL_VAR} and {BACKEND_KEY_VAR} not set; backend calls will report unavailable"
                );
                None
            }
            (Some(_), None) => return Err(ConfigError::MissingEnvVar(BACKEND_KEY_VAR.to_owned())),
            (None, Some(_)) => return Err(ConfigError::MissingEnvVar(BACKEND_URL_VAR.to_owned())),
            (Some(url), Some(key)) => {
                let base_url = Url::parse(&url).map_err(|e| {
                    ConfigError::InvalidEnvVar(BACKEND_URL_VAR.to_owned(), e.to_string())
                })?;
                validate_api_key(&key)?;
                Some(BackendConfig {
                    base_url,
                    api_key: SecretString::from(key),
                })
            }
        };
        Ok(Self { backend })
    }
}

/// Reject keys that are obviously placeholders left over from setup.
fn validate_api_key(key: &str) -> Result<(), ConfigError> {
    let lowered = key.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lowered.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                BACKEND_KEY_VAR.to_owned(),
                format!("contains placeholder pattern '{pattern}'"),
            ));
        }
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
