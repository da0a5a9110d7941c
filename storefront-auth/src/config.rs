//! Session and identity-service configuration.
//!
//! Both structs load from environment variables with defaults suitable for
//! local development. Unparseable values fall back to the default; use
//! `validate()` to reject values that parse but make no sense.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::error::AuthError;

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Missing required setting.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

impl From<ConfigError> for AuthError {
    fn from(err: ConfigError) -> Self {
        AuthError::ConfigError(err.to_string())
    }
}

/// How the session manager reads and judges the stored credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Storage key the credential lives under.
    pub storage_key: String,

    /// Treat a credential whose `exp` has passed as no credential.
    pub check_expiry: bool,

    /// Clock skew tolerated on `exp`, in seconds.
    pub expiry_leeway_secs: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_key: "token".to_string(),
            check_expiry: true,
            expiry_leeway_secs: 0,
        }
    }
}

impl SessionConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `STOREFRONT_TOKEN_KEY`: storage key (default: token)
    /// - `STOREFRONT_CHECK_EXPIRY`: reject expired credentials (default: true)
    /// - `STOREFRONT_EXPIRY_LEEWAY_SECS`: clock skew on expiry (default: 0)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default = Self::default();

        Self {
            storage_key: lookup("STOREFRONT_TOKEN_KEY").unwrap_or(default.storage_key),
            check_expiry: lookup("STOREFRONT_CHECK_EXPIRY")
                .map(|s| s != "false" && s != "0")
                .unwrap_or(default.check_expiry),
            expiry_leeway_secs: lookup("STOREFRONT_EXPIRY_LEEWAY_SECS")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(default.expiry_leeway_secs),
        }
    }

    /// Disable expiry checking.
    pub fn without_expiry_check(mut self) -> Self {
        self.check_expiry = false;
        self
    }

    /// Use a different storage key.
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Replace the values `validate` rejects with their defaults.
    pub fn normalized(mut self) -> Self {
        if self.storage_key.trim().is_empty() {
            self.storage_key = Self::default().storage_key;
        }
        self.expiry_leeway_secs = self.expiry_leeway_secs.max(0);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "STOREFRONT_TOKEN_KEY".to_string(),
                message: "storage key must not be empty".to_string(),
            });
        }
        if self.expiry_leeway_secs < 0 {
            return Err(ConfigError::InvalidValue {
                key: "STOREFRONT_EXPIRY_LEEWAY_SECS".to_string(),
                message: format!("leeway must not be negative, got {}", self.expiry_leeway_secs),
            });
        }
        Ok(())
    }
}

/// Where the identity service lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityEndpoint {
    /// Base URL for the service (e.g., "https://api.storefront.dev").
    pub base_url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for IdentityEndpoint {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            timeout_secs: 10,
        }
    }
}

impl IdentityEndpoint {
    /// Endpoint at `base_url` with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `STOREFRONT_API_URL`: identity service URL (default: http://localhost:3000)
    /// - `STOREFRONT_API_TIMEOUT_SECS`: request timeout in seconds (default: 10)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default = Self::default();

        Self {
            base_url: lookup("STOREFRONT_API_URL").unwrap_or(default.base_url),
            timeout_secs: lookup("STOREFRONT_API_TIMEOUT_SECS")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(default.timeout_secs),
        }
    }

    /// Build a full URL by appending a path to the base URL.
    pub fn url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// Get the request timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::MissingEnvVar("STOREFRONT_API_URL".to_string()));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                key: "STOREFRONT_API_URL".to_string(),
                message: format!("expected an http(s) URL, got {}", self.base_url),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "STOREFRONT_API_TIMEOUT_SECS".to_string(),
                message: "timeout must be at least one second".to_string(),
            });
        }
        Ok(())
    }
}
