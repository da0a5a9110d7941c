//! Error types for session operations
//!
//! Covers credential decoding, credential storage, identity lookups and
//! configuration. Access checks themselves never error; see
//! `storefront_rbac::evaluator`.

use thiserror::Error;

/// Authentication/session error types.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Credential has expired
    #[error("Token has expired")]
    TokenExpired,

    /// Credential is invalid (malformed, undecodable, bad signature)
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Credential payload is missing a required claim
    #[error("Missing required claim: {0}")]
    MissingClaim(String),

    /// The identity service refused the credential
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The identity service could not produce a profile
    #[error("Identity unavailable: {0}")]
    IdentityUnavailable(String),

    /// Credential storage failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for session operations.
pub type AuthResult<T> = Result<T, AuthError>;

impl AuthError {
    /// Whether this error means the credential itself is no good.
    ///
    /// The session manager tears the session down when the identity
    /// service answers with one of these.
    pub fn is_credential_rejection(&self) -> bool {
        matches!(
            self,
            AuthError::TokenExpired | AuthError::InvalidToken(_) | AuthError::Unauthorized(_)
        )
    }

    /// Get error code for logs and API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::TokenExpired => "TOKEN_EXPIRED",
            AuthError::InvalidToken(_) => "INVALID_TOKEN",
            AuthError::MissingClaim(_) => "MISSING_CLAIM",
            AuthError::Unauthorized(_) => "UNAUTHORIZED",
            AuthError::IdentityUnavailable(_) => "IDENTITY_UNAVAILABLE",
            AuthError::Storage(_) => "STORAGE_ERROR",
            AuthError::ConfigError(_) => "CONFIG_ERROR",
            AuthError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<std::io::Error> for AuthError {
    fn from(err: std::io::Error) -> Self {
        AuthError::Storage(err.to_string())
    }
}
