//! Identity claims carried by the storefront credential
//!
//! The credential is a compact JWT whose payload names the user and the
//! validity window, and may carry a role.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use storefront_rbac::Role;

use crate::error::{AuthError, AuthResult};

/// Decoded credential payload.
///
/// The user id is read from `id`, with `sub` and `userId` accepted as
/// aliases; numeric ids are kept as their decimal string. A payload must
/// carry only one of the three.
///
/// # Example
///
/// ```
/// use storefront_auth::IdentityClaims;
/// use storefront_rbac::Role;
///
/// let claims: IdentityClaims =
///     serde_json::from_str(r#"{"id": 42, "role": "ADMIN", "iat": 1700000000, "exp": 1700003600}"#).unwrap();
/// assert_eq!(claims.user_id, "42");
/// assert_eq!(claims.role(), Some(Role::Admin));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// User identifier.
    #[serde(rename = "id", alias = "sub", alias = "userId", deserialize_with = "string_or_number")]
    pub user_id: String,

    /// Role name as issued, if the issuer embeds one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl IdentityClaims {
    /// Create claims for a user valid for `duration` from now.
    pub fn new(user_id: impl Into<String>, duration: chrono::Duration) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.into(),
            role: None,
            iat: now.timestamp(),
            exp: (now + duration).timestamp(),
        }
    }

    /// Set the embedded role name.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// The embedded role, if present and one a session can hold.
    pub fn role(&self) -> Option<Role> {
        self.role.as_deref().and_then(Role::parse)
    }

    /// Check if the credential is expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now(), 0)
    }

    /// Check expiry against `now`, tolerating `leeway_secs` of clock skew.
    pub fn is_expired_at(&self, now: DateTime<Utc>, leeway_secs: i64) -> bool {
        now.timestamp() >= self.exp.saturating_add(leeway_secs)
    }

    /// Get issue time as DateTime.
    pub fn issued_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.iat, 0).unwrap_or_default()
    }

    /// Get expiration as DateTime.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_default()
    }

    /// Structural checks beyond what deserialization enforces.
    pub fn validate(&self) -> AuthResult<()> {
        if self.user_id.trim().is_empty() {
            return Err(AuthError::MissingClaim("id".to_string()));
        }
        if self.exp <= self.iat {
            return Err(AuthError::InvalidToken(
                "expiry is not after issue time".to_string(),
            ));
        }
        Ok(())
    }
}

pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number for user id, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_claims_creation() {
        let claims = IdentityClaims::new("u-1", Duration::hours(1)).with_role("USER");

        assert_eq!(claims.user_id, "u-1");
        assert_eq!(claims.role(), Some(Role::User));
        assert!(!claims.is_expired());
        assert!(claims.validate().is_ok());
    }

    #[test]
    fn test_claims_expiration() {
        let mut claims = IdentityClaims::new("u-1", Duration::hours(1));
        claims.exp = Utc::now().timestamp() - 3600;
        claims.iat = claims.exp - 3600;

        assert!(claims.is_expired());
        // Two hours of leeway covers a token that expired an hour ago.
        assert!(!claims.is_expired_at(Utc::now(), 7200));
    }

    #[test]
    fn test_unknown_role_is_none() {
        let claims = IdentityClaims::new("u-1", Duration::hours(1)).with_role("OWNER");
        assert_eq!(claims.role(), None);
    }

    #[test]
    fn test_user_id_aliases() {
        for json in [
            r#"{"id":"a","iat":1,"exp":2}"#,
            r#"{"sub":"a","iat":1,"exp":2}"#,
            r#"{"userId":"a","iat":1,"exp":2}"#,
        ] {
            let claims: IdentityClaims = serde_json::from_str(json).unwrap();
            assert_eq!(claims.user_id, "a");
        }

        let claims: IdentityClaims = serde_json::from_str(r#"{"id":7,"iat":1,"exp":2}"#).unwrap();
        assert_eq!(claims.user_id, "7");
    }

    #[test]
    fn test_rejects_bad_payloads() {
        assert!(serde_json::from_str::<IdentityClaims>(r#"{"iat":1,"exp":2}"#).is_err());
        assert!(serde_json::from_str::<IdentityClaims>(r#"{"id":"a","exp":2}"#).is_err());
        assert!(serde_json::from_str::<IdentityClaims>(r#"{"id":true,"iat":1,"exp":2}"#).is_err());
    }

    #[test]
    fn test_validate() {
        let mut claims = IdentityClaims::new("  ", Duration::hours(1));
        assert!(matches!(claims.validate(), Err(AuthError::MissingClaim(_))));

        claims.user_id = "u".to_string();
        claims.exp = claims.iat;
        assert!(matches!(claims.validate(), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_timestamps() {
        let claims = IdentityClaims {
            user_id: "u".to_string(),
            role: None,
            iat: 1_700_000_000,
            exp: 1_700_003_600,
        };
        assert_eq!(claims.issued_at().timestamp(), 1_700_000_000);
        assert_eq!((claims.expires_at() - claims.issued_at()).num_seconds(), 3600);
    }
}
