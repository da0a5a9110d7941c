//! Signature-verifying credential decoder
//!
//! For hosts that hold the verification key. Uses the jsonwebtoken crate
//! and checks signature, expiry and (optionally) issuer before handing the
//! claims to the session manager.

use crate::claims::IdentityClaims;
use crate::decoder::ClaimsDecoder;
use crate::error::{AuthError, AuthResult};
use serde::{Deserialize, Serialize};

use jsonwebtoken::{decode, Algorithm, DecodingKey, TokenData, Validation};

/// Verification settings.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for HMAC algorithms (HS256, HS384, HS512)
    pub secret: Option<String>,

    /// Public key (PEM) for RSA/EC algorithms
    pub public_key: Option<String>,

    /// Algorithm the issuer signs with
    pub algorithm: JwtAlgorithm,

    /// Expected issuer; not checked when `None`
    pub issuer: Option<String>,

    /// Clock skew tolerated on `exp`, in seconds
    pub leeway_secs: u64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: None,
            public_key: None,
            algorithm: JwtAlgorithm::HS256,
            issuer: None,
            leeway_secs: 0,
        }
    }
}

/// Supported JWT algorithms.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum JwtAlgorithm {
    /// HMAC using SHA-256
    HS256,
    /// HMAC using SHA-384
    HS384,
    /// HMAC using SHA-512
    HS512,
    /// RSASSA-PKCS1-v1_5 using SHA-256
    RS256,
    /// ECDSA using P-256 and SHA-256
    ES256,
}

impl From<JwtAlgorithm> for Algorithm {
    fn from(alg: JwtAlgorithm) -> Self {
        match alg {
            JwtAlgorithm::HS256 => Algorithm::HS256,
            JwtAlgorithm::HS384 => Algorithm::HS384,
            JwtAlgorithm::HS512 => Algorithm::HS512,
            JwtAlgorithm::RS256 => Algorithm::RS256,
            JwtAlgorithm::ES256 => Algorithm::ES256,
        }
    }
}

/// Decoder that verifies the credential before trusting its claims.
pub struct JwtVerifier {
    config: JwtConfig,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtVerifier")
            .field("algorithm", &self.config.algorithm)
            .field("issuer", &self.config.issuer)
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

impl JwtVerifier {
    /// Create a verifier from configuration.
    pub fn new(config: JwtConfig) -> AuthResult<Self> {
        let decoding_key = Self::create_decoding_key(&config)?;
        Ok(Self {
            config,
            decoding_key,
        })
    }

    /// Create with a shared HMAC secret (HS256).
    pub fn with_secret(secret: impl Into<String>) -> AuthResult<Self> {
        Self::new(JwtConfig {
            secret: Some(secret.into()),
            ..Default::default()
        })
    }

    fn create_decoding_key(config: &JwtConfig) -> AuthResult<DecodingKey> {
        match config.algorithm {
            JwtAlgorithm::HS256 | JwtAlgorithm::HS384 | JwtAlgorithm::HS512 => {
                let secret = config
                    .secret
                    .as_ref()
                    .ok_or_else(|| AuthError::ConfigError("Secret required for HMAC".to_string()))?;
                Ok(DecodingKey::from_secret(secret.as_bytes()))
            }
            JwtAlgorithm::RS256 => {
                let key = config
                    .public_key
                    .as_ref()
                    .ok_or_else(|| AuthError::ConfigError("Public key required for RSA".to_string()))?;
                DecodingKey::from_rsa_pem(key.as_bytes())
                    .map_err(|e| AuthError::ConfigError(format!("Invalid RSA public key: {}", e)))
            }
            JwtAlgorithm::ES256 => {
                let key = config
                    .public_key
                    .as_ref()
                    .ok_or_else(|| AuthError::ConfigError("Public key required for EC".to_string()))?;
                DecodingKey::from_ec_pem(key.as_bytes())
                    .map_err(|e| AuthError::ConfigError(format!("Invalid EC public key: {}", e)))
            }
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(self.config.algorithm.into());
        validation.leeway = self.config.leeway_secs;
        validation.validate_aud = false;
        if let Some(ref issuer) = self.config.issuer {
            validation.set_issuer(&[issuer]);
        }
        validation
    }

    /// Get the configuration.
    pub fn config(&self) -> &JwtConfig {
        &self.config
    }
}

impl ClaimsDecoder for JwtVerifier {
    fn decode(&self, raw_token: &str) -> AuthResult<IdentityClaims> {
        let token_data: TokenData<IdentityClaims> =
            decode(raw_token.trim(), &self.decoding_key, &self.validation()).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    jsonwebtoken::errors::ErrorKind::InvalidToken => {
                        AuthError::InvalidToken("Malformed token".to_string())
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AuthError::InvalidToken("Invalid signature".to_string())
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidIssuer => {
                        AuthError::InvalidToken("Invalid issuer".to_string())
                    }
                    _ => AuthError::InvalidToken(e.to_string()),
                }
            })?;

        token_data.claims.validate()?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn test_secret() -> String {
        "test-secret-key-for-jwt-signing-minimum-32-chars".to_string()
    }

    fn sign(claims: &IdentityClaims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_verifies_signed_token() {
        let verifier = JwtVerifier::with_secret(test_secret()).unwrap();
        let claims = IdentityClaims::new("u-1", Duration::hours(1)).with_role("ADMIN");

        let decoded = verifier.decode(&sign(&claims, &test_secret())).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_rejects_wrong_secret() {
        let verifier = JwtVerifier::with_secret(test_secret()).unwrap();
        let claims = IdentityClaims::new("u-1", Duration::hours(1));
        let token = sign(&claims, "some-other-secret-that-is-also-long-enough");

        assert!(matches!(verifier.decode(&token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_rejects_expired_token() {
        let verifier = JwtVerifier::with_secret(test_secret()).unwrap();
        let mut claims = IdentityClaims::new("u-1", Duration::hours(1));
        claims.iat = Utc::now().timestamp() - 7200;
        claims.exp = Utc::now().timestamp() - 3600;

        assert!(matches!(
            verifier.decode(&sign(&claims, &test_secret())),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_rejects_garbage() {
        let verifier = JwtVerifier::with_secret(test_secret()).unwrap();
        assert!(matches!(verifier.decode("invalid-token"), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let result = JwtVerifier::new(JwtConfig::default());
        assert!(matches!(result, Err(AuthError::ConfigError(_))));

        let result = JwtVerifier::new(JwtConfig {
            algorithm: JwtAlgorithm::RS256,
            ..Default::default()
        });
        assert!(matches!(result, Err(AuthError::ConfigError(_))));
    }
}
