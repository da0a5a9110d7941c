//! Credential decoding
//!
//! Turns the raw credential string into [`IdentityClaims`]. The default
//! decoder reads the payload without checking the signature; hosts that
//! hold the verification key use `JwtVerifier` (feature `jwt`) instead.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

use crate::claims::IdentityClaims;
use crate::error::{AuthError, AuthResult};

/// Decodes a raw credential into identity claims.
pub trait ClaimsDecoder: Send + Sync {
    /// Decode and structurally validate `raw_token`.
    fn decode(&self, raw_token: &str) -> AuthResult<IdentityClaims>;
}

/// Payload-only decoder for compact JWTs.
///
/// Splits `header.payload.signature`, base64url-decodes the payload and
/// parses it as JSON. The signature segment is never looked at and the
/// expiry is not checked here.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnverifiedDecoder;

impl UnverifiedDecoder {
    /// Create the decoder.
    pub fn new() -> Self {
        Self
    }

    fn payload_bytes(raw_token: &str) -> AuthResult<Vec<u8>> {
        let token = raw_token.trim();
        if token.is_empty() {
            return Err(AuthError::InvalidToken("empty token".to_string()));
        }

        let segments: Vec<&str> = token.split('.').collect();
        if segments.len() != 3 {
            return Err(AuthError::InvalidToken(format!(
                "expected 3 segments, found {}",
                segments.len()
            )));
        }

        // Some issuers pad or use the standard alphabet; normalise both.
        let payload: String = segments[1]
            .trim_end_matches('=')
            .chars()
            .map(|c| match c {
                '+' => '-',
                '/' => '_',
                other => other,
            })
            .collect();

        URL_SAFE_NO_PAD
            .decode(payload.as_bytes())
            .map_err(|e| AuthError::InvalidToken(format!("payload is not base64url: {}", e)))
    }
}

impl ClaimsDecoder for UnverifiedDecoder {
    fn decode(&self, raw_token: &str) -> AuthResult<IdentityClaims> {
        let bytes = Self::payload_bytes(raw_token)?;
        let claims: IdentityClaims = serde_json::from_slice(&bytes)
            .map_err(|e| AuthError::InvalidToken(format!("payload is not valid claims: {}", e)))?;
        claims.validate()?;
        Ok(claims)
    }
}
