//! HTTP identity provider.
//!
//! Fetches the user profile from the storefront REST API with the session
//! credential as bearer token.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, instrument, warn};

use crate::config::IdentityEndpoint;
use crate::error::{AuthError, AuthResult};
use crate::identity::{IdentityProvider, UserProfile};

/// Identity provider backed by `GET {base_url}/users/{id}`.
#[derive(Clone)]
pub struct HttpIdentityProvider {
    /// HTTP client instance.
    client: Client,

    /// Service endpoint configuration.
    endpoint: IdentityEndpoint,
}

impl std::fmt::Debug for HttpIdentityProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpIdentityProvider")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl HttpIdentityProvider {
    /// Create a provider for `endpoint`.
    pub fn new(endpoint: IdentityEndpoint) -> AuthResult<Self> {
        endpoint.validate()?;

        let client = Client::builder()
            .timeout(endpoint.timeout())
            .build()
            .map_err(|e| AuthError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, endpoint })
    }

    /// `{base_url}/users/{user_id}` with the id as one encoded path segment.
    ///
    /// The id comes from the credential, so `/`, `?` and `#` are escaped
    /// and the dot segments the URL parser would collapse are refused.
    fn profile_url(&self, user_id: &str) -> AuthResult<Url> {
        if matches!(user_id.trim(), "" | "." | "..") {
            return Err(AuthError::InvalidToken(format!(
                "user id {:?} cannot name a profile",
                user_id
            )));
        }

        let mut url = Url::parse(&self.endpoint.base_url)
            .map_err(|e| AuthError::ConfigError(format!("Invalid identity service URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| {
                AuthError::ConfigError(format!(
                    "Identity service URL cannot take a path: {}",
                    self.endpoint.base_url
                ))
            })?
            .pop_if_empty()
            .push("users")
            .push(user_id);
        Ok(url)
    }

    /// Create a provider from `STOREFRONT_API_*` environment variables.
    pub fn from_env() -> AuthResult<Self> {
        Self::new(IdentityEndpoint::from_env())
    }

    pub fn endpoint(&self) -> &IdentityEndpoint {
        &self.endpoint
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    #[instrument(skip(self, raw_token), fields(user_id = %user_id))]
    async fn fetch_profile(&self, user_id: &str, raw_token: &str) -> AuthResult<UserProfile> {
        let url = self.profile_url(user_id)?;
        debug!("Fetching profile from {}", url);

        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {}", raw_token))
            .send()
            .await
            .map_err(|e| AuthError::IdentityUnavailable(format!("request failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!("Identity service refused the credential");
            return Err(AuthError::Unauthorized(format!(
                "identity service answered {}",
                status.as_u16()
            )));
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Identity service error");
            return Err(AuthError::IdentityUnavailable(format!(
                "identity service answered {}: {}",
                status.as_u16(),
                message
            )));
        }

        response
            .json::<UserProfile>()
            .await
            .map_err(|e| AuthError::IdentityUnavailable(format!("invalid profile response: {}", e)))
    }
}
