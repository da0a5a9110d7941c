//! Identity-fetch collaborator
//!
//! After a session is established the host may ask the identity service who
//! the user is. The answer's role replaces the role embedded in the claims.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use storefront_rbac::Role;

use crate::claims::string_or_number;
use crate::error::AuthResult;

/// Profile returned by the identity service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User identifier. Numeric ids are kept as their decimal string, as
    /// in the claims.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    /// Display name
    pub name: String,

    /// Email address, when the service exposes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Role name as the service reports it
    pub role: String,
}

impl UserProfile {
    /// The reported role. Anything the registry does not know is `Guest`.
    pub fn session_role(&self) -> Role {
        Role::resolve(Some(&self.role))
    }
}

/// Looks a user up with the identity service.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Fetch the profile of `user_id`, authenticating with `raw_token`.
    ///
    /// Implementations report a refused credential as `Unauthorized`,
    /// `InvalidToken` or `TokenExpired`, and everything else as
    /// `IdentityUnavailable`.
    async fn fetch_profile(&self, user_id: &str, raw_token: &str) -> AuthResult<UserProfile>;
}
