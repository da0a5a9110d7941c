//! # Roles
//!
//! The closed set of roles a storefront session can hold.

use serde::{Deserialize, Serialize};

/// Role attached to a session.
///
/// Roles are mutually exclusive: a session holds exactly one at a time.
/// `Guest` never comes from a credential; it is what the caller gets
/// whenever there is no valid session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Back-office administrator.
    Admin,
    /// Signed-in shopper.
    User,
    /// No valid session.
    #[default]
    Guest,
}

impl Role {
    /// Get the wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
            Role::Guest => "GUEST",
        }
    }

    /// Parse a role carried by a credential or identity profile.
    ///
    /// Matching is exact and case-sensitive. Only roles a session can
    /// actually hold are accepted, so `"GUEST"` parses to `None` like any
    /// other unknown string.
    ///
    /// # Example
    ///
    /// ```
    /// use storefront_rbac::Role;
    ///
    /// assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
    /// assert_eq!(Role::parse("admin"), None);
    /// assert_eq!(Role::parse("GUEST"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ADMIN" => Some(Role::Admin),
            "USER" => Some(Role::User),
            _ => None,
        }
    }

    /// Resolve an optional role string, falling back to `Guest`.
    pub fn resolve(s: Option<&str>) -> Self {
        s.and_then(Self::parse).unwrap_or(Role::Guest)
    }

    /// Whether this role comes from an authenticated session.
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Role::Guest)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
