//! # Policy Evaluation
//!
//! Pure allow/deny decisions over a [`RoleRegistry`].
//!
//! Every failure mode is a deny: unknown role, unknown category, a role
//! without a registry entry, an empty permission set, or an identifier that
//! is simply not granted. Nothing here returns an error or panics.

use serde::Serialize;

use crate::permissions::{Permission, PermissionCategory};
use crate::registry::RoleRegistry;
use crate::roles::Role;

/// Why a request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// The role string did not name a session role.
    UnknownRole,
    /// The category string was neither `views` nor `actions`.
    UnknownCategory,
    /// The registry has no policy for the role.
    NoPolicy,
    /// The role's set for this category is empty.
    EmptyCategory,
    /// The set exists but does not contain the identifier.
    NotGranted,
}

/// Outcome of a policy check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum Decision {
    /// Access granted.
    Allow,
    /// Access denied, with the first rule that failed.
    Deny(DenyReason),
}

impl Decision {
    /// Whether access was granted.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// The deny reason, if denied.
    pub fn deny_reason(&self) -> Option<DenyReason> {
        match self {
            Decision::Allow => None,
            Decision::Deny(reason) => Some(*reason),
        }
    }
}

/// Evaluates permission checks against a registry.
///
/// Holds only a shared reference, so any number of evaluators can read the
/// same registry concurrently.
#[derive(Debug, Clone, Copy)]
pub struct PolicyEvaluator<'a> {
    registry: &'a RoleRegistry,
}

impl<'a> PolicyEvaluator<'a> {
    /// Create an evaluator over `registry`.
    pub fn new(registry: &'a RoleRegistry) -> Self {
        Self { registry }
    }

    /// Decide whether `role` holds `permission` in `category`.
    pub fn decide(&self, role: Role, permission: &str, category: PermissionCategory) -> Decision {
        let Some(policy) = self.registry.policy_for(role) else {
            return Decision::Deny(DenyReason::NoPolicy);
        };

        let granted = policy.permissions(category);
        if granted.is_empty() {
            return Decision::Deny(DenyReason::EmptyCategory);
        }

        if granted.contains(permission) {
            Decision::Allow
        } else {
            Decision::Deny(DenyReason::NotGranted)
        }
    }

    /// Boolean form of [`decide`](Self::decide).
    pub fn evaluate(&self, role: Role, permission: &str, category: PermissionCategory) -> bool {
        let decision = self.decide(role, permission, category);
        tracing::trace!(
            role = %role,
            permission,
            category = %category,
            ?decision,
            "evaluated permission"
        );
        decision.is_allowed()
    }

    /// Check a typed permission under its own category.
    pub fn allows(&self, role: Role, permission: &Permission) -> bool {
        self.evaluate(role, &permission.to_string(), permission.category())
    }

    /// Decide from untyped inputs, e.g. values read from a route table.
    pub fn decide_raw(&self, role: &str, permission: &str, category: &str) -> Decision {
        let Some(role) = Role::parse(role) else {
            return Decision::Deny(DenyReason::UnknownRole);
        };
        let Some(category) = PermissionCategory::parse(category) else {
            return Decision::Deny(DenyReason::UnknownCategory);
        };
        self.decide(role, permission, category)
    }

    /// Boolean form of [`decide_raw`](Self::decide_raw).
    pub fn evaluate_raw(&self, role: &str, permission: &str, category: &str) -> bool {
        self.decide_raw(role, permission, category).is_allowed()
    }
}

/// Evaluate a single check against `registry`.
///
/// # Example
///
/// ```
/// use storefront_rbac::{evaluate, PermissionCategory, Role, RoleRegistry};
///
/// let registry = RoleRegistry::storefront();
/// assert!(evaluate(&registry, Role::Admin, "DASHBOARD:VIEW", PermissionCategory::Views));
/// assert!(!evaluate(&registry, Role::User, "DASHBOARD:VIEW", PermissionCategory::Views));
/// ```
pub fn evaluate(
    registry: &RoleRegistry,
    role: Role,
    permission: &str,
    category: PermissionCategory,
) -> bool {
    PolicyEvaluator::new(registry).evaluate(role, permission, category)
}
