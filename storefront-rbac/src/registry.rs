//! # Role Registry
//!
//! Static table from role to the pages and resource actions it may use.
//! Built once, never mutated afterwards.

use serde::Serialize;
use std::collections::HashMap;

use crate::actions::Action;
use crate::permissions::{Permission, PermissionCategory, PermissionSet};
use crate::resources::{Page, ResourceType};
use crate::roles::Role;

/// What a single role is granted.
///
/// Either set may be empty ("no access of that category") but both always
/// exist for a role that has a policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RolePolicy {
    /// Page permissions (`<PAGE>:VIEW`).
    pub views: PermissionSet,
    /// Resource permissions (`<RESOURCE>:<METHOD>`).
    pub actions: PermissionSet,
}

impl RolePolicy {
    /// Select the permission set for a category.
    pub fn permissions(&self, category: PermissionCategory) -> &PermissionSet {
        match category {
            PermissionCategory::Views => &self.views,
            PermissionCategory::Actions => &self.actions,
        }
    }

    /// Grant a permission, filing it under its own category.
    fn grant(&mut self, permission: Permission) {
        match permission.category() {
            PermissionCategory::Views => self.views.add(permission),
            PermissionCategory::Actions => self.actions.add(permission),
        }
    }
}

/// Immutable role-to-policy table.
///
/// Roles without an entry (always including `Guest` in the storefront
/// table) resolve to no policy, which the evaluator treats as deny.
///
/// # Example
///
/// ```
/// use storefront_rbac::{Role, RoleRegistry};
///
/// let registry = RoleRegistry::storefront();
/// assert!(registry.policy_for(Role::Admin).is_some());
/// assert!(registry.policy_for(Role::Guest).is_none());
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct RoleRegistry {
    policies: HashMap<Role, RolePolicy>,
}

impl RoleRegistry {
    /// The storefront's built-in table.
    ///
    /// - `ADMIN`: every page; every product method; add/edit/remove users.
    /// - `USER`: the home page and product listing only.
    pub fn storefront() -> Self {
        let product = |action| Permission::action(ResourceType::Product, action);
        let user = |action| Permission::action(ResourceType::User, action);

        Self::builder()
            .grant(Role::Admin, Permission::view(Page::Home))
            .grant(Role::Admin, Permission::view(Page::Dashboard))
            .grant(Role::Admin, Permission::view(Page::User))
            .grant(Role::Admin, product(Action::Get))
            .grant(Role::Admin, product(Action::Add))
            .grant(Role::Admin, product(Action::Edit))
            .grant(Role::Admin, product(Action::Remove))
            .grant(Role::Admin, user(Action::Add))
            .grant(Role::Admin, user(Action::Edit))
            .grant(Role::Admin, user(Action::Remove))
            .grant(Role::User, Permission::view(Page::Home))
            .grant(Role::User, product(Action::Get))
            .build()
    }

    /// Start building a custom table.
    pub fn builder() -> RoleRegistryBuilder {
        RoleRegistryBuilder::default()
    }

    /// Look up the policy for a role.
    pub fn policy_for(&self, role: Role) -> Option<&RolePolicy> {
        self.policies.get(&role)
    }

    /// Roles that have a policy, in wire-name order.
    pub fn roles(&self) -> Vec<Role> {
        let mut roles: Vec<Role> = self.policies.keys().copied().collect();
        roles.sort_by_key(|r| r.as_str());
        roles
    }
}

/// Builder for [`RoleRegistry`].
#[derive(Debug, Default)]
pub struct RoleRegistryBuilder {
    policies: HashMap<Role, RolePolicy>,
}

impl RoleRegistryBuilder {
    /// Register a role with empty permission sets.
    ///
    /// Useful for a role that must have a policy entry but no access yet.
    pub fn role(mut self, role: Role) -> Self {
        self.policies.entry(role).or_default();
        self
    }

    /// Grant a permission to a role.
    pub fn grant(mut self, role: Role, permission: Permission) -> Self {
        self.policies.entry(role).or_default().grant(permission);
        self
    }

    /// Grant several permissions to a role.
    pub fn grant_all<I>(mut self, role: Role, permissions: I) -> Self
    where
        I: IntoIterator<Item = Permission>,
    {
        let policy = self.policies.entry(role).or_default();
        for permission in permissions {
            policy.grant(permission);
        }
        self
    }

    /// Freeze the table.
    pub fn build(self) -> RoleRegistry {
        RoleRegistry {
            policies: self.policies,
        }
    }
}
