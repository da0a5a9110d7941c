//! # Access Gate
//!
//! Guarded rendering: pick one of two deferred branches based on a policy
//! check for the caller's current role.
//!
//! ```text
//! RoleSource ──(role)──> AccessGate ──> PolicyEvaluator ──> RoleRegistry
//!                              │
//!                   Allowed(on_allow()) | Denied(on_deny())
//! ```

use crate::evaluator::PolicyEvaluator;
use crate::permissions::{Permission, PermissionCategory};
use crate::registry::RoleRegistry;
use crate::roles::Role;

/// Anything that can report the caller's current role.
///
/// Implemented by the session manager; tests and hosts with their own
/// session handling can implement it directly.
pub trait RoleSource {
    /// The role to evaluate with right now. `Guest` when there is no session.
    fn current_role(&self) -> Role;
}

impl RoleSource for Role {
    fn current_role(&self) -> Role {
        *self
    }
}

/// Result of a gated render, tagged with which branch produced it.
///
/// Callers have to go through [`Gated::into_inner`] or a match to get the
/// value, so a denied branch cannot be mistaken for an allowed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gated<T> {
    /// Produced by the allow branch.
    Allowed(T),
    /// Produced by the deny branch.
    Denied(T),
}

impl<T> Gated<T> {
    /// Whether the allow branch ran.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Gated::Allowed(_))
    }

    /// Unwrap the value regardless of branch.
    pub fn into_inner(self) -> T {
        match self {
            Gated::Allowed(value) | Gated::Denied(value) => value,
        }
    }

    /// The value if allowed, `None` if denied.
    pub fn allowed(self) -> Option<T> {
        match self {
            Gated::Allowed(value) => Some(value),
            Gated::Denied(_) => None,
        }
    }

    /// Transform the value, keeping the branch tag.
    pub fn map<U, F>(self, f: F) -> Gated<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Gated::Allowed(value) => Gated::Allowed(f(value)),
            Gated::Denied(value) => Gated::Denied(f(value)),
        }
    }
}

/// Guard primitive combining a role source with the policy evaluator.
///
/// Every call performs exactly one evaluation with the role as it is at
/// that moment; nothing is cached, so a role change is picked up by the
/// next call.
///
/// # Example
///
/// ```
/// use storefront_rbac::{AccessGate, PermissionCategory, Role, RoleRegistry};
///
/// let registry = RoleRegistry::storefront();
/// let role = Role::User;
/// let gate = AccessGate::new(&role, &registry);
///
/// let page = gate.render("USER:VIEW", PermissionCategory::Views, || "users", || "no access");
/// assert_eq!(page.into_inner(), "no access");
/// ```
pub struct AccessGate<'a> {
    source: &'a dyn RoleSource,
    evaluator: PolicyEvaluator<'a>,
}

impl<'a> AccessGate<'a> {
    /// Create a gate reading roles from `source`.
    pub fn new(source: &'a dyn RoleSource, registry: &'a RoleRegistry) -> Self {
        Self {
            source,
            evaluator: PolicyEvaluator::new(registry),
        }
    }

    /// Run `on_allow` if the current role holds `permission`, else `on_deny`.
    ///
    /// Only the chosen branch is invoked.
    pub fn render<T, A, D>(
        &self,
        permission: &str,
        category: PermissionCategory,
        on_allow: A,
        on_deny: D,
    ) -> Gated<T>
    where
        A: FnOnce() -> T,
        D: FnOnce() -> T,
    {
        let role = self.source.current_role();
        let decision = self.evaluator.decide(role, permission, category);

        if decision.is_allowed() {
            tracing::trace!(role = %role, permission, category = %category, "gate allowed");
            Gated::Allowed(on_allow())
        } else {
            tracing::debug!(
                role = %role,
                permission,
                category = %category,
                reason = ?decision.deny_reason(),
                "gate denied"
            );
            Gated::Denied(on_deny())
        }
    }

    /// Like [`render`](Self::render) with an empty deny result.
    pub fn render_or_default<T, A>(
        &self,
        permission: &str,
        category: PermissionCategory,
        on_allow: A,
    ) -> Gated<T>
    where
        T: Default,
        A: FnOnce() -> T,
    {
        self.render(permission, category, on_allow, T::default)
    }

    /// Typed variant of [`render`](Self::render).
    pub fn render_permission<T, A, D>(&self, permission: &Permission, on_allow: A, on_deny: D) -> Gated<T>
    where
        A: FnOnce() -> T,
        D: FnOnce() -> T,
    {
        self.render(&permission.to_string(), permission.category(), on_allow, on_deny)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::Action;
    use crate::resources::ResourceType;
    use std::cell::Cell;

    const VIEWS: PermissionCategory = PermissionCategory::Views;

    #[test]
    fn test_gate_user_page_by_role() {
        let registry = RoleRegistry::storefront();

        let admin = Role::Admin;
        let gate = AccessGate::new(&admin, &registry);
        assert_eq!(gate.render("USER:VIEW", VIEWS, || "A", || "B"), Gated::Allowed("A"));

        let user = Role::User;
        let gate = AccessGate::new(&user, &registry);
        assert_eq!(gate.render("USER:VIEW", VIEWS, || "A", || "B"), Gated::Denied("B"));

        let guest = Role::Guest;
        let gate = AccessGate::new(&guest, &registry);
        assert_eq!(gate.render("USER:VIEW", VIEWS, || "A", || "B").into_inner(), "B");
    }

    #[test]
    fn test_only_chosen_branch_runs() {
        let registry = RoleRegistry::storefront();
        let role = Role::User;
        let gate = AccessGate::new(&role, &registry);

        let allow_calls = Cell::new(0);
        let deny_calls = Cell::new(0);

        let _ = gate.render(
            "DASHBOARD:VIEW",
            VIEWS,
            || allow_calls.set(allow_calls.get() + 1),
            || deny_calls.set(deny_calls.get() + 1),
        );

        assert_eq!(allow_calls.get(), 0);
        assert_eq!(deny_calls.get(), 1);
    }

    #[test]
    fn test_render_or_default_denies_empty() {
        let registry = RoleRegistry::storefront();
        let role = Role::Guest;
        let gate = AccessGate::new(&role, &registry);

        let rendered: Gated<String> =
            gate.render_or_default("HOME:VIEW", VIEWS, || "welcome".to_string());
        assert_eq!(rendered, Gated::Denied(String::new()));
    }

    #[test]
    fn test_gate_observes_role_changes() {
        struct Switchable(Cell<Role>);
        impl RoleSource for Switchable {
            fn current_role(&self) -> Role {
                self.0.get()
            }
        }

        let registry = RoleRegistry::storefront();
        let source = Switchable(Cell::new(Role::Admin));
        let gate = AccessGate::new(&source, &registry);
        let perm = Permission::action(ResourceType::Product, Action::Remove);

        assert!(gate.render_permission(&perm, || (), || ()).is_allowed());
        source.0.set(Role::User);
        assert!(!gate.render_permission(&perm, || (), || ()).is_allowed());
    }

    #[test]
    fn test_gated_helpers() {
        let allowed = Gated::Allowed(2);
        assert_eq!(allowed.map(|v| v * 10), Gated::Allowed(20));
        assert_eq!(allowed.allowed(), Some(2));

        let denied = Gated::Denied(3);
        assert_eq!(denied.map(|v| v + 1), Gated::Denied(4));
        assert_eq!(denied.allowed(), None);
        assert_eq!(denied.into_inner(), 3);
    }
}
