//! # Storefront RBAC (Role-Based Access Control)
//!
//! Access control for the storefront admin client: which pages a role may
//! see and which operations it may perform on which resources.
//!
//! ## Overview
//!
//! - **Roles**: `ADMIN`, `USER`, and the synthetic `GUEST`
//! - **Permissions**: `<PAGE>:VIEW` (views) and `<RESOURCE>:<METHOD>` (actions)
//! - **Registry**: immutable role-to-policy table
//! - **Evaluator**: pure, fail-closed allow/deny checks
//! - **Gate**: picks an allowed or denied branch for the current role
//!
//! ## Architecture
//!
//! ```text
//! RolePolicy = { views: PermissionSet, actions: PermissionSet }
//!
//! Examples:
//!   "DASHBOARD:VIEW"   - see the admin dashboard
//!   "PRODUCT:REMOVE"   - delete a product
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use storefront_rbac::{AccessGate, PermissionCategory, PolicyEvaluator, Role, RoleRegistry};
//!
//! let registry = RoleRegistry::storefront();
//! let eval = PolicyEvaluator::new(&registry);
//!
//! assert!(eval.evaluate(Role::Admin, "PRODUCT:REMOVE", PermissionCategory::Actions));
//! assert!(!eval.evaluate(Role::User, "PRODUCT:REMOVE", PermissionCategory::Actions));
//!
//! let role = Role::Admin;
//! let gate = AccessGate::new(&role, &registry);
//! let view = gate.render("DASHBOARD:VIEW", PermissionCategory::Views, || "dashboard", || "denied");
//! assert!(view.is_allowed());
//! ```
//!
//! ## Fail-closed
//!
//! Unknown roles, unknown categories, missing registry entries and empty
//! permission sets all evaluate to deny. Nothing in this crate returns an
//! error for an access check.

pub mod actions;
pub mod evaluator;
pub mod gate;
pub mod permissions;
pub mod registry;
pub mod resources;
pub mod roles;

pub use actions::Action;
pub use evaluator::{evaluate, Decision, DenyReason, PolicyEvaluator};
pub use gate::{AccessGate, Gated, RoleSource};
pub use permissions::{PagePermission, Permission, PermissionCategory, PermissionSet, ResourcePermission};
pub use registry::{RolePolicy, RoleRegistry, RoleRegistryBuilder};
pub use resources::{Page, ResourceType};
pub use roles::Role;
