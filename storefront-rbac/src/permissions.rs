//! # Permissions
//!
//! Permission identifiers and the sets roles are granted.
//!
//! Two shapes exist, one per category:
//!
//! ```text
//! views:   <PAGE>:VIEW            e.g. "DASHBOARD:VIEW"
//! actions: <RESOURCE>:<METHOD>    e.g. "PRODUCT:REMOVE"
//! ```
//!
//! Membership is exact string equality. There are no wildcards and no
//! implied permissions.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::actions::Action;
use crate::resources::{Page, ResourceType};

/// Category a permission belongs to.
///
/// Closed on purpose: adding a category means touching every exhaustive
/// match on this enum.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PermissionCategory {
    /// Page visibility.
    Views,
    /// Operations on a resource.
    Actions,
}

impl PermissionCategory {
    /// Get the wire name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionCategory::Views => "views",
            PermissionCategory::Actions => "actions",
        }
    }

    /// Parse a category name. Unknown names yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "views" => Some(PermissionCategory::Views),
            "actions" => Some(PermissionCategory::Actions),
            _ => None,
        }
    }
}

impl fmt::Display for PermissionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Permission to see a page (`<PAGE>:VIEW`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PagePermission {
    /// The gated page.
    pub page: Page,
}

impl PagePermission {
    /// Suffix shared by every page permission.
    pub const VIEW: &'static str = "VIEW";

    /// Create a page permission.
    pub fn new(page: Page) -> Self {
        Self { page }
    }
}

impl fmt::Display for PagePermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.page.as_str(), Self::VIEW)
    }
}

/// Permission to perform a method on a resource (`<RESOURCE>:<METHOD>`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ResourcePermission {
    /// The resource type this permission applies to.
    pub resource: ResourceType,
    /// The action allowed on the resource.
    pub action: Action,
}

impl ResourcePermission {
    /// Create a resource permission.
    pub fn new(resource: ResourceType, action: Action) -> Self {
        Self { resource, action }
    }
}

impl fmt::Display for ResourcePermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource.as_str(), self.action.as_str())
    }
}

/// Any permission, tagged with its shape.
///
/// # Example
///
/// ```
/// use storefront_rbac::{Action, Page, Permission, PermissionCategory, ResourceType};
///
/// let view = Permission::view(Page::Dashboard);
/// assert_eq!(view.to_string(), "DASHBOARD:VIEW");
/// assert_eq!(view.category(), PermissionCategory::Views);
///
/// let act = Permission::action(ResourceType::Product, Action::Remove);
/// assert_eq!(act.to_string(), "PRODUCT:REMOVE");
/// assert_eq!(act.category(), PermissionCategory::Actions);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// Page visibility permission.
    View(PagePermission),
    /// Resource action permission.
    Action(ResourcePermission),
}

impl Permission {
    /// Create a page permission.
    pub fn view(page: Page) -> Self {
        Permission::View(PagePermission::new(page))
    }

    /// Create a resource permission.
    pub fn action(resource: ResourceType, action: Action) -> Self {
        Permission::Action(ResourcePermission::new(resource, action))
    }

    /// The category this permission is checked under.
    pub fn category(&self) -> PermissionCategory {
        match self {
            Permission::View(_) => PermissionCategory::Views,
            Permission::Action(_) => PermissionCategory::Actions,
        }
    }

    /// Parse a permission identifier.
    ///
    /// `<PAGE>:VIEW` becomes a page permission, `<RESOURCE>:<METHOD>` a
    /// resource permission. Anything else, including identifiers with
    /// extra segments, yields `None`.
    ///
    /// # Example
    ///
    /// ```
    /// use storefront_rbac::{Page, Permission};
    ///
    /// assert_eq!(Permission::from_string("USER:VIEW"), Some(Permission::view(Page::User)));
    /// assert_eq!(Permission::from_string("USER:VIEW:42"), None);
    /// assert_eq!(Permission::from_string("user:view"), None);
    /// ```
    pub fn from_string(s: &str) -> Option<Self> {
        let (target, verb) = s.split_once(':')?;
        if verb.contains(':') {
            return None;
        }

        if verb == PagePermission::VIEW {
            return Page::parse(target).map(Permission::view);
        }

        let resource = ResourceType::parse(target)?;
        let action = Action::parse(verb)?;
        Some(Permission::action(resource, action))
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Permission::View(p) => fmt::Display::fmt(p, f),
            Permission::Action(p) => fmt::Display::fmt(p, f),
        }
    }
}

impl From<PagePermission> for Permission {
    fn from(value: PagePermission) -> Self {
        Permission::View(value)
    }
}

impl From<ResourcePermission> for Permission {
    fn from(value: ResourcePermission) -> Self {
        Permission::Action(value)
    }
}

/// A set of permission identifiers granted within one category.
///
/// Stored as strings so that membership checks are plain string equality
/// against whatever identifier the caller passes in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet {
    permissions: HashSet<String>,
}

impl PermissionSet {
    /// Create a new empty permission set.
    pub fn new() -> Self {
        Self {
            permissions: HashSet::new(),
        }
    }

    /// Add a permission to the set.
    pub fn add(&mut self, permission: impl Into<Permission>) {
        self.permissions.insert(permission.into().to_string());
    }

    /// Add multiple permissions to the set.
    pub fn add_all<I, P>(&mut self, permissions: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<Permission>,
    {
        for perm in permissions {
            self.add(perm);
        }
    }

    /// Check whether `identifier` is in the set (exact match).
    pub fn contains(&self, identifier: &str) -> bool {
        self.permissions.contains(identifier)
    }

    /// Check whether a typed permission is in the set.
    pub fn has(&self, permission: &Permission) -> bool {
        self.contains(&permission.to_string())
    }

    /// Create from a list of permission identifiers.
    ///
    /// Identifiers that do not parse are dropped.
    ///
    /// # Example
    ///
    /// ```
    /// use storefront_rbac::PermissionSet;
    ///
    /// let set = PermissionSet::from_strings(&["HOME:VIEW", "PRODUCT:GET", "bogus"]);
    /// assert_eq!(set.len(), 2);
    /// assert!(set.contains("PRODUCT:GET"));
    /// ```
    pub fn from_strings(perms: &[&str]) -> Self {
        perms
            .iter()
            .filter_map(|p| Permission::from_string(p))
            .collect()
    }

    /// Iterate over the identifiers in the set, sorted for stable output.
    pub fn identifiers(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.permissions.iter().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Get the count of permissions.
    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = Permission>>(iter: T) -> Self {
        let mut set = PermissionSet::new();
        set.add_all(iter);
        set
    }
}
