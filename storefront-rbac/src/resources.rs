//! # Pages and Resources
//!
//! The two things a permission can point at: a page of the admin client
//! (gated by `views`) or a backend resource (gated by `actions`).

use serde::{Deserialize, Serialize};

/// Pages whose visibility is access controlled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Page {
    /// Storefront landing page.
    Home,
    /// Admin dashboard.
    Dashboard,
    /// User management page.
    User,
}

impl Page {
    /// Get the page name used in permission identifiers.
    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Home => "HOME",
            Page::Dashboard => "DASHBOARD",
            Page::User => "USER",
        }
    }

    /// Parse a page from its name (exact match).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "HOME" => Some(Page::Home),
            "DASHBOARD" => Some(Page::Dashboard),
            "USER" => Some(Page::User),
            _ => None,
        }
    }

    /// Get all pages.
    pub fn all() -> Vec<Self> {
        vec![Page::Home, Page::Dashboard, Page::User]
    }
}

/// Resource types that actions can be performed on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResourceType {
    /// Catalogue products.
    Product,
    /// User accounts.
    User,
}

impl ResourceType {
    /// Get the resource name used in permission identifiers.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Product => "PRODUCT",
            ResourceType::User => "USER",
        }
    }

    /// Parse a resource type from its name (exact match).
    ///
    /// # Example
    ///
    /// ```
    /// use storefront_rbac::resources::ResourceType;
    ///
    /// assert_eq!(ResourceType::parse("PRODUCT"), Some(ResourceType::Product));
    /// assert_eq!(ResourceType::parse("products"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PRODUCT" => Some(ResourceType::Product),
            "USER" => Some(ResourceType::User),
            _ => None,
        }
    }

    /// Get all resource types.
    pub fn all() -> Vec<Self> {
        vec![ResourceType::Product, ResourceType::User]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_parsing() {
        assert_eq!(Page::parse("HOME"), Some(Page::Home));
        assert_eq!(Page::parse("DASHBOARD"), Some(Page::Dashboard));
        assert_eq!(Page::parse("USER"), Some(Page::User));
        assert_eq!(Page::parse("Home"), None);
        assert_eq!(Page::parse("CART"), None);
    }

    #[test]
    fn test_resource_type_parsing() {
        assert_eq!(ResourceType::parse("PRODUCT"), Some(ResourceType::Product));
        assert_eq!(ResourceType::parse("USER"), Some(ResourceType::User));
        assert_eq!(ResourceType::parse("ORDER"), None);
    }

    #[test]
    fn test_counts() {
        assert_eq!(Page::all().len(), 3);
        assert_eq!(ResourceType::all().len(), 2);
    }
}
