//! # Actions
//!
//! Methods a caller can invoke on a storefront resource.

use serde::{Deserialize, Serialize};

/// Operations that can be performed on resources.
///
/// There is no hierarchy between actions: `Edit` does not imply `Get`,
/// and `Remove` does not imply anything.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    /// Fetch/list the resource.
    Get,

    /// Create a new instance.
    Add,

    /// Modify an existing instance.
    Edit,

    /// Delete an instance.
    Remove,
}

impl Action {
    /// Get the method name used in permission identifiers.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Get => "GET",
            Action::Add => "ADD",
            Action::Edit => "EDIT",
            Action::Remove => "REMOVE",
        }
    }

    /// Parse an action from its method name.
    ///
    /// Exact match only; aliases are not accepted because permission
    /// identifiers are compared as strings.
    ///
    /// # Example
    ///
    /// ```
    /// use storefront_rbac::actions::Action;
    ///
    /// assert_eq!(Action::parse("REMOVE"), Some(Action::Remove));
    /// assert_eq!(Action::parse("delete"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Action::Get),
            "ADD" => Some(Action::Add),
            "EDIT" => Some(Action::Edit),
            "REMOVE" => Some(Action::Remove),
            _ => None,
        }
    }

    /// Get all actions.
    pub fn all() -> Vec<Self> {
        vec![Action::Get, Action::Add, Action::Edit, Action::Remove]
    }

    /// Check if this action changes data.
    pub fn is_write(&self) -> bool {
        matches!(self, Action::Add | Action::Edit | Action::Remove)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parsing() {
        assert_eq!(Action::parse("GET"), Some(Action::Get));
        assert_eq!(Action::parse("ADD"), Some(Action::Add));
        assert_eq!(Action::parse("EDIT"), Some(Action::Edit));
        assert_eq!(Action::parse("REMOVE"), Some(Action::Remove));

        assert_eq!(Action::parse("get"), None);
        assert_eq!(Action::parse("VIEW"), None);
        assert_eq!(Action::parse("DELETE"), None);
    }

    #[test]
    fn test_action_as_str_round_trips() {
        for action in Action::all() {
            assert_eq!(Action::parse(action.as_str()), Some(action));
        }
    }

    #[test]
    fn test_is_write() {
        assert!(!Action::Get.is_write());
        assert!(Action::Add.is_write());
        assert!(Action::Edit.is_write());
        assert!(Action::Remove.is_write());
    }
}
