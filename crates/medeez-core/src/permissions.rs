//! Permission constants and the permission set carried by a principal.
//!
//! Permissions are named grants of the form `resource:action`. They are
//! checked independently of role: a route that needs `patients:write` asks the
//! principal's [`PermissionSet`], never the role name.
//!
//! # Example
//!
//! ```ignore
//! use medeez_core::permissions::{self, PermissionSet};
//!
//! let granted = PermissionSet::from_iter(["patients:read", "notes:read"]);
//! assert!(granted.contains(permissions::PATIENTS_READ));
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

// =============================================================================
// Patients
// =============================================================================

pub const PATIENTS_READ: &str = "patients:read";
pub const PATIENTS_WRITE: &str = "patients:write";

// =============================================================================
// Appointments
// =============================================================================

pub const APPOINTMENTS_READ: &str = "appointments:read";
pub const APPOINTMENTS_WRITE: &str = "appointments:write";

// =============================================================================
// Clinical notes
// =============================================================================

pub const NOTES_READ: &str = "notes:read";
pub const NOTES_WRITE: &str = "notes:write";

// =============================================================================
// Invoices
// =============================================================================

pub const INVOICES_READ: &str = "invoices:read";
pub const INVOICES_WRITE: &str = "invoices:write";

// =============================================================================
// Dashboard and analytics
// =============================================================================

pub const DASHBOARD_READ: &str = "dashboard:read";
pub const ANALYTICS_READ: &str = "analytics:read";
pub const ANALYTICS_EXPORT: &str = "analytics:export";

// =============================================================================
// Settings and administration
// =============================================================================

pub const SETTINGS_READ: &str = "settings:read";
pub const SETTINGS_WRITE: &str = "settings:write";
pub const CLINIC_UPDATE: &str = "clinic:update";
pub const ADMIN_ACCESS: &str = "admin:access";
pub const SYSTEM_MANAGE: &str = "system:manage";

/// Set of permission names granted to a principal.
///
/// Ordered so that serialized output and log lines are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<String>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, permission: &str) -> bool {
        self.0.contains(permission)
    }

    pub fn contains_any(&self, permissions: &[&str]) -> bool {
        permissions.iter().any(|p| self.contains(p))
    }

    pub fn contains_all(&self, permissions: &[&str]) -> bool {
        permissions.iter().all(|p| self.contains(p))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl From<Vec<String>> for PermissionSet {
    fn from(permissions: Vec<String>) -> Self {
        permissions.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains() {
        let set = PermissionSet::from_iter([PATIENTS_READ, PATIENTS_WRITE]);

        assert!(set.contains("patients:read"));
        assert!(set.contains("patients:write"));
        assert!(!set.contains("admin:write"));
    }

    #[test]
    fn test_contains_is_exact_match() {
        let set = PermissionSet::from_iter(["patients:*"]);

        assert!(!set.contains(PATIENTS_READ));
        assert!(!set.contains("patients"));
    }

    #[test]
    fn test_contains_any_and_all() {
        let set = PermissionSet::from_iter([NOTES_READ]);

        assert!(set.contains_any(&[NOTES_READ, NOTES_WRITE]));
        assert!(!set.contains_any(&[INVOICES_READ, INVOICES_WRITE]));
        assert!(set.contains_all(&[NOTES_READ]));
        assert!(!set.contains_all(&[NOTES_READ, NOTES_WRITE]));
        assert!(set.contains_all(&[]));
    }

    #[test]
    fn test_duplicates_collapse() {
        let set: PermissionSet = vec![
            "notes:read".to_string(),
            "notes:read".to_string(),
            "notes:write".to_string(),
        ]
        .into();

        assert_eq!(set.len(), 2);
        assert_eq!(set.to_vec(), vec!["notes:read", "notes:write"]);
    }

    #[test]
    fn test_serde_as_plain_array() {
        let set = PermissionSet::from_iter([INVOICES_WRITE, APPOINTMENTS_READ]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["appointments:read","invoices:write"]"#);

        let back: PermissionSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}
