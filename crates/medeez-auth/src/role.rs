//! Roles and the capabilities they carry.
//!
//! Authorization decisions that depend on *who* the principal is go through
//! [`Capability`], never through role-name comparison. Adding a role means
//! deciding its capability list here and nowhere else.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Staff,
    Doctor,
    Admin,
    SystemAdmin,
}

/// Privileges that are tied to a role rather than granted as a permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Manage users and settings of the principal's own clinic.
    ClinicAdmin,
    /// Act on behalf of another clinic through the explicit override flow.
    CrossTenantAccess,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ClinicAdmin => "clinic_admin",
            Capability::CrossTenantAccess => "cross_tenant_access",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Staff, Role::Doctor, Role::Admin, Role::SystemAdmin];

    pub fn capabilities(&self) -> &'static [Capability] {
        match self {
            Role::Staff | Role::Doctor => &[],
            Role::Admin => &[Capability::ClinicAdmin],
            Role::SystemAdmin => &[Capability::ClinicAdmin, Capability::CrossTenantAccess],
        }
    }

    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Staff => "staff",
            Role::Doctor => "doctor",
            Role::Admin => "admin",
            Role::SystemAdmin => "system_admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("invalid role: {}", s))
    }
}
