//! The authenticated actor attached to a request.

use medeez_core::PermissionSet;
use serde::Serialize;

use crate::claims::Claims;
use crate::clinic_id::{ClinicId, ClinicIdError};
use crate::role::{Capability, Role};

/// Read-only view of the authenticated user, rebuilt from verified claims on
/// every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub user_id: String,
    pub email: String,
    pub clinic_id: ClinicId,
    pub role: Role,
    pub permissions: PermissionSet,
    pub is_active: bool,
}

impl Principal {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    pub fn has_capability(&self, capability: Capability) -> bool {
        self.role.has_capability(capability)
    }
}

impl TryFrom<Claims> for Principal {
    type Error = ClinicIdError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        Ok(Self {
            clinic_id: ClinicId::new(claims.clinic_id)?,
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
            permissions: claims.permissions.into(),
            is_active: claims.is_active,
        })
    }
}
