//! Access token claims.

use serde::{Deserialize, Serialize};

use crate::role::Role;

/// Claims embedded in an access token.
///
/// Everything needed to build a [`Principal`](crate::Principal) is carried in
/// the token, so authentication never touches a database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID (subject claim)
    pub sub: String,
    pub email: String,
    /// Tenant the user belongs to
    pub clinic_id: String,
    pub role: Role,
    #[serde(default)]
    pub permissions: Vec<String>,
    /// Absent means active.
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
}

fn default_active() -> bool {
    true
}
