//! Tenant isolation configuration.
//!
//! Controls where tenant (clinic) identifiers are looked for on an incoming
//! request. Header names are stored lowercase.
//!
//! - `TENANT_HEADER` (default: `x-clinic-id`)
//! - `TENANT_TARGET_HEADER` (default: `x-target-clinic-id`)
//! - `TENANT_PATH_PARAMS` (default: `clinicId,clinic_id`)
//! - `TENANT_BODY_FIELD` (default: `clinicId`)
//! - `TENANT_QUERY_PARAM` (default: `clinicId`)
//! - `TENANT_MAX_BODY_BYTES` (default: 1 MiB)

use std::env;

use crate::{parse_or, split_list};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TenantConfig {
    pub header: String,
    pub target_header: String,
    pub path_params: Vec<String>,
    pub body_field: String,
    pub query_param: String,
    pub max_body_bytes: usize,
}

impl TenantConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Self {
        let path_params = get("TENANT_PATH_PARAMS")
            .map(|v| split_list(&v))
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| vec!["clinicId".to_string(), "clinic_id".to_string()]);

        Self {
            header: get("TENANT_HEADER")
                .unwrap_or_else(|| "x-clinic-id".to_string())
                .to_ascii_lowercase(),
            target_header: get("TENANT_TARGET_HEADER")
                .unwrap_or_else(|| "x-target-clinic-id".to_string())
                .to_ascii_lowercase(),
            path_params,
            body_field: get("TENANT_BODY_FIELD").unwrap_or_else(|| "clinicId".to_string()),
            query_param: get("TENANT_QUERY_PARAM").unwrap_or_else(|| "clinicId".to_string()),
            max_body_bytes: parse_or(get("TENANT_MAX_BODY_BYTES"), 1024 * 1024),
        }
    }
}

impl Default for TenantConfig {
    fn default() -> Self {
        Self::from_vars(|_| None)
    }
}
