//! # Medeez Config
//!
//! Configuration types for the Medeez API, loaded from environment variables.
//!
//! - [`jwt`]: token signing and verification settings
//! - [`tenant`]: where tenant identifiers are read from on a request
//! - [`cors`]: allowed origins
//! - [`server`]: bind address
//! - [`logging`]: log level, format, file output and metrics toggle
//! - [`rate_limit`]: per-caller request quota
//!
//! # Example
//!
//! ```ignore
//! use medeez_config::{JwtConfig, TenantConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let tenant_config = TenantConfig::from_env();
//! ```

pub mod cors;
pub mod jwt;
pub mod logging;
pub mod rate_limit;
pub mod server;
pub mod tenant;

pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use rate_limit::RateLimitConfig;
pub use server::ServerConfig;
pub use tenant::TenantConfig;

/// Parse an optional environment value, falling back to `default` when the
/// variable is unset or does not parse.
pub(crate) fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|s| s.trim().parse().ok()).unwrap_or(default)
}

/// Split a comma separated value into trimmed, non-empty entries.
pub(crate) fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
pub(crate) fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: std::collections::HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}
