//! JWT configuration.
//!
//! - `JWT_SECRET`: HMAC signing secret
//! - `JWT_ACCESS_EXPIRY`: access token lifetime in seconds (default: 3600)
//! - `JWT_ISSUER`: expected `iss` claim, unchecked when unset
//! - `JWT_AUDIENCE`: expected `aud` claim, unchecked when unset
//! - `JWT_LEEWAY`: clock skew tolerance in seconds for `exp` (default: 0)

use std::env;

use crate::parse_or;

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry: i64,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub leeway: u64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            secret: get("JWT_SECRET")
                .unwrap_or_else(|| "your-secret-key-change-in-production".to_string()),
            access_token_expiry: parse_or(get("JWT_ACCESS_EXPIRY"), 3600), // 1 hour
            issuer: get("JWT_ISSUER").filter(|s| !s.is_empty()),
            audience: get("JWT_AUDIENCE").filter(|s| !s.is_empty()),
            leeway: parse_or(get("JWT_LEEWAY"), 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vars;

    #[test]
    fn test_defaults() {
        let config = JwtConfig::from_vars(|_| None);
        assert_eq!(config.access_token_expiry, 3600);
        assert_eq!(config.leeway, 0);
        assert!(config.issuer.is_none());
        assert!(config.audience.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = JwtConfig::from_vars(vars(&[
            ("JWT_SECRET", "s3cret-s3cret-s3cret-s3cret-s3cret"),
            ("JWT_ACCESS_EXPIRY", "900"),
            ("JWT_ISSUER", "https://auth.medeez.com"),
            ("JWT_AUDIENCE", ""),
            ("JWT_LEEWAY", "30"),
        ]));
        assert_eq!(config.secret, "s3cret-s3cret-s3cret-s3cret-s3cret");
        assert_eq!(config.access_token_expiry, 900);
        assert_eq!(config.issuer.as_deref(), Some("https://auth.medeez.com"));
        assert!(config.audience.is_none());
        assert_eq!(config.leeway, 30);
    }
}
