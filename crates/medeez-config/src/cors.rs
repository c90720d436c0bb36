use std::env;

use crate::split_list;

const DEFAULT_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

#[derive(Clone, Debug)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Self {
        let origins = get("ALLOWED_ORIGINS").unwrap_or_else(|| DEFAULT_ORIGINS.to_string());

        Self {
            allowed_origins: split_list(&origins),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self::from_vars(|_| None)
    }
}
