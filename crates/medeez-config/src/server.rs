use std::env;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub addr: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            addr: get("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
        }
    }
}
