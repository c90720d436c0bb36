//! Logging and metrics configuration.
//!
//! - `LOG_LEVEL`: default level for the application crates (default: `info`)
//! - `LOG_FORMAT`: `compact` or `json` console output (default: `compact`)
//! - `LOG_DIR`: when set, also write daily-rolling JSON logs to this directory
//! - `METRICS_ENABLED`: `false`/`0` disables the Prometheus recorder

use std::env;
use std::str::FromStr;

use crate::parse_or;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "compact" | "pretty" | "text" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format: {}", other)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    pub dir: Option<String>,
    pub metrics_enabled: bool,
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            format: parse_or(get("LOG_FORMAT"), LogFormat::Compact),
            dir: get("LOG_DIR").filter(|s| !s.is_empty()),
            metrics_enabled: get("METRICS_ENABLED")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true),
        }
    }
}
