//! Rate limiting configuration.
//!
//! Requests are counted per caller (user id when authenticated, otherwise the
//! peer address) with a token bucket from the `governor` crate.
//!
//! - `RATE_LIMIT_ENABLED` (default: true)
//! - `RATE_LIMIT_MAX_REQUESTS`: bucket size (default: 1000)
//! - `RATE_LIMIT_WINDOW_SECS`: time to refill the whole bucket (default: 900)
//!
//! # Example
//!
//! ```ignore
//! use medeez_config::RateLimitConfig;
//!
//! let quota = RateLimitConfig::from_env().quota();
//! ```

use std::env;
use std::num::NonZeroU32;
use std::time::Duration;

use governor::Quota;

use crate::parse_or;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub enabled: bool,
    /// Requests allowed in one burst.
    pub max_requests: u32,
    /// Seconds for a drained bucket to refill completely.
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: 1000,
            window_secs: 15 * 60,
        }
    }
}

impl RateLimitConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            enabled: parse_or(get("RATE_LIMIT_ENABLED"), defaults.enabled),
            max_requests: parse_or(get("RATE_LIMIT_MAX_REQUESTS"), defaults.max_requests),
            window_secs: parse_or(get("RATE_LIMIT_WINDOW_SECS"), defaults.window_secs),
        }
    }

    /// Token bucket for this configuration.
    ///
    /// `None` when limiting is disabled or the values cannot form a quota
    /// (zero requests or a zero window).
    pub fn quota(&self) -> Option<Quota> {
        if !self.enabled {
            return None;
        }

        let burst = NonZeroU32::new(self.max_requests)?;
        let period = Duration::from_secs(self.window_secs) / burst.get();
        Quota::with_period(period).map(|quota| quota.allow_burst(burst))
    }

    /// Seconds a rejected caller is told to wait.
    pub fn retry_after_secs(&self) -> u64 {
        self.window_secs.max(1)
    }
}
