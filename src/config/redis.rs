//! Redis settings for the shared conversation store

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    /// Namespace for conversation and greeting keys
    #[serde(default = "RedisConfig::default_key_prefix")]
    pub key_prefix: String,
    /// Bound on establishing the connection at startup
    #[serde(default = "RedisConfig::default_timeout")]
    pub timeout_secs: u64,
}

impl RedisConfig {
    fn default_key_prefix() -> String {
        "barber_booking".to_string()
    }

    fn default_timeout() -> u64 {
        5
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.trim().is_empty() {
            return Err(ValidationError::MissingRequired("REDIS_URL"));
        }
        if !(self.url.starts_with("redis://") || self.url.starts_with("rediss://")) {
            return Err(ValidationError::InvalidRedisUrl);
        }
        if self.key_prefix.trim().is_empty() {
            return Err(ValidationError::MissingRequired("REDIS_KEY_PREFIX"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::ZeroDuration("redis timeout_secs"));
        }
        Ok(())
    }
}
