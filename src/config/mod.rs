//! Application configuration module
//!
//! Configuration is read from environment variables with the
//! `BARBER_BOOKING` prefix, using `__` to separate nested values, e.g.
//! `BARBER_BOOKING__SERVER__PORT=8080` or
//! `BARBER_BOOKING__BUSINESS__TIMEZONE=America/Sao_Paulo`.
//!
//! # Example
//!
//! ```no_run
//! use barber_booking::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod business;
mod database;
mod error;
mod redis;
mod server;

pub use business::BusinessConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use redis::RedisConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Redis configuration (conversation store)
    pub redis: RedisConfig,

    /// Shop rules (timezone, slot grid, TTLs)
    pub business: BusinessConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads `.env` when present, then reads `BARBER_BOOKING__*` variables
    /// into the typed sections.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("BARBER_BOOKING")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.redis.validate()?;
        self.business.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("BARBER_BOOKING__DATABASE__URL", "postgresql://test@localhost/test");
        env::set_var("BARBER_BOOKING__REDIS__URL", "redis://localhost:6379");
        env::set_var("BARBER_BOOKING__BUSINESS__ACCOUNT_ID", "barbearia-centro");
    }

    fn clear_env() {
        for key in [
            "BARBER_BOOKING__DATABASE__URL",
            "BARBER_BOOKING__REDIS__URL",
            "BARBER_BOOKING__BUSINESS__ACCOUNT_ID",
            "BARBER_BOOKING__BUSINESS__TIMEZONE",
            "BARBER_BOOKING__BUSINESS__SLOT_GRANULARITY_MINUTES",
            "BARBER_BOOKING__SERVER__PORT",
            "BARBER_BOOKING__SERVER__ENVIRONMENT",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.database.url, "postgresql://test@localhost/test");
        assert_eq!(config.redis.url, "redis://localhost:6379");
        assert_eq!(config.business.account_id, "barbearia-centro");
    }

    #[test]
    fn test_validate_full_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.business.timezone, "America/Sao_Paulo");
        assert_eq!(config.business.slot_granularity_minutes, 15);
    }

    #[test]
    fn test_business_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("BARBER_BOOKING__BUSINESS__TIMEZONE", "America/Manaus");
        env::set_var("BARBER_BOOKING__BUSINESS__SLOT_GRANULARITY_MINUTES", "30");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.business.timezone, "America/Manaus");
        assert_eq!(config.business.slot_granularity_minutes, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_granularity_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("BARBER_BOOKING__BUSINESS__SLOT_GRANULARITY_MINUTES", "7");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.validate(), Err(ValidationError::InvalidGranularity(7)));
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("BARBER_BOOKING__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        assert!(result.unwrap().is_production());
    }

    #[test]
    fn test_missing_business_section_fails_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::remove_var("BARBER_BOOKING__BUSINESS__ACCOUNT_ID");
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_err());
    }
}
