//! PostgreSQL connection settings

use serde::Deserialize;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

use super::error::ValidationError;

const MAX_POOL_SIZE: u32 = 100;

/// Appointments, clients and the catalog live in one database.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "DatabaseConfig::default_min")]
    pub min_connections: u32,
    #[serde(default = "DatabaseConfig::default_max")]
    pub max_connections: u32,
    #[serde(default = "DatabaseConfig::default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    /// Apply `migrations/` before serving
    #[serde(default = "DatabaseConfig::default_run_migrations")]
    pub run_migrations: bool,
}

impl DatabaseConfig {
    fn default_min() -> u32 {
        2
    }

    fn default_max() -> u32 {
        10
    }

    fn default_acquire_timeout() -> u64 {
        10
    }

    fn default_run_migrations() -> bool {
        true
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// Pool options carrying the configured sizes and acquire timeout.
    pub fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .min_connections(self.min_connections)
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.trim().is_empty() {
            return Err(ValidationError::MissingRequired("DATABASE_URL"));
        }
        let scheme_ok = ["postgres://", "postgresql://"]
            .iter()
            .any(|scheme| self.url.starts_with(scheme));
        if !scheme_ok {
            return Err(ValidationError::InvalidDatabaseUrl);
        }
        if self.max_connections > MAX_POOL_SIZE {
            return Err(ValidationError::PoolSizeTooLarge);
        }
        if self.max_connections == 0 || self.min_connections > self.max_connections {
            return Err(ValidationError::InvalidPoolSize);
        }
        if self.acquire_timeout_secs == 0 {
            return Err(ValidationError::ZeroDuration("acquire_timeout_secs"));
        }
        Ok(())
    }
}
