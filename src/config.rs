//! Application configuration management.
//!
//! Provides typed configuration loaded from environment variables with validation.

use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL database connection URL
    pub database_url: String,

    /// Database connection pool settings
    pub pool: PoolConfig,
}

/// Database connection pool configuration.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Maximum number of connections in the pool
    pub max_size: u32,

    /// Minimum number of idle connections to maintain
    pub min_idle: u32,

    /// Idle timeout for connections
    pub idle_timeout: Duration,

    /// Connection acquisition timeout
    pub connection_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_size: 10,
            min_idle: 1,
            idle_timeout: Duration::from_secs(60 * 2), // 2 minutes
            connection_timeout: Duration::from_secs(30),
        }
    }
}

/// Configuration loading error.
#[derive(Debug)]
pub struct ConfigError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Configuration error for '{}': {}",
            self.field, self.message
        )
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `DATABASE_URL`: PostgreSQL connection string
    ///
    /// Optional environment variables:
    /// - `POOL_MAX_SIZE`: Max pool connections (default: 10)
    /// - `POOL_MIN_IDLE`: Min idle connections (default: 1)
    /// - `POOL_TIMEOUT_SECS`: Connection acquire timeout in seconds (default: 30)
    /// - `POOL_IDLE_TIMEOUT_SECS`: Idle connection lifetime in seconds (default: 120)
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = std::env::var("DATABASE_URL").map_err(|_| ConfigError {
            field: "DATABASE_URL".to_string(),
            message: "Required environment variable not set".to_string(),
        })?;

        let pool = PoolConfig {
            max_size: parse_env_or("POOL_MAX_SIZE", 10)?,
            min_idle: parse_env_or("POOL_MIN_IDLE", 1)?,
            connection_timeout: Duration::from_secs(parse_env_or("POOL_TIMEOUT_SECS", 30)?),
            idle_timeout: Duration::from_secs(parse_env_or("POOL_IDLE_TIMEOUT_SECS", 120)?),
        };

        let config = Self {
            database_url,
            pool,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.is_empty() {
            return Err(ConfigError {
                field: "DATABASE_URL".to_string(),
                message: "Cannot be empty".to_string(),
            });
        }

        if !self.database_url.starts_with("postgres://")
            && !self.database_url.starts_with("postgresql://")
        {
            return Err(ConfigError {
                field: "DATABASE_URL".to_string(),
                message: "Must start with postgres:// or postgresql://".to_string(),
            });
        }

        if self.pool.max_size == 0 {
            return Err(ConfigError {
                field: "POOL_MAX_SIZE".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }

        if self.pool.min_idle > self.pool.max_size {
            return Err(ConfigError {
                field: "POOL_MIN_IDLE".to_string(),
                message: "Cannot be greater than POOL_MAX_SIZE".to_string(),
            });
        }

        Ok(())
    }
}

/// Parse an environment variable or return a default value.
fn parse_env_or<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(val) => val.parse().map_err(|_| ConfigError {
            field: name.to_string(),
            message: format!("Invalid value '{}', expected a valid number", val),
        }),
        Err(_) => Ok(default),
    }
}
