use sea_orm::ConnectOptions;
use std::time::Duration;
use tracing::log::LevelFilter;

use crate::common::RetryConfig;

#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_parse_or_default, env_required};

/// Pool and connection settings for the PostgreSQL backend
#[derive(Clone, Debug, PartialEq)]
pub struct PostgresConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    /// Extra attempts after a failed initial connection
    pub connect_retries: u32,
    /// Log every statement at debug level
    pub log_statements: bool,
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 20,
            min_connections: 2,
            connect_timeout: Duration::from_secs(8),
            acquire_timeout: Duration::from_secs(8),
            idle_timeout: Duration::from_secs(300),
            connect_retries: 3,
            log_statements: false,
        }
    }

    pub fn connect_options(&self) -> ConnectOptions {
        let mut options = ConnectOptions::new(self.url.as_str());
        options
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(self.connect_timeout)
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(self.idle_timeout)
            .sqlx_logging(self.log_statements)
            .sqlx_logging_level(LevelFilter::Debug);
        options
    }

    /// Backoff used by [`super::connect_with_retry`] for this config
    pub fn retry_policy(&self) -> RetryConfig {
        RetryConfig::default().with_max_retries(self.connect_retries)
    }
}

#[cfg(feature = "config")]
fn env_secs(key: &str, default: Duration) -> Result<Duration, ConfigError> {
    env_parse_or_default(key, default.as_secs()).map(Duration::from_secs)
}

/// - `DATABASE_URL` (required, `postgres://` or `postgresql://`)
/// - `DB_MAX_CONNECTIONS` / `DB_MIN_CONNECTIONS` (20 / 2)
/// - `DB_CONNECT_TIMEOUT_SECS` / `DB_ACQUIRE_TIMEOUT_SECS` / `DB_IDLE_TIMEOUT_SECS` (8 / 8 / 300)
/// - `DB_CONNECT_RETRIES` (3)
/// - `DB_LOG_STATEMENTS` (false)
#[cfg(feature = "config")]
impl FromEnv for PostgresConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = env_required("DATABASE_URL")?;
        if !(url.starts_with("postgres://") || url.starts_with("postgresql://")) {
            return Err(ConfigError::InvalidValue {
                key: "DATABASE_URL".to_string(),
                details: "expected a postgres:// or postgresql:// URL".to_string(),
            });
        }

        let defaults = Self::new(url);
        let config = Self {
            max_connections: env_parse_or_default("DB_MAX_CONNECTIONS", defaults.max_connections)?,
            min_connections: env_parse_or_default("DB_MIN_CONNECTIONS", defaults.min_connections)?,
            connect_timeout: env_secs("DB_CONNECT_TIMEOUT_SECS", defaults.connect_timeout)?,
            acquire_timeout: env_secs("DB_ACQUIRE_TIMEOUT_SECS", defaults.acquire_timeout)?,
            idle_timeout: env_secs("DB_IDLE_TIMEOUT_SECS", defaults.idle_timeout)?,
            connect_retries: env_parse_or_default("DB_CONNECT_RETRIES", defaults.connect_retries)?,
            log_statements: env_parse_or_default("DB_LOG_STATEMENTS", defaults.log_statements)?,
            ..defaults
        };

        if config.min_connections > config.max_connections {
            return Err(ConfigError::InvalidValue {
                key: "DB_MIN_CONNECTIONS".to_string(),
                details: format!(
                    "{} exceeds DB_MAX_CONNECTIONS ({})",
                    config.min_connections, config.max_connections
                ),
            });
        }

        Ok(config)
    }
}
