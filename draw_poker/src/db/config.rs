//! Database configuration module.

use std::{env, str::FromStr};

/// Database configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub database_url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Connection timeout in seconds
    pub connection_timeout_secs: u64,

    /// Idle connection timeout in seconds
    pub idle_timeout_secs: u64,

    /// Maximum connection lifetime in seconds
    pub max_lifetime_secs: u64,
}

impl DatabaseConfig {
    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `DATABASE_URL`: PostgreSQL connection string
    /// - `DB_MAX_CONNECTIONS`: Maximum pool size (default: 20)
    /// - `DB_MIN_CONNECTIONS`: Minimum pool size (default: 2)
    /// - `DB_CONNECTION_TIMEOUT`: Connection timeout in seconds (default: 10)
    /// - `DB_IDLE_TIMEOUT`: Idle timeout in seconds (default: 600)
    /// - `DB_MAX_LIFETIME`: Max lifetime in seconds (default: 1800)
    ///
    /// Unparseable pool settings fall back to their defaults with a warning.
    ///
    /// # Returns
    ///
    /// * `Option<DatabaseConfig>` - `None` if `DATABASE_URL` is not set
    pub fn from_env() -> Option<Self> {
        let database_url = env::var("DATABASE_URL").ok()?;
        Some(Self::with_url(database_url).with_pool_from_env())
    }

    /// Development defaults pointed at `database_url`
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Self::development()
        }
    }

    /// Create a default configuration for development
    ///
    /// Uses `postgres://postgres@localhost/draw_poker` as the database URL
    pub fn development() -> Self {
        Self {
            database_url: "postgres://postgres@localhost/draw_poker".to_string(),
            max_connections: 20,
            min_connections: 2,
            connection_timeout_secs: 10,
            idle_timeout_secs: 600,
            max_lifetime_secs: 1800,
        }
    }

    /// Override pool sizing from `DB_*` environment variables.
    pub fn with_pool_from_env(self) -> Self {
        Self {
            max_connections: env_or("DB_MAX_CONNECTIONS", self.max_connections),
            min_connections: env_or("DB_MIN_CONNECTIONS", self.min_connections),
            connection_timeout_secs: env_or("DB_CONNECTION_TIMEOUT", self.connection_timeout_secs),
            idle_timeout_secs: env_or("DB_IDLE_TIMEOUT", self.idle_timeout_secs),
            max_lifetime_secs: env_or("DB_MAX_LIFETIME", self.max_lifetime_secs),
            ..self
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::development()
    }
}

fn env_or<T: FromStr + Copy + std::fmt::Display>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            log::warn!("{name}={raw:?} is not valid, using {default}");
            default
        }),
        Err(_) => default,
    }
}
