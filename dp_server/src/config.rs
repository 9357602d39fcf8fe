//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use draw_poker::{GameSettings, SessionConfig, db::DatabaseConfig};
use std::{fmt, net::SocketAddr, str::FromStr, time::Duration};

/// Default HTTP bind address
const DEFAULT_BIND: SocketAddr = SocketAddr::new(
    std::net::IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
    8000,
);

/// Where sessions are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Postgres,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            other => Err(format!("unknown store backend '{other}' (use memory or postgres)")),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Memory => write!(f, "memory"),
            StoreBackend::Postgres => write!(f, "postgres"),
        }
    }
}

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Session storage backend
    pub store: StoreBackend,
    /// Database configuration (required for the postgres backend)
    pub database: Option<DatabaseConfig>,
    /// Prometheus exporter address; metrics are not exported when unset
    pub metrics_bind: Option<SocketAddr>,
    /// Settings for newly dealt games
    pub game: GameSettings,
    /// Game actor settings
    pub session: SessionConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `bind_override` - Optional bind address override (from CLI args)
    /// * `database_url_override` - Optional database URL override (from CLI args)
    /// * `store_override` - Optional storage backend override (from CLI args)
    ///
    /// # Returns
    ///
    /// * `Result<ServerConfig, ConfigError>` - Loaded configuration or error
    ///
    /// # Errors
    ///
    /// Returns error if required variables are missing or invalid
    pub fn from_env(
        bind_override: Option<SocketAddr>,
        database_url_override: Option<String>,
        store_override: Option<StoreBackend>,
    ) -> Result<Self, ConfigError> {
        let bind = match bind_override {
            Some(bind) => bind,
            None => parse_env_opt("SERVER_BIND")?.unwrap_or(DEFAULT_BIND),
        };

        let database = database_url_override
            .or_else(|| std::env::var("DATABASE_URL").ok())
            .map(|url| DatabaseConfig::with_url(url).with_pool_from_env());

        // Postgres whenever a database is configured, unless told otherwise
        let store = match store_override {
            Some(store) => store,
            None => parse_env_opt("STORE_BACKEND")?.unwrap_or(if database.is_some() {
                StoreBackend::Postgres
            } else {
                StoreBackend::Memory
            }),
        };

        if store == StoreBackend::Postgres && database.is_none() {
            return Err(ConfigError::MissingRequired {
                var: "DATABASE_URL".to_string(),
                hint: "Set DATABASE_URL or pass --db-url, or use STORE_BACKEND=memory".to_string(),
            });
        }

        let metrics_bind = parse_env_opt("METRICS_BIND")?;

        let defaults = GameSettings::default();
        let game = GameSettings {
            starting_chips: parse_env_or("STARTING_CHIPS", defaults.starting_chips),
            ante: parse_env_or("TABLE_ANTE", defaults.ante),
            opponent_min_chips: parse_env_or("OPPONENT_MIN_CHIPS", defaults.opponent_min_chips),
            opponent_max_chips: parse_env_or("OPPONENT_MAX_CHIPS", defaults.opponent_max_chips),
            ..defaults
        };

        let session_defaults = SessionConfig::default();
        let session = SessionConfig {
            inbox_capacity: parse_env_or("SESSION_INBOX_CAPACITY", session_defaults.inbox_capacity),
            idle_timeout: Duration::from_secs(parse_env_or(
                "SESSION_IDLE_TIMEOUT_SECS",
                session_defaults.idle_timeout.as_secs(),
            )),
        };

        Ok(ServerConfig {
            bind,
            store,
            database,
            metrics_bind,
            game,
            session,
        })
    }

    /// Validate configuration after loading
    ///
    /// # Returns
    ///
    /// * `Result<(), ConfigError>` - Success or validation error
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.game.validate().map_err(|reason| ConfigError::Invalid {
            var: "game settings".to_string(),
            reason,
        })?;

        self.session
            .validate()
            .map_err(|reason| ConfigError::Invalid {
                var: "session settings".to_string(),
                reason,
            })?;

        if let Some(database) = self
            .database
            .as_ref()
            .filter(|db| db.min_connections > db.max_connections)
        {
            return Err(ConfigError::Invalid {
                var: "DB_MIN_CONNECTIONS".to_string(),
                reason: format!(
                    "Must not exceed DB_MAX_CONNECTIONS ({})",
                    database.max_connections
                ),
            });
        }

        if self.metrics_bind == Some(self.bind) {
            return Err(ConfigError::Invalid {
                var: "METRICS_BIND".to_string(),
                reason: "Must differ from the server bind address".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Helper to parse an optional environment variable; a set but unparseable
/// value is an error rather than silently ignored
fn parse_env_opt<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw.parse().map(Some).map_err(|e| ConfigError::Invalid {
            var: key.to_string(),
            reason: format!("'{raw}': {e}"),
        }),
        Err(_) => Ok(None),
    }
}
