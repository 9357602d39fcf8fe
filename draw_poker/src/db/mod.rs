//! PostgreSQL pool shared by [`PgSessionStore`](crate::store::PgSessionStore).
//!
//! The server opens one [`Database`] at startup, hands a clone to the session
//! store and closes it after every game actor has stopped.

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

pub mod config;

pub use config::DatabaseConfig;

/// Cloneable handle to the `poker_games` connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Open a pool sized and timed by `config`.
    ///
    /// ```no_run
    /// use draw_poker::PgSessionStore;
    /// use draw_poker::db::{Database, DatabaseConfig};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let db = Database::new(&DatabaseConfig::development()).await?;
    /// let store = PgSessionStore::new(db.clone());
    /// store.migrate().await?;
    /// // ... serve games ...
    /// db.close().await;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        log::debug!(
            "Opening game database pool ({}..={} connections)",
            config.min_connections,
            config.max_connections
        );
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
            .connect(&config.database_url)
            .await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Round-trip a trivial query; backs the store's `/health` answer.
    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Wait for checked-out connections to return, then close the pool.
    /// Every clone of this handle sees the pool as closed afterwards.
    pub async fn close(&self) {
        self.pool.close().await;
        log::info!("Game database pool closed");
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}
