//! Single-player five-card draw server.
//!
//! Each live game runs in its own actor managed by `GameManager`; game state
//! is kept in memory or in PostgreSQL.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Error;
use dp_server::{
    api,
    config::{ServerConfig, StoreBackend},
    logging, metrics,
};
use draw_poker::{
    GameEngine, GameManager, InMemorySessionStore, PgSessionStore, SessionStore,
    db::Database,
    game::RandomResolver,
};
use pico_args::Arguments;
use tracing::info;

const HELP: &str = "\
Run a single-player five-card draw server

USAGE:
  dp_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:8000]
  --db-url     URL         Database connection string  [default: env DATABASE_URL]
  --store      BACKEND     memory or postgres          [default: postgres when a database URL is set]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND                  Server bind address (e.g., 0.0.0.0:8080)
  DATABASE_URL                 PostgreSQL connection string
  STORE_BACKEND                memory or postgres
  METRICS_BIND                 Prometheus exporter address (disabled when unset)
  STARTING_CHIPS               Chips dealt to the player [default: 1000]
  TABLE_ANTE                   Table minimum bet [default: 10]
  OPPONENT_MIN_CHIPS           Lowest opponent stack [default: 800]
  OPPONENT_MAX_CHIPS           Highest opponent stack [default: 1200]
  SESSION_INBOX_CAPACITY       Queued requests per game [default: 100]
  SESSION_IDLE_TIMEOUT_SECS    Idle seconds before a game actor stops [default: 300]
  DB_MAX_CONNECTIONS, DB_MIN_CONNECTIONS, DB_CONNECTION_TIMEOUT_SECS,
  DB_IDLE_TIMEOUT_SECS, DB_MAX_LIFETIME_SECS
  RUST_LOG                     Log filter [default: info,sqlx=warn,hyper=warn]
";

struct Args {
    bind: Option<SocketAddr>,
    database_url: Option<String>,
    store: Option<StoreBackend>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(());
    }

    let args = Args {
        bind: pargs.opt_value_from_str("--bind")?,
        database_url: pargs.opt_value_from_str("--db-url")?,
        store: pargs.opt_value_from_str("--store")?,
    };

    let config = ServerConfig::from_env(args.bind, args.database_url, args.store)?;
    config.validate()?;

    logging::init();
    info!(
        "Starting draw poker server at {} with {} store",
        config.bind, config.store
    );

    if let Some(metrics_bind) = config.metrics_bind {
        metrics::init_metrics(metrics_bind).map_err(|e| anyhow::anyhow!(e))?;
        info!("Prometheus metrics exported at http://{}/metrics", metrics_bind);
    }

    let mut database = None;
    let store: Arc<dyn SessionStore> = match (config.store, &config.database) {
        (StoreBackend::Postgres, Some(db_config)) => {
            let db = Database::new(db_config)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;
            info!("Database connected successfully");

            let store = PgSessionStore::new(db.clone());
            store
                .migrate()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to apply migrations: {}", e))?;
            database = Some(db);
            Arc::new(store)
        }
        (StoreBackend::Postgres, None) => {
            return Err(anyhow::anyhow!("postgres store selected without DATABASE_URL"));
        }
        (StoreBackend::Memory, _) => {
            info!("Games are kept in memory and lost on restart");
            Arc::new(InMemorySessionStore::new())
        }
    };

    let engine = GameEngine::new(config.game.clone(), Arc::new(RandomResolver));
    let game_manager = Arc::new(GameManager::new(store, engine, config.session));

    let app = api::create_router(api::AppState {
        game_manager: game_manager.clone(),
    });

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", config.bind, e))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    info!("Shutting down server...");
    game_manager.shutdown().await;
    if let Some(db) = database {
        db.close().await;
    }

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
