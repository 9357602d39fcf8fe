//! HTTP API for the draw poker server.
//!
//! # Endpoints Overview
//!
//! ```text
//! GET  /health                          - Store health and live game actors
//! POST /api/v1/games                    - Deal a new game (201)
//! GET  /api/v1/games/{game_id}          - Current game view
//! POST /api/v1/games/{game_id}/bet      - Call, raise or fold
//! POST /api/v1/games/{game_id}/draw     - Discard and replace cards
//! ```
//!
//! Every response carries an `x-request-id` header. Errors are returned as
//! `{"error": "<message>"}`.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use dp_server::api::{AppState, create_router};
//! use draw_poker::{GameEngine, GameManager, InMemorySessionStore, SessionConfig};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = GameManager::new(
//!     Arc::new(InMemorySessionStore::new()),
//!     GameEngine::default(),
//!     SessionConfig::default(),
//! );
//! let app = create_router(AppState {
//!     game_manager: Arc::new(manager),
//! });
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # CORS
//!
//! CORS is configured permissively. Put the server behind a proxy that
//! restricts origins in production.

pub mod error;
pub mod games;
pub mod request_id;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use draw_poker::GameManager;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Application state shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub game_manager: Arc<GameManager>,
}

/// Create the complete API router with all endpoints and middleware.
pub fn create_router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/games", post(games::create_game))
        .route("/games/{game_id}", get(games::get_game))
        .route("/games/{game_id}/bet", post(games::place_bet))
        .route("/games/{game_id}/draw", post(games::draw_cards));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", v1_routes)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint for monitoring and load balancers.
///
/// Returns `200 OK` when the session store answers, `503 Service Unavailable`
/// otherwise.
///
/// ```bash
/// curl http://localhost:8000/health
/// # {"status":"healthy","store":true,"sessions":{"active_count":2},...}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let store_healthy = match state.game_manager.store().health_check().await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(error = %e, "Session store health check failed");
            false
        }
    };

    let active_count = state.game_manager.active_session_count().await;
    crate::metrics::active_sessions(active_count);

    let status_code = if store_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = json!({
        "status": if store_healthy { "healthy" } else { "unhealthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "store": store_healthy,
        "sessions": {
            "active_count": active_count
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status_code, Json(response))
}
