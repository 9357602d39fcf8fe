//! Prometheus metrics for monitoring the draw poker server.
//!
//! Metrics are recorded through the `metrics` facade and only exported when
//! [`init_metrics`] installs the Prometheus listener. Without it every call
//! here is a no-op.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use dp_server::metrics;
//! use std::net::SocketAddr;
//!
//! let addr: SocketAddr = "127.0.0.1:9090".parse().unwrap();
//! metrics::init_metrics(addr).unwrap();
//!
//! metrics::http_requests_total("POST", "/api/v1/games", 201);
//! metrics::games_created_total();
//! ```

use draw_poker::{Action, Winner};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Initialize Prometheus metrics exporter.
///
/// Metrics will be available at `http://<addr>/metrics`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))
}

// ============================================================================
// HTTP Metrics
// ============================================================================

/// Record HTTP request.
pub fn http_requests_total(method: &str, path: &str, status: u16) {
    metrics::counter!("http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record HTTP request duration in milliseconds.
pub fn http_request_duration_ms(method: &str, path: &str, duration_ms: f64) {
    metrics::histogram!("http_request_duration_ms",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration_ms);
}

// ============================================================================
// Game Metrics
// ============================================================================

pub fn games_created_total() {
    metrics::counter!("games_created_total").increment(1);
}

/// Record an accepted betting action.
pub fn bet_actions_total(action: &Action) {
    let kind = match action {
        Action::Call => "call",
        Action::Fold => "fold",
        Action::Raise(_) => "raise",
    };
    metrics::counter!("bet_actions_total", "action" => kind).increment(1);
}

/// Record an accepted draw and how many cards were replaced.
pub fn draws_total(discarded: usize) {
    metrics::counter!("draws_total").increment(1);
    metrics::histogram!("cards_discarded").record(discarded as f64);
}

/// Record a finished hand by who took it.
pub fn games_finished_total(winner: &Winner) {
    let winner_kind = if winner.is_seat() { "seat" } else { "opponent" };
    metrics::counter!("games_finished_total", "winner_kind" => winner_kind).increment(1);
}

/// Set current running game actors.
pub fn active_sessions(count: usize) {
    metrics::gauge!("active_sessions").set(count as f64);
}

/// Record final pot size.
pub fn pot_size_chips(size: u32) {
    metrics::histogram!("pot_size_chips").record(f64::from(size));
}
