//! HTTP server for single-player five-card draw.
//!
//! Wraps the [`draw_poker`] session layer in a small REST API. The binary in
//! `main.rs` wires configuration, logging, metrics and storage together.

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
