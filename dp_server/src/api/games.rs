//! Game API handlers.
//!
//! Request bodies are checked for shape here; game rules (phase, chips,
//! index ranges against the actual hand) are enforced by the engine.
//!
//! # Examples
//!
//! Deal a game:
//! ```bash
//! curl -X POST http://localhost:8000/api/v1/games
//! ```
//!
//! Raise, then draw:
//! ```bash
//! curl -X POST http://localhost:8000/api/v1/games/<id>/bet \
//!   -H "Content-Type: application/json" \
//!   -d '{"action": "raise", "amount": 50}'
//! curl -X POST http://localhost:8000/api/v1/games/<id>/draw \
//!   -H "Content-Type: application/json" \
//!   -d '{"discardIndices": [0, 3]}'
//! ```

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use draw_poker::{Action, GameView, HAND_SIZE, Session};
use serde::Deserialize;
use std::collections::HashSet;
use uuid::Uuid;

use super::AppState;
use super::error::ApiError;
use super::request_id::RequestId;
use crate::metrics;

#[derive(Debug, Deserialize)]
pub struct BetRequest {
    pub action: String,
    pub amount: Option<i64>,
}

impl BetRequest {
    /// Turn the raw body into an engine action.
    pub fn into_action(self) -> Result<Action, ApiError> {
        if let Some(amount) = self.amount.filter(|amount| *amount < 1) {
            return Err(ApiError::bad_request(format!(
                "amount must be at least 1, got {amount}"
            )));
        }

        match self.action.as_str() {
            "call" => Ok(Action::Call),
            "fold" => Ok(Action::Fold),
            "raise" => match self.amount {
                Some(amount) => Ok(Action::Raise(Some(amount))),
                None => Err(ApiError::bad_request("raise requires an amount")),
            },
            other => Err(ApiError::bad_request(format!(
                "unknown action '{other}' (expected call, raise or fold)"
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DrawRequest {
    #[serde(rename = "discardIndices")]
    pub discard_indices: Vec<i64>,
}

impl DrawRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.discard_indices.len() > HAND_SIZE {
            return Err(ApiError::bad_request(format!(
                "at most {HAND_SIZE} cards can be discarded"
            )));
        }

        let mut seen = HashSet::new();
        for &index in &self.discard_indices {
            if !(0..HAND_SIZE as i64).contains(&index) {
                return Err(ApiError::bad_request(format!(
                    "discard index {index} is outside 0..={}",
                    HAND_SIZE - 1
                )));
            }
            if !seen.insert(index) {
                return Err(ApiError::bad_request(format!(
                    "discard index {index} listed more than once"
                )));
            }
        }

        Ok(())
    }
}

fn parse_game_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request(format!("invalid game id '{raw}'")))
}

fn record_finish(session: &Session) {
    if let Some(winner) = &session.winner {
        metrics::games_finished_total(winner);
        metrics::pot_size_chips(session.pot);
    }
}

/// Deal a new game.
///
/// Returns `201 Created` with the game view.
pub async fn create_game(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> Result<(StatusCode, Json<GameView>), ApiError> {
    let session = state.game_manager.create_game().await?;

    metrics::games_created_total();
    metrics::active_sessions(state.game_manager.active_session_count().await);
    tracing::info!(request_id = request_id.as_str(), game_id = %session.id, "Game created");

    Ok((StatusCode::CREATED, Json(session.view())))
}

/// Get the current view of a game.
///
/// # Errors
///
/// - `400 Bad Request`: Malformed game id
/// - `404 Not Found`: Unknown game
pub async fn get_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<GameView>, ApiError> {
    let game_id = parse_game_id(&game_id)?;
    let session = state.game_manager.get_state(game_id).await?;
    Ok(Json(session.view()))
}

/// Call, raise or fold.
///
/// # Request Body
///
/// ```json
/// { "action": "raise", "amount": 50 }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Malformed id or body, wrong phase, insufficient chips
/// - `404 Not Found`: Unknown game
/// - `409 Conflict`: Game was modified concurrently
pub async fn place_bet(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(game_id): Path<String>,
    payload: Result<Json<BetRequest>, JsonRejection>,
) -> Result<Json<GameView>, ApiError> {
    let game_id = parse_game_id(&game_id)?;
    let Json(request) = payload?;
    let action = request.into_action()?;

    let session = state.game_manager.take_action(game_id, action.clone()).await?;

    metrics::bet_actions_total(&action);
    record_finish(&session);
    tracing::info!(
        request_id = request_id.as_str(),
        game_id = %game_id,
        action = %action,
        phase = %session.phase,
        "Bet accepted"
    );

    Ok(Json(session.view()))
}

/// Discard and replace cards, finishing the hand.
///
/// # Request Body
///
/// ```json
/// { "discardIndices": [0, 3] }
/// ```
///
/// # Errors
///
/// Same status codes as [`place_bet`].
pub async fn draw_cards(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(game_id): Path<String>,
    payload: Result<Json<DrawRequest>, JsonRejection>,
) -> Result<Json<GameView>, ApiError> {
    let game_id = parse_game_id(&game_id)?;
    let Json(request) = payload?;
    request.validate()?;

    let discarded = request.discard_indices.len();
    let session = state
        .game_manager
        .draw(game_id, request.discard_indices)
        .await?;

    metrics::draws_total(discarded);
    record_finish(&session);
    tracing::info!(
        request_id = request_id.as_str(),
        game_id = %game_id,
        discarded,
        "Draw accepted"
    );

    Ok(Json(session.view()))
}
