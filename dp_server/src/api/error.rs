//! Mapping from session errors to HTTP responses.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use draw_poker::SessionError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error returned by every game handler
#[derive(Debug)]
pub enum ApiError {
    /// Malformed request, rejected before reaching the game
    BadRequest(String),
    Session(SessionError),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Session(SessionError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Session(e) if e.is_conflict() => StatusCode::CONFLICT,
            ApiError::Session(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        ApiError::Session(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::BadRequest(message) => message.clone(),
            ApiError::Session(e) => {
                if status.is_server_error() {
                    tracing::error!(error = %e, "Game request failed");
                }
                e.client_message()
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draw_poker::{GameError, Phase, StoreError};
    use uuid::Uuid;

    #[test]
    fn test_not_found_is_404() {
        let err = ApiError::from(SessionError::NotFound(Uuid::new_v4()));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_rule_violations_are_400() {
        let err = ApiError::from(SessionError::Game(GameError::InvalidPhase {
            operation: "draw",
            phase: Phase::Betting,
        }));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = ApiError::from(SessionError::Game(GameError::InsufficientFunds {
            required: 50,
            available: 10,
        }));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_conflict_is_409() {
        let err = ApiError::from(SessionError::Store(StoreError::Conflict {
            id: Uuid::new_v4(),
            expected: 1,
            found: 2,
        }));
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_internal_errors_are_opaque_500() {
        let err = ApiError::from(SessionError::ActorUnavailable(Uuid::new_v4()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = ApiError::from(SessionError::Game(GameError::NoEligibleWinner));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
