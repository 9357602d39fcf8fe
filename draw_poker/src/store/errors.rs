//! Session store error types.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Game {0} not found")]
    NotFound(Uuid),

    #[error("Game {0} already exists")]
    AlreadyExists(Uuid),

    /// Someone else wrote the session since it was read
    #[error("Version conflict on game {id}: expected {expected}, found {found}")]
    Conflict { id: Uuid, expected: u64, found: u64 },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Get a client-safe error message that doesn't leak storage details.
    pub fn client_message(&self) -> String {
        match self {
            StoreError::Database(_) | StoreError::Serialization(_) => {
                "Internal server error".to_string()
            }
            StoreError::NotFound(_) => "Game not found".to_string(),
            StoreError::AlreadyExists(_) => "Game already exists".to_string(),
            StoreError::Conflict { .. } => {
                "Game was modified concurrently, retry the request".to_string()
            }
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
