use async_trait::async_trait;
use sqlx::{Row, types::Json};
use uuid::Uuid;

use super::{SessionStore, StoreError, StoreResult};
use crate::db::Database;
use crate::game::Session;

/// PostgreSQL error code for unique constraint violations
const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL implementation of `SessionStore` backed by the `poker_games`
/// table.
pub struct PgSessionStore {
    db: Database,
}

impl PgSessionStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Create the `poker_games` table if it doesn't exist yet.
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::raw_sql(include_str!("../../migrations/0001_poker_games.sql"))
            .execute(self.db.pool())
            .await?;
        log::info!("poker_games schema is up to date");
        Ok(())
    }

    async fn stored_version(&self, id: Uuid) -> StoreResult<Option<u64>> {
        let row = sqlx::query("SELECT version FROM poker_games WHERE id = $1")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;
        let version = row.map(|r| r.try_get::<i64, _>("version")).transpose()?;
        Ok(version.map(|v| v as u64))
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn create(&self, session: &Session) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO poker_games
                (id, phase, pot, current_bet, winner, winning_hand, state, version,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(session.id)
        .bind(session.phase.to_string())
        .bind(i64::from(session.pot))
        .bind(i64::from(session.current_bet))
        .bind(session.winner.as_ref().map(ToString::to_string))
        .bind(session.winning_hand.as_deref())
        .bind(Json(session))
        .bind(session.version as i64)
        .bind(session.created_at)
        .bind(session.updated_at)
        .execute(self.db.pool())
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                Err(StoreError::AlreadyExists(session.id))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get(&self, id: Uuid) -> StoreResult<Session> {
        let row = sqlx::query("SELECT state, version FROM poker_games WHERE id = $1")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or(StoreError::NotFound(id))?;

        let Json(mut session): Json<Session> = row.try_get("state")?;
        // The column is authoritative; the JSON copy may lag one write.
        session.version = row.try_get::<i64, _>("version")? as u64;
        Ok(session)
    }

    async fn update(&self, session: &Session) -> StoreResult<u64> {
        let row = sqlx::query(
            r#"
            UPDATE poker_games
            SET phase = $2, pot = $3, current_bet = $4, winner = $5, winning_hand = $6,
                state = $7, updated_at = $8, version = version + 1
            WHERE id = $1 AND version = $9
            RETURNING version
            "#,
        )
        .bind(session.id)
        .bind(session.phase.to_string())
        .bind(i64::from(session.pot))
        .bind(i64::from(session.current_bet))
        .bind(session.winner.as_ref().map(ToString::to_string))
        .bind(session.winning_hand.as_deref())
        .bind(Json(session))
        .bind(session.updated_at)
        .bind(session.version as i64)
        .fetch_optional(self.db.pool())
        .await?;

        if let Some(row) = row {
            return Ok(row.try_get::<i64, _>("version")? as u64);
        }

        match self.stored_version(session.id).await? {
            None => Err(StoreError::NotFound(session.id)),
            Some(found) => Err(StoreError::Conflict {
                id: session.id,
                expected: session.version,
                found,
            }),
        }
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(self.db.health_check().await?)
    }
}
