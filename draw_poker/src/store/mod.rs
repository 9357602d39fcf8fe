//! Session persistence.
//!
//! [`SessionStore`] is the single boundary sessions are read from and written
//! to. Writes are version-checked: every stored session carries a `version`
//! counter and [`SessionStore::update`] only succeeds when the caller saw the
//! latest one.

use async_trait::async_trait;
use uuid::Uuid;

use crate::game::Session;

pub mod errors;
pub mod memory;
pub mod postgres;

pub use errors::{StoreError, StoreResult};
pub use memory::InMemorySessionStore;
pub use postgres::PgSessionStore;

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Insert a brand-new session. Fails if the id is taken.
    async fn create(&self, session: &Session) -> StoreResult<()>;

    /// Load a session by id
    async fn get(&self, id: Uuid) -> StoreResult<Session>;

    /// Write back a session read at `session.version`.
    ///
    /// # Returns
    ///
    /// * `StoreResult<u64>` - The new stored version, or `Conflict` if the
    ///   stored version moved on in the meantime
    async fn update(&self, session: &Session) -> StoreResult<u64>;

    /// Check the backing storage is reachable
    async fn health_check(&self) -> StoreResult<()>;
}
