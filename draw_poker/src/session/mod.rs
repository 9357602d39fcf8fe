//! Per-game actors.
//!
//! Each live game runs in its own Tokio task with an mpsc inbox
//! ([`GameActor`]). The [`GameManager`] routes requests to the right actor,
//! spawning or restoring it from the [`SessionStore`](crate::store::SessionStore)
//! as needed. Because an actor handles one message at a time, concurrent
//! requests for the same game can never interleave their mutations.
//!
//! ## Example
//!
//! ```no_run
//! use draw_poker::game::{Action, GameEngine};
//! use draw_poker::session::{GameManager, SessionConfig};
//! use draw_poker::store::InMemorySessionStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), draw_poker::session::SessionError> {
//!     let manager = GameManager::new(
//!         Arc::new(InMemorySessionStore::new()),
//!         GameEngine::default(),
//!         SessionConfig::default(),
//!     );
//!     let game = manager.create_game().await?;
//!     let game = manager.take_action(game.id, Action::Call).await?;
//!     let game = manager.draw(game.id, vec![0, 3]).await?;
//!     println!("{:?} won", game.winner);
//!     Ok(())
//! }
//! ```

pub mod actor;
pub mod config;
pub mod errors;
pub mod manager;
pub mod messages;

pub use actor::{GameActor, GameHandle};
pub use config::SessionConfig;
pub use errors::{SessionError, SessionResult};
pub use manager::GameManager;
pub use messages::{GameMessage, GameResponse};
