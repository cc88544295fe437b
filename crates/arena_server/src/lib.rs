//! Shared real-time tic-tac-toe session server.
//!
//! One game runs at a time. Connections arrive over WebSockets and are
//! seated in arrival order (first `O`, then `X`, then spectators). Moves
//! are validated with [`arena_board`], applied to the shared session, and
//! the new state is broadcast to everyone. A win or draw is announced,
//! every connection is closed, the board resets, and the result is
//! recorded off the session lock.
//!
//! # Architecture
//!
//! - **Session**: board, turn marker, and the seat registry
//! - **Broadcast**: fan-out, pruning of dead connections, mass teardown
//! - **Hub**: the per-connection state machine, serialized by one lock
//! - **Routes**: axum WebSocket binding and the leaderboard endpoint
//! - **Db**: SQLite result store and leaderboard aggregation
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use arena_server::{GameHub, GameRepository, app};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let repository = GameRepository::open("tictactoe.db".to_string())?;
//! let hub = GameHub::new(Arc::new(repository.clone()));
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//! axum::serve(listener, app(hub, repository)).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod broadcast;
mod config;
mod connection;
mod db;
mod hub;
mod identity;
mod protocol;
mod results;
mod routes;
mod session;

pub use broadcast::{broadcast, check_peer_disconnect, close_all};
pub use config::{ConfigError, ServerConfig};
pub use connection::{ConnectionClosed, ConnectionHandle, ConnectionId, Outbound, UserId};
pub use db::{
    DbError, DbErrorKind, GameOutcome, GameRecord, GameRepository, LeaderboardEntry,
    NewGameRecord, NewUser, User,
};
pub use hub::{Connection, Flow, GameHub};
pub use identity::{ID_COOKIE, user_id_from_headers};
pub use protocol::{DISCONNECT_NOTICE, ServerMessage};
pub use results::{DRAW_WINNER_ID, GameResult, ResultStore};
pub use routes::{app, game_router, leaderboard_router};
pub use session::{FIRST_TURN, Seat, Session};
