//! Per-connection protocol state machine.
//!
//! [`GameHub`] owns the one [`Session`] and turns connection lifecycle
//! events (connect, inbound text, disconnect) into session mutations and
//! broadcasts. Every event is handled inside a single lock acquisition, so
//! a move, its terminal checks, and the broadcasts that follow can never
//! interleave with another connection's move. Storing a finished game's
//! result is the exception: it runs on the blocking pool once the board
//! has been reset and the lock released.
//!
//! The hub is transport-agnostic: it hands each connection an outbound
//! queue and leaves the socket to the caller (see [`crate::routes`]).

use crate::broadcast::{broadcast, check_peer_disconnect, close_all};
use crate::connection::ConnectionIds;
use crate::{
    ConnectionHandle, ConnectionId, GameResult, Outbound, ResultStore, ServerMessage, Session,
    UserId,
};
use arena_board::{Mark, Role, detect_winner, is_full, validate_move};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, error, info, instrument, warn};

/// What the transport loop should do after an inbound message.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading from the connection.
    Continue,
    /// The connection is no longer part of the session; stop reading.
    Closed,
}

/// A freshly accepted connection.
#[derive(Debug)]
pub struct Connection {
    /// Id to pass back on every later event.
    pub id: ConnectionId,
    /// Role the connection was given.
    pub role: Role,
    /// Frames to write to the socket, in order.
    pub outbound: mpsc::UnboundedReceiver<Outbound>,
}

/// Shared owner of the live session.
///
/// Cheap to clone; every clone drives the same session.
#[derive(Clone)]
pub struct GameHub {
    session: Arc<Mutex<Session>>,
    results: Arc<dyn ResultStore>,
    ids: Arc<ConnectionIds>,
}

impl std::fmt::Debug for GameHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameHub").finish_non_exhaustive()
    }
}

impl GameHub {
    /// Creates a hub with an empty session that reports results to `results`.
    #[instrument(skip(results))]
    pub fn new(results: Arc<dyn ResultStore>) -> Self {
        info!("Creating game hub");
        Self {
            session: Arc::new(Mutex::new(Session::new())),
            results,
            ids: Arc::new(ConnectionIds::default()),
        }
    }

    /// Accepts a connection: assigns its role, tells it the role, then
    /// broadcasts the current state to everyone including it.
    #[instrument(skip(self))]
    pub async fn connect(&self, user_id: Option<UserId>) -> Connection {
        let (sender, outbound) = mpsc::unbounded_channel();
        let handle = ConnectionHandle::new(self.ids.allocate(), user_id, sender);
        let id = handle.id();

        let mut session = self.session.lock().await;
        let role = session.assign_role(handle.clone());

        if let Err(e) = handle.send(&ServerMessage::Assigned(role)) {
            warn!(error = %e, "Could not deliver role assignment");
            session.remove_connection(id);
        }
        let snapshot = session.snapshot();
        broadcast(&mut session, &snapshot);

        info!(connection_id = %id, %role, connections = session.connection_count(), "Connection active");
        Connection { id, role, outbound }
    }

    /// Processes one inbound text frame from a connection.
    ///
    /// Invalid input and illegal moves are ignored without any reply.
    #[instrument(skip(self))]
    pub async fn handle_message(&self, id: ConnectionId, raw: &str) -> Flow {
        let mut session = self.session.lock().await;

        let Some(role) = session.role_of(id) else {
            debug!(connection_id = %id, "Message from a connection that is no longer seated");
            return Flow::Closed;
        };

        if check_peer_disconnect(&mut session, id, role) {
            return Flow::Continue;
        }

        let mv = match validate_move(role, raw, session.board(), session.active_turn()) {
            Ok(mv) => mv,
            Err(rejection) => {
                debug!(connection_id = %id, %role, %rejection, "Ignoring move");
                return Flow::Continue;
            }
        };

        session.apply_move(mv);
        info!(connection_id = %id, %mv, "Move accepted");

        let winner = detect_winner(session.board());
        if winner.is_none() && !is_full(session.board()) {
            session.advance_turn();
            let snapshot = session.snapshot();
            broadcast(&mut session, &snapshot);
            return Flow::Continue;
        }

        let result = Self::finish_game(&mut session, winner);
        drop(session);
        self.record(result).await;
        Flow::Closed
    }

    /// Forgets a connection whose transport has ended. Safe to call more
    /// than once.
    #[instrument(skip(self))]
    pub async fn disconnect(&self, id: ConnectionId) {
        let mut session = self.session.lock().await;
        if session.remove_connection(id).is_some() {
            info!(connection_id = %id, remaining = session.connection_count(), "Connection closed");
        }
    }

    /// Runs `f` against the session under the lock.
    pub async fn inspect<T>(&self, f: impl FnOnce(&Session) -> T) -> T {
        let session = self.session.lock().await;
        f(&session)
    }

    /// Announces the outcome, tears every connection down and resets the
    /// board for the next pair of players. Returns the result to record.
    #[instrument(skip(session))]
    fn finish_game(session: &mut Session, winner: Option<Mark>) -> GameResult {
        let snapshot = session.snapshot();
        broadcast(session, &snapshot);

        let outcome = match winner {
            Some(mark) => ServerMessage::Win(mark),
            None => ServerMessage::Draw,
        };
        info!(%outcome, board = %session.board().display(), "Game over");
        broadcast(session, &outcome);

        let result = session.result_for(winner);
        close_all(session);
        session.reset();
        result
    }

    /// Hands a finished game to the result store on the blocking pool.
    /// Must be called without the session lock held.
    #[instrument(skip(self))]
    async fn record(&self, result: GameResult) {
        let results = Arc::clone(&self.results);
        match tokio::task::spawn_blocking(move || results.record_result(&result)).await {
            Ok(Ok(())) => debug!("Game result recorded"),
            Ok(Err(e)) => warn!(error = %e, "Failed to record game result"),
            Err(e) => error!(error = %e, "Result recording task failed"),
        }
    }
}
