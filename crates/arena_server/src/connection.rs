//! Non-owning handles to live connections.
//!
//! The transport owns the socket. The session only keeps a handle that
//! can queue outbound frames, plus the identity resolved at accept time.

use crate::ServerMessage;
use derive_more::{Display, Error};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tracing::instrument;

/// Opaque user identity attached to a connection (the `id` cookie).
pub type UserId = i32;

/// Stable identity of one connection.
///
/// Ids are handed out in increasing order, so sorting by id is sorting by
/// arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display("conn-{_0}")]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Allocates connection ids for one hub.
#[derive(Debug, Default)]
pub(crate) struct ConnectionIds {
    next: AtomicU64,
}

impl ConnectionIds {
    pub(crate) fn allocate(&self) -> ConnectionId {
        ConnectionId(self.next.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

/// A frame queued for a connection's writer task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// A text frame carrying one wire message.
    Text(String),
    /// Close the socket gracefully; nothing after this is delivered.
    Close,
}

/// The connection's writer is gone, so nothing can reach the client.
#[derive(Debug, Clone, Display, Error)]
#[display("Connection {} is closed at {}:{}", id, file, line)]
pub struct ConnectionClosed {
    /// Which connection failed.
    pub id: ConnectionId,
    /// Line number where the failed send happened.
    pub line: u32,
    /// Source file where the failed send happened.
    pub file: &'static str,
}

impl ConnectionClosed {
    /// Creates the error with caller location tracking.
    #[track_caller]
    pub fn new(id: ConnectionId) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            id,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Handle the session holds for each registered connection.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    user_id: Option<UserId>,
    sender: mpsc::UnboundedSender<Outbound>,
}

impl ConnectionHandle {
    /// Wraps the sending half of a connection's outbound queue.
    pub fn new(
        id: ConnectionId,
        user_id: Option<UserId>,
        sender: mpsc::UnboundedSender<Outbound>,
    ) -> Self {
        Self {
            id,
            user_id,
            sender,
        }
    }

    /// Connection id.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Identity resolved at accept time, if the user was known.
    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    /// Queues a wire message.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionClosed`] once the writer side has gone away.
    #[instrument(skip(self, message), fields(connection_id = %self.id))]
    pub fn send(&self, message: &ServerMessage) -> Result<(), ConnectionClosed> {
        self.sender
            .send(Outbound::Text(message.to_string()))
            .map_err(|_| ConnectionClosed::new(self.id))
    }

    /// Asks the writer to close the socket.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionClosed`] if the writer is already gone.
    #[instrument(skip(self), fields(connection_id = %self.id))]
    pub fn close(&self) -> Result<(), ConnectionClosed> {
        self.sender
            .send(Outbound::Close)
            .map_err(|_| ConnectionClosed::new(self.id))
    }
}
