//! The single live game: board, turn marker, and seat registry.
//!
//! A [`Session`] does no locking and no validation of its own. The hub
//! keeps it behind a mutex and only mutates it after the board rules have
//! accepted a move.

use crate::{ConnectionHandle, ConnectionId, GameResult, ServerMessage};
use arena_board::{Board, Cell, Mark, Move, Role};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// Mark that moves first after every reset.
pub const FIRST_TURN: Mark = Mark::X;

/// A registered connection and the role it was given.
#[derive(Debug, Clone)]
pub struct Seat {
    handle: ConnectionHandle,
    role: Role,
}

impl Seat {
    /// The connection's handle.
    pub fn handle(&self) -> &ConnectionHandle {
        &self.handle
    }

    /// The connection's role.
    pub fn role(&self) -> Role {
        self.role
    }
}

/// Shared game state for every connection.
#[derive(Debug)]
pub struct Session {
    board: Board,
    active_turn: Mark,
    // Keyed by arrival-ordered id, so iteration follows arrival order.
    seats: BTreeMap<ConnectionId, Seat>,
}

impl Session {
    /// Creates an empty session with no connections.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating game session");
        Self {
            board: Board::new(),
            active_turn: FIRST_TURN,
            seats: BTreeMap::new(),
        }
    }

    /// Registers a connection and decides its role.
    ///
    /// The first arrival while `O` is free gets `O`, then the first while
    /// `X` is free gets `X`; everyone else spectates.
    #[instrument(skip(self, handle), fields(connection_id = %handle.id()))]
    pub fn assign_role(&mut self, handle: ConnectionHandle) -> Role {
        let role = if self.holder_of(Mark::O).is_none() {
            Role::Player(Mark::O)
        } else if self.holder_of(Mark::X).is_none() {
            Role::Player(Mark::X)
        } else {
            Role::Spectator
        };

        info!(
            connection_id = %handle.id(),
            user_id = ?handle.user_id(),
            %role,
            "Assigned role"
        );
        self.seats.insert(handle.id(), Seat { handle, role });
        role
    }

    /// Writes a validated move onto the board.
    #[instrument(skip(self))]
    pub fn apply_move(&mut self, mv: Move) {
        self.board.set(mv.position(), Cell::Marked(mv.mark()));
        debug!(board = %self.board.display(), "Move applied");
    }

    /// Hands the turn to the other mark.
    #[instrument(skip(self), fields(from = %self.active_turn))]
    pub fn advance_turn(&mut self) {
        self.active_turn = self.active_turn.opponent();
    }

    /// Clears the board and gives the first turn back to [`FIRST_TURN`].
    ///
    /// Seats are left alone.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        info!("Resetting board");
        self.board.clear();
        self.active_turn = FIRST_TURN;
    }

    /// Removes a connection from the registry. Absent ids are ignored.
    #[instrument(skip(self))]
    pub fn remove_connection(&mut self, id: ConnectionId) -> Option<Seat> {
        let removed = self.seats.remove(&id);
        match &removed {
            Some(seat) => info!(role = %seat.role, remaining = self.seats.len(), "Connection removed"),
            None => debug!("Connection already removed"),
        }
        removed
    }

    /// Current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mark allowed to move next.
    pub fn active_turn(&self) -> Mark {
        self.active_turn
    }

    /// Seat of a registered connection.
    pub fn seat(&self, id: ConnectionId) -> Option<&Seat> {
        self.seats.get(&id)
    }

    /// Role of a registered connection.
    pub fn role_of(&self, id: ConnectionId) -> Option<Role> {
        self.seats.get(&id).map(Seat::role)
    }

    /// Whether the connection is still registered.
    pub fn is_registered(&self, id: ConnectionId) -> bool {
        self.seats.contains_key(&id)
    }

    /// The seat currently playing `mark`.
    pub fn holder_of(&self, mark: Mark) -> Option<&Seat> {
        self.seats
            .values()
            .find(|seat| seat.role == Role::Player(mark))
    }

    /// Number of registered connections, spectators included.
    pub fn connection_count(&self) -> usize {
        self.seats.len()
    }

    /// Registered connections in arrival order.
    pub fn seats(&self) -> impl Iterator<Item = (ConnectionId, &Seat)> {
        self.seats.iter().map(|(id, seat)| (*id, seat))
    }

    /// Ids of every registered connection, in arrival order.
    pub fn connection_ids(&self) -> Vec<ConnectionId> {
        self.seats.keys().copied().collect()
    }

    /// Serialized board and turn, ready to broadcast.
    pub fn snapshot(&self) -> ServerMessage {
        ServerMessage::State {
            board: self.board.clone(),
            active_turn: self.active_turn,
        }
    }

    /// Builds the result record from whoever holds the seats right now.
    pub fn result_for(&self, winner: Option<Mark>) -> GameResult {
        let identity = |mark| self.holder_of(mark).and_then(|seat| seat.handle.user_id());
        GameResult::new(identity(Mark::X), identity(Mark::O), winner)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::ConnectionIds;
    use crate::Outbound;
    use arena_board::Position;
    use tokio::sync::mpsc;

    fn handle(ids: &ConnectionIds, user_id: Option<i32>) -> (ConnectionHandle, mpsc::UnboundedReceiver<Outbound>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ConnectionHandle::new(ids.allocate(), user_id, tx), rx)
    }

    #[test]
    fn test_roles_follow_arrival_order() {
        let ids = ConnectionIds::default();
        let mut session = Session::new();
        let roles: Vec<Role> = (0..4)
            .map(|_| session.assign_role(handle(&ids, None).0))
            .collect();
        assert_eq!(
            roles,
            vec![
                Role::Player(Mark::O),
                Role::Player(Mark::X),
                Role::Spectator,
                Role::Spectator
            ]
        );
    }

    #[test]
    fn test_vacated_seat_goes_to_next_arrival() {
        let ids = ConnectionIds::default();
        let mut session = Session::new();
        let (first, _rx1) = handle(&ids, None);
        let first_id = first.id();
        session.assign_role(first);
        session.assign_role(handle(&ids, None).0);
        session.assign_role(handle(&ids, None).0);

        session.remove_connection(first_id);
        let (late, _rx4) = handle(&ids, None);
        assert_eq!(session.assign_role(late), Role::Player(Mark::O));
    }

    #[test]
    fn test_reset_clears_board_and_turn() {
        let mut session = Session::new();
        session.apply_move(Move::new(Mark::X, Position::Center));
        session.advance_turn();
        assert_eq!(session.active_turn(), Mark::O);

        session.reset();
        assert_eq!(session.board(), &Board::new());
        assert_eq!(session.active_turn(), FIRST_TURN);
    }

    #[test]
    fn test_reset_keeps_seats() {
        let ids = ConnectionIds::default();
        let mut session = Session::new();
        session.assign_role(handle(&ids, None).0);
        session.reset();
        assert_eq!(session.connection_count(), 1);
    }

    #[test]
    fn test_remove_absent_connection_is_noop() {
        let ids = ConnectionIds::default();
        let mut session = Session::new();
        let (a, _rx) = handle(&ids, None);
        let a_id = a.id();
        session.assign_role(a);

        let (ghost, _ghost_rx) = handle(&ids, None);
        assert!(session.remove_connection(ghost.id()).is_none());
        assert_eq!(session.role_of(a_id), Some(Role::Player(Mark::O)));

        assert!(session.remove_connection(a_id).is_some());
        assert!(session.remove_connection(a_id).is_none());
        assert_eq!(session.connection_count(), 0);
    }

    #[test]
    fn test_result_uses_seat_identities() {
        let ids = ConnectionIds::default();
        let mut session = Session::new();
        session.assign_role(handle(&ids, Some(11)).0);
        session.assign_role(handle(&ids, Some(22)).0);
        let result = session.result_for(Some(Mark::O));
        assert_eq!(result.player_o(), &Some(11));
        assert_eq!(result.player_x(), &Some(22));
        assert_eq!(result.winner_id(), Some(11));
    }
}
