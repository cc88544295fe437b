//! Text wire protocol spoken over the WebSocket.
//!
//! Server frames are pipe-delimited `TAG|payload` strings, except the
//! state snapshot which is `c0,...,c8|turn`. Clients only ever send a bare
//! cell index, which is validated by [`arena_board::validate_move`].

use arena_board::{Board, Mark, Role};
use std::fmt;

/// Notice sent to the surviving player when the opponent has gone.
pub const DISCONNECT_NOTICE: &str =
    "The connection with the other player was lost. The game will be reset.";

/// A message from the server to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// `YOU|<role>`: first frame on every connection.
    Assigned(Role),
    /// `<c0>,...,<c8>|<turn>`: full board snapshot and whose turn is next.
    State {
        /// Board at the time of the snapshot.
        board: Board,
        /// Mark allowed to move next.
        active_turn: Mark,
    },
    /// `WIN|<mark>`
    Win(Mark),
    /// `DRAW`
    Draw,
    /// `DISC|<text>`: the opponent vanished and the game is being reset.
    Disconnected(String),
}

impl fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerMessage::Assigned(role) => write!(f, "YOU|{role}"),
            ServerMessage::State { board, active_turn } => {
                let cells: Vec<&str> = board.cells().iter().map(|c| c.symbol()).collect();
                write!(f, "{}|{active_turn}", cells.join(","))
            }
            ServerMessage::Win(mark) => write!(f, "WIN|{mark}"),
            ServerMessage::Draw => f.write_str("DRAW"),
            ServerMessage::Disconnected(text) => write!(f, "DISC|{text}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_board::{Cell, Position};

    #[test]
    fn test_empty_snapshot() {
        let msg = ServerMessage::State {
            board: Board::new(),
            active_turn: Mark::X,
        };
        assert_eq!(msg.to_string(), ",,,,,,,,|X");
    }

    #[test]
    fn test_snapshot_with_marks() {
        let mut board = Board::new();
        board.set(Position::TopLeft, Cell::Marked(Mark::O));
        board.set(Position::Center, Cell::Marked(Mark::X));
        let msg = ServerMessage::State {
            board,
            active_turn: Mark::O,
        };
        assert_eq!(msg.to_string(), "O,,,,X,,,,|O");
    }

    #[test]
    fn test_tagged_messages() {
        assert_eq!(ServerMessage::Assigned(Role::Spectator).to_string(), "YOU|S");
        assert_eq!(ServerMessage::Win(Mark::O).to_string(), "WIN|O");
        assert_eq!(ServerMessage::Draw.to_string(), "DRAW");
        assert_eq!(
            ServerMessage::Disconnected(DISCONNECT_NOTICE.to_string()).to_string(),
            format!("DISC|{DISCONNECT_NOTICE}")
        );
    }
}
