//! Validated moves and the reasons a move can be refused.

use crate::{Mark, Position};
use serde::{Deserialize, Serialize};

/// A move that passed validation: a mark claiming an empty position.
///
/// Only [`validate_move`](crate::validate_move) produces these outside
/// tests, so holding one means every rule check already succeeded
/// against the board it was validated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    mark: Mark,
    position: Position,
}

impl Move {
    /// Creates a move without checking it against any board.
    pub fn new(mark: Mark, position: Position) -> Self {
        Self { mark, position }
    }

    /// The mark being placed.
    pub fn mark(&self) -> Mark {
        self.mark
    }

    /// The target position.
    pub fn position(&self) -> Position {
        self.position
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.mark, self.position)
    }
}

/// Why a raw move request was refused.
///
/// Clients never see these; the reason exists for logging.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveRejection {
    /// Input did not parse as an integer.
    #[display("Input {:?} is not an integer", _0)]
    NotAnInteger(String),

    /// Integer outside 0-8.
    #[display("Cell {} is out of range (must be 0-8)", _0)]
    OutOfRange(i64),

    /// Spectators never move.
    #[display("Spectators cannot move")]
    Spectator,

    /// The mover's mark is not the active turn.
    #[display("It's not {}'s turn (waiting for {})", mover, active)]
    NotYourTurn {
        /// Mark that tried to move.
        mover: Mark,
        /// Mark whose turn it is.
        active: Mark,
    },

    /// The target cell is taken.
    #[display("{} is already occupied", _0)]
    Occupied(Position),
}

impl std::error::Error for MoveRejection {}
