//! Core domain types for the board.

use crate::Position;
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// One of the two playing symbols.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, strum::EnumIter,
)]
pub enum Mark {
    /// Mark X (moves first after every reset).
    #[display("X")]
    X,
    /// Mark O.
    #[display("O")]
    O,
}

impl Mark {
    /// Returns the opposing mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// What a connection is allowed to do in the session.
///
/// A role is "may move"; a [`Cell`] is "moved here". They share the
/// [`Mark`] domain but are not interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Role {
    /// Holds a seat and plays the given mark.
    #[display("{_0}")]
    Player(Mark),
    /// Watches only.
    #[display("S")]
    Spectator,
}

impl Role {
    /// Returns the mark this role plays, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Role::Player(mark) => Some(mark),
            Role::Spectator => None,
        }
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Nobody has moved here.
    Empty,
    /// Claimed by a mark.
    Marked(Mark),
}

impl Cell {
    /// Wire symbol for this cell: the mark, or an empty string.
    pub fn symbol(self) -> &'static str {
        match self {
            Cell::Empty => "",
            Cell::Marked(Mark::X) => "X",
            Cell::Marked(Mark::O) => "O",
        }
    }
}

/// 3x3 board in row-major order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [Cell; 9],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; 9],
        }
    }

    /// Gets the cell at a position.
    pub fn get(&self, pos: Position) -> Cell {
        self.cells[pos.to_index()]
    }

    /// Overwrites the cell at a position.
    ///
    /// No rule checks happen here; callers go through
    /// [`validate_move`](crate::validate_move) first.
    pub fn set(&mut self, pos: Position, cell: Cell) {
        self.cells[pos.to_index()] = cell;
    }

    /// Checks if the cell at a position is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Cell::Empty
    }

    /// Returns all cells.
    pub fn cells(&self) -> &[Cell; 9] {
        &self.cells
    }

    /// Empties every cell.
    pub fn clear(&mut self) {
        self.cells = [Cell::Empty; 9];
    }

    /// Formats the board as a human-readable grid, for logs.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let pos = row * 3 + col;
                let symbol = match self.cells[pos] {
                    Cell::Empty => pos.to_string(),
                    Cell::Marked(mark) => mark.to_string(),
                };
                result.push_str(&symbol);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl From<[Cell; 9]> for Board {
    fn from(cells: [Cell; 9]) -> Self {
        Self { cells }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_role_wire_symbols() {
        assert_eq!(Role::Player(Mark::X).to_string(), "X");
        assert_eq!(Role::Player(Mark::O).to_string(), "O");
        assert_eq!(Role::Spectator.to_string(), "S");
    }

    #[test]
    fn test_opponent_flips() {
        assert_eq!(Mark::X.opponent(), Mark::O);
        assert_eq!(Mark::O.opponent(), Mark::X);
        for mark in Mark::iter() {
            assert_ne!(mark.opponent(), mark);
            assert_eq!(mark.opponent().opponent(), mark);
        }
    }

    #[test]
    fn test_clear_empties_board() {
        let mut board = Board::new();
        board.set(Position::Center, Cell::Marked(Mark::O));
        board.clear();
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_display_grid() {
        let mut board = Board::new();
        board.set(Position::TopLeft, Cell::Marked(Mark::X));
        assert_eq!(board.display(), "X|1|2\n-+-+-\n3|4|5\n-+-+-\n6|7|8");
    }
}
