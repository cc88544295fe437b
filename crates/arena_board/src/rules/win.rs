//! Win detection.

use crate::{Board, Cell, Mark, Position};
use tracing::instrument;

/// The eight winning lines, in evaluation order: rows, then columns, then
/// diagonals.
pub const LINES: [[Position; 3]; 8] = [
    // Rows
    [Position::TopLeft, Position::TopCenter, Position::TopRight],
    [
        Position::MiddleLeft,
        Position::Center,
        Position::MiddleRight,
    ],
    [
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ],
    // Columns
    [
        Position::TopLeft,
        Position::MiddleLeft,
        Position::BottomLeft,
    ],
    [
        Position::TopCenter,
        Position::Center,
        Position::BottomCenter,
    ],
    [
        Position::TopRight,
        Position::MiddleRight,
        Position::BottomRight,
    ],
    // Diagonals
    [Position::TopLeft, Position::Center, Position::BottomRight],
    [Position::TopRight, Position::Center, Position::BottomLeft],
];

/// Returns the mark holding a complete line, if any.
///
/// Lines are checked in [`LINES`] order and the first complete one wins,
/// so a malformed board with several complete lines still has a
/// deterministic answer.
#[instrument(skip(board))]
pub fn detect_winner(board: &Board) -> Option<Mark> {
    LINES.iter().find_map(|&[a, b, c]| match board.get(a) {
        Cell::Marked(mark) if board.get(b) == Cell::Marked(mark) && board.get(c) == Cell::Marked(mark) => {
            Some(mark)
        }
        _ => None,
    })
}
