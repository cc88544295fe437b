//! Move validation.

use crate::{Board, Mark, Move, MoveRejection, Position, Role};
use tracing::instrument;

/// Validates a raw move request from a connection.
///
/// The input must parse as an integer in 0-8, the role must hold a mark,
/// that mark must be `active_turn`, and the target cell must be empty.
/// Checks run in that order and the first failure is returned.
#[instrument(skip(board))]
pub fn validate_move(
    role: Role,
    raw: &str,
    board: &Board,
    active_turn: Mark,
) -> Result<Move, MoveRejection> {
    let cell: i64 = raw
        .trim()
        .parse()
        .map_err(|_| MoveRejection::NotAnInteger(raw.to_string()))?;

    let position = usize::try_from(cell)
        .ok()
        .and_then(Position::from_index)
        .ok_or(MoveRejection::OutOfRange(cell))?;

    let mark = role.mark().ok_or(MoveRejection::Spectator)?;

    if mark != active_turn {
        return Err(MoveRejection::NotYourTurn {
            mover: mark,
            active: active_turn,
        });
    }

    if !board.is_empty(position) {
        return Err(MoveRejection::Occupied(position));
    }

    Ok(Move::new(mark, position))
}
