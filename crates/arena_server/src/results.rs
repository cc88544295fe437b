//! Result persistence seam.
//!
//! The hub reports every finished game through [`ResultStore`]. What
//! happens after that (SQLite, nothing at all, a test recorder) is up to
//! the implementation; failures are logged by the caller and never change
//! how the game ends.

use crate::UserId;
use crate::db::DbError;
use arena_board::Mark;
use derive_getters::Getters;
use derive_new::new;

/// Winner id stored for a drawn game.
pub const DRAW_WINNER_ID: UserId = 0;

/// Outcome of one finished game, with the identities seated at the end.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new)]
pub struct GameResult {
    player_x: Option<UserId>,
    player_o: Option<UserId>,
    winner: Option<Mark>,
}

impl GameResult {
    /// Identity to store as the winner: the winning seat's user, or
    /// [`DRAW_WINNER_ID`] for a draw. `None` when the winner was anonymous.
    pub fn winner_id(&self) -> Option<UserId> {
        match self.winner {
            Some(Mark::X) => self.player_x,
            Some(Mark::O) => self.player_o,
            None => Some(DRAW_WINNER_ID),
        }
    }

    /// True when nobody won.
    pub fn is_draw(&self) -> bool {
        self.winner.is_none()
    }
}

/// Persists finished games.
pub trait ResultStore: Send + Sync {
    /// Records one finished game.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the result could not be stored.
    fn record_result(&self, result: &GameResult) -> Result<(), DbError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_winner_id_follows_winning_seat() {
        let result = GameResult::new(Some(7), Some(9), Some(Mark::X));
        assert_eq!(result.winner_id(), Some(7));
        let result = GameResult::new(Some(7), Some(9), Some(Mark::O));
        assert_eq!(result.winner_id(), Some(9));
    }

    #[test]
    fn test_draw_uses_zero() {
        let result = GameResult::new(Some(7), None, None);
        assert!(result.is_draw());
        assert_eq!(result.winner_id(), Some(DRAW_WINNER_ID));
    }

    #[test]
    fn test_anonymous_winner_has_no_id() {
        let result = GameResult::new(None, Some(9), Some(Mark::X));
        assert_eq!(result.winner_id(), None);
    }
}
