//! Database models.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use serde::Serialize;

use crate::db::schema;
use crate::{DRAW_WINNER_ID, UserId};

/// Registered user, as far as results are concerned.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::users)]
pub struct User {
    id: i32,
    username: String,
    created_at: NaiveDateTime,
}

/// Insertable user.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::users)]
pub struct NewUser {
    username: String,
}

/// One finished game.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::games)]
pub struct GameRecord {
    id: i32,
    player_x: i32,
    player_o: i32,
    winner: i32,
    played_at: NaiveDateTime,
}

impl GameRecord {
    /// Outcome of this game for `user_id`, or `None` if they did not play in it.
    pub fn outcome_for(&self, user_id: UserId) -> Option<GameOutcome> {
        if user_id != self.player_x && user_id != self.player_o {
            return None;
        }
        Some(if self.winner == DRAW_WINNER_ID {
            GameOutcome::Draw
        } else if self.winner == user_id {
            GameOutcome::Win
        } else {
            GameOutcome::Loss
        })
    }
}

/// Insertable game record. `winner` is [`DRAW_WINNER_ID`] for a draw.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::games)]
pub struct NewGameRecord {
    player_x: i32,
    player_o: i32,
    winner: i32,
}

/// Game outcome from one player's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameOutcome {
    /// The player won.
    Win,
    /// The player lost.
    Loss,
    /// Nobody won.
    Draw,
}

/// Per-user totals across every recorded game.
#[derive(Debug, Clone, PartialEq, Serialize, Getters)]
pub struct LeaderboardEntry {
    username: String,
    wins: u32,
    losses: u32,
    draws: u32,
}

impl LeaderboardEntry {
    /// Empty tally for a user.
    pub fn new(username: String) -> Self {
        Self {
            username,
            wins: 0,
            losses: 0,
            draws: 0,
        }
    }

    /// Counts one game.
    pub fn tally(&mut self, outcome: GameOutcome) {
        match outcome {
            GameOutcome::Win => self.wins += 1,
            GameOutcome::Loss => self.losses += 1,
            GameOutcome::Draw => self.draws += 1,
        }
    }

    /// Games played.
    pub fn total_games(&self) -> u32 {
        self.wins + self.losses + self.draws
    }

    /// Win rate as a percentage (0.0-100.0).
    pub fn win_rate(&self) -> f64 {
        match self.total_games() {
            0 => 0.0,
            total => f64::from(self.wins) / f64::from(total) * 100.0,
        }
    }
}
