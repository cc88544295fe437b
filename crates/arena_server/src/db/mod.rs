//! SQLite persistence for finished games and the leaderboard.

mod error;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only

pub use error::{DbError, DbErrorKind};
pub use models::{GameOutcome, GameRecord, LeaderboardEntry, NewGameRecord, NewUser, User};
pub use repository::GameRepository;
