//! Repository for users, game results, and the leaderboard.

use std::collections::BTreeMap;

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use crate::db::{
    DbError, DbErrorKind, GameRecord, LeaderboardEntry, NewGameRecord, NewUser, User, schema,
};
use crate::{DRAW_WINNER_ID, GameResult, ResultStore};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// SQLite-backed repository. Opens a connection per call.
#[derive(Debug, Clone)]
pub struct GameRepository {
    db_path: String,
}

impl GameRepository {
    /// Opens the database at `db_path`, creating it and applying pending
    /// migrations as needed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the database cannot be opened or migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn open(db_path: String) -> Result<Self, DbError> {
        let repo = Self { db_path };
        let mut conn = repo.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(DbErrorKind::Migration, e.to_string()))?;
        info!(path = %repo.db_path, migrations = applied.len(), "GameRepository ready");
        Ok(repo)
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path).map_err(|e| {
            DbError::new(
                DbErrorKind::Connection,
                format!("Failed to connect to '{}': {}", self.db_path, e),
            )
        })
    }

    /// Creates a user.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the username is taken or a database error occurs.
    #[instrument(skip(self))]
    pub fn create_user(&self, username: String) -> Result<User, DbError> {
        let mut conn = self.connection()?;

        let user = diesel::insert_into(schema::users::table)
            .values(&NewUser::new(username))
            .returning(User::as_returning())
            .get_result(&mut conn)?;

        info!(user_id = user.id(), username = %user.username(), "User created");
        Ok(user)
    }

    /// Looks a user up by name.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_user_by_name(&self, username: &str) -> Result<Option<User>, DbError> {
        let mut conn = self.connection()?;

        let user = schema::users::table
            .filter(schema::users::username.eq(username))
            .first::<User>(&mut conn)
            .optional()?;

        debug!(found = user.is_some(), "User lookup");
        Ok(user)
    }

    /// Stores a finished game.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, game), fields(player_x = game.player_x(), player_o = game.player_o(), winner = game.winner()))]
    pub fn record_game(&self, game: NewGameRecord) -> Result<GameRecord, DbError> {
        let mut conn = self.connection()?;

        let record = diesel::insert_into(schema::games::table)
            .values(&game)
            .returning(GameRecord::as_returning())
            .get_result(&mut conn)?;

        info!(game_id = record.id(), "Game result recorded");
        Ok(record)
    }

    /// Every recorded game, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn list_games(&self) -> Result<Vec<GameRecord>, DbError> {
        let mut conn = self.connection()?;

        let games = schema::games::table
            .order((schema::games::played_at.desc(), schema::games::id.desc()))
            .load::<GameRecord>(&mut conn)?;

        debug!(count = games.len(), "Games loaded");
        Ok(games)
    }

    /// Win/loss/draw totals for every user who has played, ordered by
    /// username.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, DbError> {
        let mut conn = self.connection()?;

        let users = schema::users::table.load::<User>(&mut conn)?;
        let games = schema::games::table.load::<GameRecord>(&mut conn)?;

        let mut tallies: BTreeMap<String, LeaderboardEntry> = BTreeMap::new();
        for user in &users {
            for outcome in games.iter().filter_map(|g| g.outcome_for(*user.id())) {
                tallies
                    .entry(user.username().clone())
                    .or_insert_with(|| LeaderboardEntry::new(user.username().clone()))
                    .tally(outcome);
            }
        }

        let entries: Vec<LeaderboardEntry> = tallies.into_values().collect();
        info!(players = entries.len(), games = games.len(), "Leaderboard computed");
        Ok(entries)
    }
}

impl ResultStore for GameRepository {
    #[instrument(skip(self))]
    fn record_result(&self, result: &GameResult) -> Result<(), DbError> {
        let (Some(player_x), Some(player_o)) = (*result.player_x(), *result.player_o()) else {
            return Err(DbError::new(
                DbErrorKind::Unattributable,
                "both seats need a known user to record a game",
            ));
        };
        let winner = result.winner_id().unwrap_or(DRAW_WINNER_ID);
        self.record_game(NewGameRecord::new(player_x, player_o, winner))
            .map(|_| ())
    }
}
