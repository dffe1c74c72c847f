//! Finished-game history and statistics.

use crate::persisted::board_format;
use crate::stats::Statistics;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tictactoe_core::{Board, Outcome, Player};
use tracing::{debug, info, instrument};

/// Result of a finished game as stored in a [`GameRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum Winner {
    /// X completed a line.
    X,
    /// O completed a line.
    O,
    /// Full board, no line.
    Draw,
}

impl Winner {
    /// Maps a terminal outcome to its stored form, `None` while in progress.
    pub fn from_outcome(outcome: Outcome) -> Option<Self> {
        match outcome {
            Outcome::InProgress => None,
            Outcome::Won(Player::X) => Some(Winner::X),
            Outcome::Won(Player::O) => Some(Winner::O),
            Outcome::Draw => Some(Winner::Draw),
        }
    }

    /// Maps back to the outcome it was recorded from.
    pub fn outcome(self) -> Outcome {
        match self {
            Winner::X => Outcome::Won(Player::X),
            Winner::O => Outcome::Won(Player::O),
            Winner::Draw => Outcome::Draw,
        }
    }
}

/// One finished game: final board, result and when it ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct GameRecord {
    winner: Winner,
    #[serde(with = "board_format")]
    board: Board,
    date: String,
}

impl GameRecord {
    /// Creates a record with an explicit timestamp.
    pub fn new(winner: Winner, board: Board, date: impl Into<String>) -> Self {
        Self {
            winner,
            board,
            date: date.into(),
        }
    }

    /// Creates a record stamped with the current local time.
    #[instrument(skip(board))]
    pub fn now(winner: Winner, board: Board) -> Self {
        let date = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        Self::new(winner, board, date)
    }
}

/// Keeps the finished-game log and the running statistics.
///
/// Fed once per game, when its outcome turns terminal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters)]
pub struct SessionRecorder {
    history: Vec<GameRecord>,
    statistics: Statistics,
}

impl SessionRecorder {
    /// Creates an empty recorder.
    #[instrument]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a recorder resuming from stored history and statistics.
    #[instrument(skip(history), fields(history = history.len()))]
    pub fn with_state(history: Vec<GameRecord>, statistics: Statistics) -> Self {
        Self {
            history,
            statistics,
        }
    }

    /// Records a finished game.
    ///
    /// Returns the appended record, or `None` when `outcome` is
    /// `InProgress` (nothing is recorded).
    #[instrument(skip(self, board))]
    pub fn record(&mut self, board: &Board, outcome: Outcome) -> Option<&GameRecord> {
        let winner = Winner::from_outcome(outcome)?;
        self.statistics.record(outcome);
        self.history.push(GameRecord::now(winner, board.clone()));
        info!(
            %winner,
            total_games = self.statistics.total_games(),
            "Game recorded"
        );
        self.history.last()
    }

    /// Zeroes every counter and clears the history.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        debug!(cleared = self.history.len(), "Resetting recorder");
        self.history.clear();
        self.statistics = Statistics::default();
    }
}
