//! Game outcome and the renderer-facing snapshot.

use super::{Board, Player};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Outcome of a game, always derived from the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Game is ongoing.
    InProgress,
    /// Game ended with three in a row.
    Won(Player),
    /// Board is full with no winner.
    Draw,
}

impl Outcome {
    /// Returns true once the game has ended.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::InProgress)
    }

    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Player> {
        match self {
            Outcome::Won(player) => Some(*player),
            Outcome::InProgress | Outcome::Draw => None,
        }
    }

    /// Returns true if the game was a draw.
    pub fn is_draw(&self) -> bool {
        matches!(self, Outcome::Draw)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::InProgress => write!(f, "In progress"),
            Outcome::Won(player) => write!(f, "Player {} wins", player),
            Outcome::Draw => write!(f, "Draw"),
        }
    }
}

/// The `(board, outcome, current_player)` triple handed to renderers.
///
/// When the game is over `current_player` is the player who made the last
/// move, which is the winner for a won game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Snapshot {
    board: Board,
    outcome: Outcome,
    current_player: Player,
}

impl Snapshot {
    /// Creates a snapshot.
    pub fn new(board: Board, outcome: Outcome, current_player: Player) -> Self {
        Self {
            board,
            outcome,
            current_player,
        }
    }

    /// Status line for display.
    pub fn status_string(&self) -> String {
        match self.outcome {
            Outcome::InProgress => format!("Player {}'s turn", self.current_player),
            Outcome::Won(player) => format!("Player {} wins!", player),
            Outcome::Draw => "It's a draw!".to_string(),
        }
    }
}
