//! Persisted layout of the `gameState` and `statistics` values.
//!
//! Boards are stored as nine strings, `"X"`, `"O"` or `""`. A stored game
//! state is only accepted if its board is reachable by alternating play and
//! its `gameOver`/`winner` fields agree with what the rules derive from the
//! board.

use crate::recorder::{GameRecord, Winner};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tictactoe_core::{Board, GameEngine, InvariantViolation, Player, Position, Square};
use tracing::{debug, instrument};

/// Serde adapter storing a [`Board`] as nine `"X"`/`"O"`/`""` strings.
pub mod board_format {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use tictactoe_core::{Board, Player, Square};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    enum StoredSquare {
        #[serde(rename = "X")]
        X,
        #[serde(rename = "O")]
        O,
        #[serde(rename = "")]
        Empty,
    }

    impl From<Square> for StoredSquare {
        fn from(square: Square) -> Self {
            match square {
                Square::Empty => StoredSquare::Empty,
                Square::Occupied(Player::X) => StoredSquare::X,
                Square::Occupied(Player::O) => StoredSquare::O,
            }
        }
    }

    impl From<StoredSquare> for Square {
        fn from(square: StoredSquare) -> Self {
            match square {
                StoredSquare::Empty => Square::Empty,
                StoredSquare::X => Square::Occupied(Player::X),
                StoredSquare::O => Square::Occupied(Player::O),
            }
        }
    }

    /// Serializes a board as nine strings.
    pub fn serialize<S: Serializer>(board: &Board, serializer: S) -> Result<S::Ok, S::Error> {
        let squares: [Square; 9] = *board.squares();
        squares.map(StoredSquare::from).serialize(serializer)
    }

    /// Deserializes a board from exactly nine strings.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Board, D::Error> {
        let stored = <[StoredSquare; 9]>::deserialize(deserializer)?;
        Ok(Board::from_squares(stored.map(Square::from)))
    }
}

/// A persisted value could not be used and was discarded.
#[derive(Debug, Clone, Display, Error)]
#[display("Corrupt persisted state: {} at {}:{}", message, file, line)]
pub struct PersistedStateError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl PersistedStateError {
    /// Creates a new error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<serde_json::Error> for PersistedStateError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("JSON error: {}", err))
    }
}

impl From<InvariantViolation> for PersistedStateError {
    #[track_caller]
    fn from(err: InvariantViolation) -> Self {
        Self::new(err.to_string())
    }
}

/// The `gameState` value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedGameState {
    /// Current board.
    #[serde(with = "board_format")]
    pub board: Board,
    /// Player to move, or the last mover once the game is over.
    pub current_player: Player,
    /// Whether the current game has finished.
    pub game_over: bool,
    /// Result of the current game once it has finished.
    pub winner: Option<Winner>,
    /// Finished-game log.
    #[serde(default)]
    pub history: Vec<GameRecord>,
    /// Order of the moves on the current board, as 0-based indices.
    ///
    /// Optional: state written without it still loads, the session then
    /// starts its board list at the loaded board.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub moves: Vec<usize>,
}

/// A validated game state ready to resume.
#[derive(Debug, Clone)]
pub struct RestoredGame {
    /// Engine rebuilt from the stored board.
    pub engine: GameEngine,
    /// Move order, when it was stored and replays to the same board.
    pub moves: Option<Vec<Position>>,
    /// Finished-game log.
    pub history: Vec<GameRecord>,
}

impl PersistedGameState {
    /// Captures the persisted form of a running session.
    #[instrument(skip_all)]
    pub fn capture(engine: &GameEngine, moves: &[Position], history: &[GameRecord]) -> Self {
        let outcome = engine.outcome();
        Self {
            board: engine.board().clone(),
            current_player: engine.current_player(),
            game_over: outcome.is_terminal(),
            winner: Winner::from_outcome(outcome),
            history: history.to_vec(),
            moves: moves.iter().map(|pos| pos.to_index()).collect(),
        }
    }

    /// Parses a stored JSON value.
    #[instrument(skip(json), fields(len = json.len()))]
    pub fn from_json(json: &str) -> Result<Self, PersistedStateError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes to the stored JSON value.
    pub fn to_json(&self) -> Result<String, PersistedStateError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Validates the stored state and rebuilds the engine.
    ///
    /// # Errors
    ///
    /// Fails when the board is unreachable, the player to move disagrees
    /// with the board, or `gameOver`/`winner` disagree with the outcome the
    /// rules derive.
    #[instrument(skip(self))]
    pub fn restore(self) -> Result<RestoredGame, PersistedStateError> {
        let engine = GameEngine::restore(self.board, self.current_player)?;
        let outcome = engine.outcome();

        if self.game_over != outcome.is_terminal() {
            return Err(PersistedStateError::new(format!(
                "gameOver is {} but the board is {:?}",
                self.game_over, outcome
            )));
        }
        if self.winner != Winner::from_outcome(outcome) {
            return Err(PersistedStateError::new(format!(
                "winner is {:?} but the board is {:?}",
                self.winner, outcome
            )));
        }

        let moves = replay_moves(&self.moves, engine.board());
        debug!(
            outcome = ?outcome,
            history = self.history.len(),
            moves_known = moves.is_some(),
            "Game state restored"
        );

        Ok(RestoredGame {
            engine,
            moves,
            history: self.history,
        })
    }
}

/// Returns the move order if replaying `indices` from an empty board
/// produces exactly `board`.
fn replay_moves(indices: &[usize], board: &Board) -> Option<Vec<Position>> {
    let mut replayed = Board::new();
    let mut moves = Vec::with_capacity(indices.len());
    for (n, &index) in indices.iter().enumerate() {
        let pos = Position::from_index(index)?;
        if !replayed.is_empty(pos) {
            return None;
        }
        replayed.set(pos, Square::Occupied(Player::for_move_number(n)));
        moves.push(pos);
    }
    (&replayed == board).then_some(moves)
}
