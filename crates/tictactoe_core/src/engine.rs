//! Tic-tac-toe game engine.
//!
//! The engine owns the board, the player to move and the current outcome.
//! The outcome is recomputed from the board after every accepted move and is
//! never set any other way. Once it is terminal, every move is rejected until
//! [`GameEngine::new_game`] is called.

use super::action::MoveError;
use super::invariants::{EngineInvariants, InvariantSet, InvariantViolation};
use super::{Board, Outcome, Player, Position, Snapshot, Square, rules};
use tracing::{debug, instrument, warn};

/// Tic-tac-toe game engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEngine {
    board: Board,
    current_player: Player,
    outcome: Outcome,
}

impl GameEngine {
    /// Creates a new game: empty board, X to move.
    #[instrument]
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            current_player: Player::X,
            outcome: Outcome::InProgress,
        }
    }

    /// Rebuilds an engine from a stored board and player to move.
    ///
    /// The outcome is derived from the board. Fails if the board could not
    /// have been reached by alternating play from an empty board, or if
    /// `current_player` disagrees with the mark counts.
    #[instrument(skip(board))]
    pub fn restore(board: Board, current_player: Player) -> Result<Self, InvariantViolation> {
        let outcome = rules::evaluate(&board);
        let engine = Self {
            board,
            current_player,
            outcome,
        };
        EngineInvariants::check_all(&engine)?;
        debug!(?outcome, ?current_player, "Engine restored");
        Ok(engine)
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the player to move, or the last mover once the game is over.
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Returns the current outcome.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Returns the `(board, outcome, current_player)` triple.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.board.clone(), self.outcome, self.current_player)
    }

    /// Places the current player's mark at `index` (0-8).
    ///
    /// # Errors
    ///
    /// Rejected without touching any state when the index is out of bounds,
    /// the game is already over, or the square is occupied.
    #[instrument(skip(self))]
    pub fn apply_move(&mut self, index: usize) -> Result<Snapshot, MoveError> {
        let pos = Position::from_index(index).ok_or_else(|| {
            warn!(index, "Move rejected: out of bounds");
            MoveError::OutOfBounds(index)
        })?;
        self.place(pos)
    }

    /// Places the current player's mark at `pos`.
    ///
    /// # Errors
    ///
    /// Rejected without touching any state when the game is already over or
    /// the square is occupied.
    #[instrument(skip(self), fields(player = ?self.current_player))]
    pub fn place(&mut self, pos: Position) -> Result<Snapshot, MoveError> {
        if self.outcome.is_terminal() {
            warn!(%pos, outcome = ?self.outcome, "Move rejected: game is over");
            return Err(MoveError::GameOver);
        }

        if !self.board.is_empty(pos) {
            warn!(%pos, "Move rejected: square occupied");
            return Err(MoveError::SquareOccupied(pos));
        }

        self.board.set(pos, Square::Occupied(self.current_player));
        self.outcome = rules::evaluate(&self.board);

        if !self.outcome.is_terminal() {
            self.current_player = self.current_player.opponent();
        }

        debug_assert!(
            EngineInvariants::check_all(self).is_ok(),
            "engine invariants violated after move at {}",
            pos
        );

        debug!(%pos, outcome = ?self.outcome, next = ?self.current_player, "Move applied");
        Ok(self.snapshot())
    }

    /// Resets to an empty board with X to move.
    #[instrument(skip(self))]
    pub fn new_game(&mut self) -> Snapshot {
        *self = Self::new();
        debug!("New game started");
        self.snapshot()
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}
