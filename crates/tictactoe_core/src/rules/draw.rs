//! Draw detection logic for tic-tac-toe.

use super::super::Board;
use tracing::instrument;

/// Checks if the board is full (all squares occupied).
///
/// A full board with no winner indicates a draw.
#[instrument(skip(board), level = "trace")]
pub fn is_full(board: &Board) -> bool {
    board.is_full()
}
