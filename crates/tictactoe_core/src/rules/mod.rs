//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`](crate::Board). Nothing here holds state,
//! so the engine, the time-travel timeline and persisted-state validation
//! all share one definition of a finished game.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::{LINES, check_winner, winning_line};

use super::{Board, Outcome};
use tracing::instrument;

/// Evaluates a board.
///
/// Checks all eight lines in a fixed order and returns `Won` for the first
/// complete line, `Draw` for a full board without one, `InProgress` otherwise.
#[instrument(skip(board), level = "trace")]
pub fn evaluate(board: &Board) -> Outcome {
    if let Some(winner) = check_winner(board) {
        Outcome::Won(winner)
    } else if is_full(board) {
        Outcome::Draw
    } else {
        Outcome::InProgress
    }
}
