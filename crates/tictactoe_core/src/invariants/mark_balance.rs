//! Mark balance invariant: X has as many marks as O, or exactly one more.

use super::super::{Board, GameEngine, Player};
use super::Invariant;
use tracing::warn;

/// Invariant: `count(X) == count(O)` or `count(X) == count(O) + 1`.
///
/// X always moves first and players alternate, so no other
/// count difference is reachable.
pub struct MarkBalanceInvariant;

impl MarkBalanceInvariant {
    /// Checks the invariant directly on a board.
    pub fn holds_for(board: &Board) -> bool {
        let x_count = board.count(Player::X);
        let o_count = board.count(Player::O);
        let valid = x_count == o_count || x_count == o_count + 1;
        if !valid {
            warn!(x_count, o_count, "Mark balance violated");
        }
        valid
    }
}

impl Invariant<GameEngine> for MarkBalanceInvariant {
    fn holds(engine: &GameEngine) -> bool {
        Self::holds_for(engine.board())
    }

    fn description() -> &'static str {
        "X has as many marks as O or exactly one more"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Position, Square};

    #[test]
    fn test_empty_board_holds() {
        assert!(MarkBalanceInvariant::holds_for(&Board::new()));
    }

    #[test]
    fn test_o_ahead_violates() {
        let mut board = Board::new();
        board.set(Position::Center, Square::Occupied(Player::O));
        assert!(!MarkBalanceInvariant::holds_for(&board));
    }

    #[test]
    fn test_x_two_ahead_violates() {
        let mut board = Board::new();
        board.set(Position::Center, Square::Occupied(Player::X));
        board.set(Position::TopLeft, Square::Occupied(Player::X));
        assert!(!MarkBalanceInvariant::holds_for(&board));
    }
}
