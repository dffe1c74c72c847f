//! The stored outcome is the one the rules derive from the board.

use super::super::{GameEngine, rules};
use super::Invariant;

/// Invariant: `outcome == evaluate(board)`.
pub struct OutcomeMatchesBoardInvariant;

impl Invariant<GameEngine> for OutcomeMatchesBoardInvariant {
    fn holds(engine: &GameEngine) -> bool {
        engine.outcome() == rules::evaluate(engine.board())
    }

    fn description() -> &'static str {
        "Outcome is derived from the board"
    }
}
