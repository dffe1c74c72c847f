//! Turn invariant: the player to move follows from the mark counts.

use super::super::{GameEngine, Outcome, Player};
use super::Invariant;

/// Invariant: while the game is in progress, X is to move exactly when
/// both players have the same number of marks.
///
/// Finished games keep the last mover as `current_player`, so the check
/// flips for them, and a won game's last mover is its winner.
pub struct TurnMatchesMarksInvariant;

impl Invariant<GameEngine> for TurnMatchesMarksInvariant {
    fn holds(engine: &GameEngine) -> bool {
        let next = Player::for_move_number(engine.board().filled());
        match engine.outcome() {
            Outcome::InProgress => engine.current_player() == next,
            Outcome::Draw => engine.current_player() == next.opponent(),
            // The winner made the last move.
            Outcome::Won(winner) => {
                engine.current_player() == next.opponent() && engine.current_player() == winner
            }
        }
    }

    fn description() -> &'static str {
        "Current player matches the number of marks on the board"
    }
}
