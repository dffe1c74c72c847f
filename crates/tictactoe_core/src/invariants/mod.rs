//! First-class invariants for tic-tac-toe.
//!
//! Invariants are logical properties that must hold throughout game execution.
//! The engine checks them after every move in debug builds and whenever a
//! game is rebuilt from persisted state.

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of one or more invariants.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("Invariant violation: {}", descriptions.join("; "))]
pub struct InvariantViolation {
    /// Descriptions of the violated invariants.
    pub descriptions: Vec<String>,
}

impl InvariantViolation {
    /// Creates a violation for a single invariant.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            descriptions: vec![description.into()],
        }
    }
}

impl std::error::Error for InvariantViolation {}

/// A set of invariants that can be checked together.
///
/// Implementations are provided for tuples.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), InvariantViolation>;
}

fn collect(violations: Vec<&'static str>) -> Result<(), InvariantViolation> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(InvariantViolation {
            descriptions: violations.into_iter().map(String::from).collect(),
        })
    }
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), InvariantViolation> {
        let mut violations = Vec::new();
        if !I1::holds(state) {
            violations.push(I1::description());
        }
        if !I2::holds(state) {
            violations.push(I2::description());
        }
        collect(violations)
    }
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), InvariantViolation> {
        let mut violations = Vec::new();
        if !I1::holds(state) {
            violations.push(I1::description());
        }
        if !I2::holds(state) {
            violations.push(I2::description());
        }
        if !I3::holds(state) {
            violations.push(I3::description());
        }
        collect(violations)
    }
}

pub mod mark_balance;
pub mod outcome_matches_board;
pub mod turn_matches_marks;

pub use mark_balance::MarkBalanceInvariant;
pub use outcome_matches_board::OutcomeMatchesBoardInvariant;
pub use turn_matches_marks::TurnMatchesMarksInvariant;

/// All engine invariants as a composable set.
pub type EngineInvariants = (
    MarkBalanceInvariant,
    TurnMatchesMarksInvariant,
    OutcomeMatchesBoardInvariant,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameEngine;

    #[test]
    fn test_invariant_set_holds_for_new_game() {
        assert!(EngineInvariants::check_all(&GameEngine::new()).is_ok());
    }

    #[test]
    fn test_invariant_set_holds_after_moves() {
        let mut engine = GameEngine::new();
        for index in [0, 4, 2] {
            engine.apply_move(index).unwrap();
        }
        assert!(EngineInvariants::check_all(&engine).is_ok());
    }

    #[test]
    fn test_two_invariants_as_set() {
        type TwoInvariants = (MarkBalanceInvariant, TurnMatchesMarksInvariant);
        assert!(TwoInvariants::check_all(&GameEngine::new()).is_ok());
    }

    #[test]
    fn test_violation_display_joins_descriptions() {
        let violation = InvariantViolation {
            descriptions: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(violation.to_string(), "Invariant violation: a; b");
    }
}
