//! Pure tic-tac-toe game logic.
//!
//! - [`GameEngine`] owns one game: board, player to move, outcome.
//! - [`rules`] holds the stateless win/draw evaluation shared by every caller.
//! - [`invariants`] states what every reachable engine state satisfies.
//!
//! Nothing in this crate performs I/O.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod engine;
mod outcome;
mod position;
mod types;

pub mod invariants;
pub mod rules;

pub use action::{Move, MoveError};
pub use engine::GameEngine;
pub use invariants::InvariantViolation;
pub use outcome::{Outcome, Snapshot};
pub use position::Position;
pub use rules::evaluate;
pub use types::{Board, Player, Square};
