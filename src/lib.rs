//! Tic-tac-toe sessions: persisted game state, history and statistics.
//!
//! # Architecture
//!
//! - **Engine**: rules and game state live in `tictactoe_core`, re-exported here
//! - **Session**: one active game plus history and statistics, persisted after every change
//! - **Store**: the key-value interface a session persists through (file or memory)
//! - **Timeline**: time-travel view over every board of a game
//! - **Terminal**: the plain-text front end used by the `tictactoe` binary
//!
//! # Example
//!
//! ```
//! use tictactoe_session::{Outcome, Player, Session};
//!
//! let mut session = Session::in_memory();
//! for index in [0, 4, 1, 5, 2] {
//!     session.apply_move(index).unwrap();
//! }
//! assert_eq!(session.outcome(), Outcome::Won(Player::X));
//! assert_eq!(*session.statistics().x_wins(), 1);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod persisted;
mod recorder;
mod session;
mod stats;
mod store;
mod terminal;
mod timeline;

// Crate-level exports - Configuration
pub use config::{ConfigError, DATA_DIR_ENV, SessionConfig};

// Crate-level exports - Persistence
pub use persisted::{PersistedGameState, PersistedStateError, RestoredGame, board_format};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};

// Crate-level exports - Session management
pub use recorder::{GameRecord, SessionRecorder, Winner};
pub use session::{Session, SessionEvent, SessionListener, StorageKeys};
pub use stats::Statistics;
pub use timeline::Timeline;

// Crate-level exports - Terminal front end
pub use terminal::{
    PlayInput, TerminalRenderer, parse_input, render_history, render_snapshot, render_statistics,
};

// Crate-level exports - Game types
pub use tictactoe_core::{
    Board, GameEngine, InvariantViolation, Move, MoveError, Outcome, Player, Position, Snapshot,
    Square, evaluate, invariants, rules,
};
