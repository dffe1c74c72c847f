//! A playing session: one active game, its boards, history and statistics.
//!
//! The session owns every piece of mutable state and an injected
//! [`KeyValueStore`]. State is read once in [`Session::open`] and written
//! after every change. Storage failures and corrupt stored values are logged
//! and the session carries on in memory; nothing here is fatal.

use crate::persisted::{PersistedGameState, RestoredGame};
use crate::recorder::{GameRecord, SessionRecorder};
use crate::stats::Statistics;
use crate::store::{KeyValueStore, MemoryStore};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tictactoe_core::{
    Board, GameEngine, Move, MoveError, Outcome, Player, Position, Snapshot, Square,
};
use tracing::{debug, info, instrument, warn};

/// Keys under which a session stores its values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_new::new)]
pub struct StorageKeys {
    game_state: String,
    statistics: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            game_state: "gameState".to_string(),
            statistics: "statistics".to_string(),
        }
    }
}

/// State change announced to listeners.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A move was accepted: who played where, and the resulting state.
    MoveApplied(Move, Snapshot),
    /// A move was rejected; nothing changed.
    MoveRejected(MoveError),
    /// The last move ended the game and it was recorded.
    GameFinished(GameRecord),
    /// The last move was taken back.
    MoveUndone(Snapshot),
    /// A fresh game started.
    NewGame(Snapshot),
    /// Statistics and history were cleared.
    StatisticsReset,
}

/// Receives [`SessionEvent`]s, typically a renderer.
pub trait SessionListener {
    /// Called after the session state has changed (or a move was rejected).
    fn on_event(&mut self, event: &SessionEvent);
}

impl<F: FnMut(&SessionEvent)> SessionListener for F {
    fn on_event(&mut self, event: &SessionEvent) {
        self(event)
    }
}

/// One player's session across any number of games.
pub struct Session<S: KeyValueStore> {
    engine: GameEngine,
    /// Board the move list starts from; empty unless resumed without a move order.
    base: Board,
    moves: Vec<Position>,
    recorder: SessionRecorder,
    store: S,
    keys: StorageKeys,
    persistent: bool,
    listeners: Vec<Box<dyn SessionListener>>,
}

impl<S: KeyValueStore> std::fmt::Debug for Session<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("engine", &self.engine)
            .field("moves", &self.moves)
            .field("recorder", &self.recorder)
            .field("keys", &self.keys)
            .field("persistent", &self.persistent)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl Session<MemoryStore> {
    /// Creates a session that only lives in memory.
    #[instrument]
    pub fn in_memory() -> Self {
        Self::open(MemoryStore::new(), StorageKeys::default())
    }
}

impl<S: KeyValueStore> Session<S> {
    /// Opens a session, resuming whatever `store` holds under `keys`.
    ///
    /// Missing values start fresh. If the store cannot be read the session
    /// runs in memory only. A stored value that fails to parse or validate
    /// is discarded and that part starts fresh.
    #[instrument(skip(store))]
    pub fn open(store: S, keys: StorageKeys) -> Self {
        let mut session = Self {
            engine: GameEngine::new(),
            base: Board::new(),
            moves: Vec::new(),
            recorder: SessionRecorder::new(),
            store,
            keys,
            persistent: true,
            listeners: Vec::new(),
        };

        let statistics = session.load_statistics();
        let history = match session.load_game_state() {
            Some(RestoredGame {
                engine,
                moves,
                history,
            }) => {
                match moves {
                    Some(moves) => session.moves = moves,
                    None => session.base = engine.board().clone(),
                }
                session.engine = engine;
                history
            }
            None => Vec::new(),
        };
        session.recorder = SessionRecorder::with_state(history, statistics);

        info!(
            persistent = session.persistent,
            outcome = ?session.engine.outcome(),
            total_games = session.recorder.statistics().total_games(),
            "Session opened"
        );
        session
    }

    fn load_statistics(&mut self) -> Statistics {
        let key = self.keys.statistics.clone();
        let Some(json) = self.read(&key) else {
            return Statistics::default();
        };
        match serde_json::from_str::<Statistics>(&json) {
            Ok(stats) if stats.is_consistent() => {
                debug!(?stats, "Statistics loaded");
                stats
            }
            Ok(stats) => {
                warn!(?stats, "Stored statistics do not add up; discarding");
                Statistics::default()
            }
            Err(e) => {
                warn!(error = %e, "Corrupt stored statistics; discarding");
                Statistics::default()
            }
        }
    }

    fn load_game_state(&mut self) -> Option<RestoredGame> {
        let key = self.keys.game_state.clone();
        let json = self.read(&key)?;
        match PersistedGameState::from_json(&json).and_then(PersistedGameState::restore) {
            Ok(restored) => Some(restored),
            Err(e) => {
                warn!(error = %e, "Corrupt stored game state; starting a fresh game");
                None
            }
        }
    }

    /// Reads `key`, switching to in-memory mode if the store is unavailable.
    fn read(&mut self, key: &str) -> Option<String> {
        if !self.persistent {
            return None;
        }
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, key, "Storage unavailable; continuing in memory");
                self.persistent = false;
                None
            }
        }
    }

    /// Writes `key`, switching to in-memory mode if the store is unavailable.
    fn write(&mut self, key: &str, value: &str) {
        if !self.persistent {
            return;
        }
        if let Err(e) = self.store.set(key, value) {
            warn!(error = %e, key, "Storage unavailable; continuing in memory");
            self.persistent = false;
        }
    }

    fn save_game_state(&mut self) {
        if !self.persistent {
            return;
        }
        // A move order only replays from an empty board.
        let moves: &[Position] = if self.base.filled() == 0 {
            &self.moves
        } else {
            &[]
        };
        let state = PersistedGameState::capture(&self.engine, moves, self.recorder.history());
        match state.to_json() {
            Ok(json) => {
                let key = self.keys.game_state.clone();
                self.write(&key, &json);
            }
            Err(e) => warn!(error = %e, "Could not serialize game state"),
        }
    }

    fn save_statistics(&mut self) {
        if !self.persistent {
            return;
        }
        match serde_json::to_string(self.recorder.statistics()) {
            Ok(json) => {
                let key = self.keys.statistics.clone();
                self.write(&key, &json);
            }
            Err(e) => warn!(error = %e, "Could not serialize statistics"),
        }
    }

    fn emit(&mut self, event: SessionEvent) {
        for listener in &mut self.listeners {
            listener.on_event(&event);
        }
    }

    /// Registers a listener for every subsequent state change.
    pub fn subscribe(&mut self, listener: impl SessionListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Places the current player's mark at `index` (0-8).
    ///
    /// When the move ends the game it is recorded in the history and
    /// statistics. State is persisted before listeners are notified.
    ///
    /// # Errors
    ///
    /// Returns the engine's rejection; the session is left unchanged.
    #[instrument(skip(self))]
    pub fn apply_move(&mut self, index: usize) -> Result<Snapshot, MoveError> {
        let player = self.engine.current_player();
        let result = Position::from_index(index)
            .ok_or(MoveError::OutOfBounds(index))
            .and_then(|pos| self.engine.place(pos).map(|snapshot| (pos, snapshot)));

        let (pos, snapshot) = match result {
            Ok(applied) => applied,
            Err(e) => {
                info!(index, error = %e, "Move ignored");
                self.emit(SessionEvent::MoveRejected(e));
                return Err(e);
            }
        };

        self.moves.push(pos);
        let record = self
            .recorder
            .record(snapshot.board(), *snapshot.outcome())
            .cloned();

        self.save_game_state();
        if record.is_some() {
            self.save_statistics();
        }

        self.emit(SessionEvent::MoveApplied(Move::new(player, pos), snapshot.clone()));
        if let Some(record) = record {
            self.emit(SessionEvent::GameFinished(record));
        }
        Ok(snapshot)
    }

    /// Takes back the last move of an unfinished game.
    ///
    /// Returns `None` when there is nothing to take back or the game has
    /// already finished and been recorded.
    #[instrument(skip(self))]
    pub fn undo(&mut self) -> Option<Snapshot> {
        if self.engine.outcome().is_terminal() {
            debug!("Undo ignored: game already recorded");
            return None;
        }
        let last = self.moves.pop()?;

        let mut board = self.engine.board().clone();
        board.set(last, Square::Empty);
        let player = Player::for_move_number(board.filled());
        match GameEngine::restore(board, player) {
            Ok(engine) => self.engine = engine,
            Err(e) => {
                warn!(error = %e, "Undo produced an invalid board; keeping current state");
                self.moves.push(last);
                return None;
            }
        }

        let snapshot = self.engine.snapshot();
        self.save_game_state();
        self.emit(SessionEvent::MoveUndone(snapshot.clone()));
        Some(snapshot)
    }

    /// Starts a new game. History and statistics are kept.
    #[instrument(skip(self))]
    pub fn new_game(&mut self) -> Snapshot {
        let snapshot = self.engine.new_game();
        self.base = Board::new();
        self.moves.clear();
        self.save_game_state();
        self.emit(SessionEvent::NewGame(snapshot.clone()));
        snapshot
    }

    /// Zeroes statistics and clears history, only when `confirmed`.
    ///
    /// Returns whether anything was reset.
    #[instrument(skip(self))]
    pub fn reset_statistics(&mut self, confirmed: bool) -> bool {
        if !confirmed {
            info!("Statistics reset not confirmed; keeping statistics");
            return false;
        }
        self.recorder.reset();
        self.save_statistics();
        self.save_game_state();
        self.emit(SessionEvent::StatisticsReset);
        true
    }

    /// Outcome of the active game.
    pub fn outcome(&self) -> Outcome {
        self.engine.outcome()
    }

    /// The `(board, outcome, current_player)` triple of the active game.
    pub fn snapshot(&self) -> Snapshot {
        self.engine.snapshot()
    }

    /// The active game's engine.
    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    /// Running statistics.
    pub fn statistics(&self) -> &Statistics {
        self.recorder.statistics()
    }

    /// Finished-game log, oldest first.
    pub fn history(&self) -> &[GameRecord] {
        self.recorder.history()
    }

    /// Boards of the active game in order, ending with the current board.
    ///
    /// Starts with the empty board, or with the resumed board when the
    /// session was restored without a move order.
    pub fn boards(&self) -> Vec<Board> {
        let mut board = self.base.clone();
        let first = self.base.filled();
        let mut boards = Vec::with_capacity(self.moves.len() + 1);
        boards.push(board.clone());
        for (n, pos) in self.moves.iter().enumerate() {
            board.set(*pos, Square::Occupied(Player::for_move_number(first + n)));
            boards.push(board.clone());
        }
        boards
    }

    /// Whether state is still being written to the store.
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    /// The store this session writes to.
    pub fn store(&self) -> &S {
        &self.store
    }
}
