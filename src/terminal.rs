//! Plain-text front end: re-renders the whole board after every change.

use crate::recorder::GameRecord;
use crate::session::{SessionEvent, SessionListener};
use crate::stats::Statistics;
use std::io::Write;
use tictactoe_core::{Player, Position, Snapshot};
use tracing::{instrument, warn};

/// One line of player input during `play`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayInput {
    /// Place a mark at a 0-based index.
    Move(usize),
    /// Start a new game.
    NewGame,
    /// Take back the last move.
    Undo,
    /// Leave the game.
    Quit,
}

/// Parses a line: `1`-`9` or a label such as `center` for a square, `n`,
/// `u` or `q`.
///
/// Squares are numbered from 1 the way [`Board::display`](tictactoe_core::Board::display)
/// shows them.
#[instrument]
pub fn parse_input(line: &str) -> Option<PlayInput> {
    match line.trim().to_lowercase().as_str() {
        "q" | "quit" => Some(PlayInput::Quit),
        "n" | "new" => Some(PlayInput::NewGame),
        "u" | "undo" => Some(PlayInput::Undo),
        other => match other.parse::<usize>() {
            Ok(n @ 1..=9) => Some(PlayInput::Move(n - 1)),
            Ok(_) => None,
            Err(_) => Position::from_label(other).map(|pos| PlayInput::Move(pos.to_index())),
        },
    }
}

/// Board grid followed by a status line.
pub fn render_snapshot(snapshot: &Snapshot) -> String {
    format!("{}\n\n{}", snapshot.board().display(), snapshot.status_string())
}

/// Statistics table with win rates.
pub fn render_statistics(stats: &Statistics) -> String {
    format!(
        "Total games: {}\nX wins:      {} ({:.1}%)\nO wins:      {} ({:.1}%)\nDraws:       {} ({:.1}%)",
        stats.total_games(),
        stats.x_wins(),
        stats.win_rate(Player::X),
        stats.o_wins(),
        stats.win_rate(Player::O),
        stats.draws(),
        stats.draw_rate(),
    )
}

/// Finished-game log, one line per game, oldest first.
pub fn render_history(history: &[GameRecord]) -> String {
    if history.is_empty() {
        return "No finished games yet.".to_string();
    }
    history
        .iter()
        .enumerate()
        .map(|(n, record)| format!("{:>3}. {:<4} {}", n + 1, record.winner(), record.date()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Writes a full re-render to `out` for every session event.
#[derive(Debug)]
pub struct TerminalRenderer<W: Write> {
    out: W,
}

impl<W: Write> TerminalRenderer<W> {
    /// Creates a renderer writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn text_for(event: &SessionEvent) -> String {
        match event {
            SessionEvent::MoveApplied(mv, snapshot) => {
                format!("{}\n\n{}", mv, render_snapshot(snapshot))
            }
            SessionEvent::MoveUndone(snapshot)
            | SessionEvent::NewGame(snapshot) => render_snapshot(snapshot),
            SessionEvent::MoveRejected(e) => format!("Invalid move: {}", e),
            SessionEvent::GameFinished(record) => {
                format!("Game recorded: {} ({})", record.winner(), record.date())
            }
            SessionEvent::StatisticsReset => "Statistics reset.".to_string(),
        }
    }
}

impl<W: Write> SessionListener for TerminalRenderer<W> {
    fn on_event(&mut self, event: &SessionEvent) {
        if let Err(e) = writeln!(self.out, "\n{}", Self::text_for(event)) {
            warn!(error = %e, "Failed to write to terminal");
        }
    }
}
