//! Running win/draw counters.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tictactoe_core::{Outcome, Player};
use tracing::{instrument, warn};

/// Aggregate counters over finished games.
///
/// Serialized as `{ totalGames, xWins, oWins, draws }`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    total_games: u32,
    x_wins: u32,
    o_wins: u32,
    draws: u32,
}

impl Statistics {
    /// Creates statistics with explicit counters.
    #[instrument]
    pub fn new(total_games: u32, x_wins: u32, o_wins: u32, draws: u32) -> Self {
        Self {
            total_games,
            x_wins,
            o_wins,
            draws,
        }
    }

    /// Counts a finished game and returns whether it was counted.
    ///
    /// `InProgress` is ignored. A game that would overflow a counter is not
    /// counted and every counter keeps its value.
    #[instrument(skip(self))]
    pub fn record(&mut self, outcome: Outcome) -> bool {
        let counter = match outcome {
            Outcome::InProgress => return false,
            Outcome::Won(Player::X) => &mut self.x_wins,
            Outcome::Won(Player::O) => &mut self.o_wins,
            Outcome::Draw => &mut self.draws,
        };
        let (Some(count), Some(total)) = (counter.checked_add(1), self.total_games.checked_add(1))
        else {
            warn!(total_games = self.total_games, "Statistics counter full; game not counted");
            return false;
        };
        *counter = count;
        self.total_games = total;
        true
    }

    /// Wins for `player`.
    pub fn wins(&self, player: Player) -> u32 {
        match player {
            Player::X => self.x_wins,
            Player::O => self.o_wins,
        }
    }

    /// Win rate for `player` as a percentage (0.0–100.0).
    #[instrument(skip(self))]
    pub fn win_rate(&self, player: Player) -> f64 {
        if self.total_games == 0 {
            0.0
        } else {
            (self.wins(player) as f64 / self.total_games as f64) * 100.0
        }
    }

    /// Draw rate as a percentage (0.0–100.0).
    pub fn draw_rate(&self) -> f64 {
        if self.total_games == 0 {
            0.0
        } else {
            (self.draws as f64 / self.total_games as f64) * 100.0
        }
    }

    /// True when the counters add up: every game is exactly one win or draw.
    pub fn is_consistent(&self) -> bool {
        self.x_wins as u64 + self.o_wins as u64 + self.draws as u64 == self.total_games as u64
    }
}
