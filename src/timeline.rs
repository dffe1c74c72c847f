//! Time-travel timeline: every board of a game, any of which can be selected.
//!
//! The player to move at a selected board follows from its index alone
//! (X on even, O on odd). Playing from an earlier board discards every board
//! after it. A terminal outcome returned by [`Timeline::play`] is what a
//! front end hands to a [`SessionRecorder`](crate::SessionRecorder).

use tictactoe_core::{Board, MoveError, Outcome, Player, Position, Square, rules};
use tracing::{debug, instrument, warn};

/// Ordered boards of one game plus the selected index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    boards: Vec<Board>,
    current_move: usize,
}

impl Timeline {
    /// Creates a timeline holding only the empty board.
    #[instrument]
    pub fn new() -> Self {
        Self {
            boards: vec![Board::new()],
            current_move: 0,
        }
    }

    /// All boards, index 0 being the empty board.
    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    /// Index of the selected board.
    pub fn current_move(&self) -> usize {
        self.current_move
    }

    /// The selected board.
    pub fn current_board(&self) -> &Board {
        &self.boards[self.current_move]
    }

    /// Player to move at the selected board.
    pub fn current_player(&self) -> Player {
        Player::for_move_number(self.current_move)
    }

    /// Outcome of the selected board.
    pub fn outcome(&self) -> Outcome {
        rules::evaluate(self.current_board())
    }

    /// Label for the entry at `index` in a move list.
    pub fn label(index: usize) -> String {
        if index == 0 {
            "Go to game start".to_string()
        } else {
            format!("Go to move #{}", index)
        }
    }

    /// Plays `index` on the selected board.
    ///
    /// Boards after the selected one are discarded before the new board is
    /// appended and selected.
    ///
    /// # Errors
    ///
    /// Rejected without change when the index is out of bounds, the selected
    /// board already has a winner, or the square is taken. A full board is
    /// reported as [`MoveError::GameOver`] as well.
    #[instrument(skip(self), fields(current_move = self.current_move))]
    pub fn play(&mut self, index: usize) -> Result<Outcome, MoveError> {
        let pos = Position::from_index(index).ok_or(MoveError::OutOfBounds(index))?;
        let board = self.current_board();

        if self.outcome().is_terminal() {
            warn!(index, "Timeline move rejected: game is over");
            return Err(MoveError::GameOver);
        }
        if !board.is_empty(pos) {
            warn!(index, "Timeline move rejected: square occupied");
            return Err(MoveError::SquareOccupied(pos));
        }

        let mut next = board.clone();
        next.set(pos, Square::Occupied(self.current_player()));

        self.boards.truncate(self.current_move + 1);
        self.boards.push(next);
        self.current_move = self.boards.len() - 1;

        let outcome = self.outcome();
        debug!(index, ?outcome, moves = self.current_move, "Timeline advanced");
        Ok(outcome)
    }

    /// Selects the board at `index`. Returns `None` if there is no such board.
    #[instrument(skip(self))]
    pub fn jump_to(&mut self, index: usize) -> Option<&Board> {
        if index >= self.boards.len() {
            warn!(index, available = self.boards.len(), "Jump target out of range");
            return None;
        }
        self.current_move = index;
        Some(self.current_board())
    }

    /// Returns to a single empty board.
    #[instrument(skip(self))]
    pub fn restart(&mut self) {
        *self = Self::new();
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_timeline() {
        let timeline = Timeline::new();
        assert_eq!(timeline.boards().len(), 1);
        assert_eq!(timeline.current_player(), Player::X);
        assert_eq!(timeline.outcome(), Outcome::InProgress);
    }

    #[test]
    fn test_play_appends_and_alternates() {
        let mut timeline = Timeline::new();
        assert_eq!(timeline.play(4), Ok(Outcome::InProgress));
        assert_eq!(timeline.play(0), Ok(Outcome::InProgress));
        assert_eq!(timeline.boards().len(), 3);
        assert_eq!(timeline.current_board().get(Position::Center), Square::Occupied(Player::X));
        assert_eq!(timeline.current_board().get(Position::TopLeft), Square::Occupied(Player::O));
        assert_eq!(timeline.current_player(), Player::X);
    }

    #[test]
    fn test_jump_derives_player_from_index() {
        let mut timeline = Timeline::new();
        for index in [4, 0, 8] {
            timeline.play(index).unwrap();
        }
        assert!(timeline.jump_to(1).is_some());
        assert_eq!(timeline.current_player(), Player::O);
        assert!(timeline.jump_to(0).is_some());
        assert_eq!(timeline.current_player(), Player::X);
        assert!(timeline.jump_to(4).is_none());
        assert_eq!(timeline.current_move(), 0);
    }

    #[test]
    fn test_play_after_jump_discards_future() {
        let mut timeline = Timeline::new();
        for index in [4, 0, 8] {
            timeline.play(index).unwrap();
        }
        timeline.jump_to(1);
        timeline.play(2).unwrap();
        assert_eq!(timeline.boards().len(), 3);
        assert_eq!(timeline.current_move(), 2);
        assert!(timeline.current_board().is_empty(Position::TopLeft));
        assert_eq!(timeline.current_board().get(Position::TopRight), Square::Occupied(Player::O));
    }

    #[test]
    fn test_win_blocks_further_play() {
        let mut timeline = Timeline::new();
        for index in [0, 4, 1, 5] {
            timeline.play(index).unwrap();
        }
        assert_eq!(timeline.play(2), Ok(Outcome::Won(Player::X)));
        assert_eq!(timeline.play(8), Err(MoveError::GameOver));
        assert_eq!(timeline.boards().len(), 6);
    }

    #[test]
    fn test_occupied_square_rejected() {
        let mut timeline = Timeline::new();
        timeline.play(0).unwrap();
        let before = timeline.clone();
        assert_eq!(timeline.play(0), Err(MoveError::SquareOccupied(Position::TopLeft)));
        assert_eq!(timeline, before);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Timeline::label(0), "Go to game start");
        assert_eq!(Timeline::label(3), "Go to move #3");
    }
}
