//! Draw detection logic for tic-tac-toe.

use super::win::winner;
use crate::{Board, Marker};
use tracing::instrument;

/// Checks if the board is full (all cells occupied).
#[instrument(level = "trace")]
pub fn is_full(board: &Board) -> bool {
    board.cells().iter().all(|c| *c != Marker::Empty)
}

/// A full board with no winner.
#[instrument(level = "trace")]
pub fn is_draw(board: &Board) -> bool {
    is_full(board) && winner(board).is_none()
}

/// The game is over: somebody won or the board is drawn.
#[instrument(level = "trace")]
pub fn is_terminal(board: &Board) -> bool {
    winner(board).is_some() || is_full(board)
}
