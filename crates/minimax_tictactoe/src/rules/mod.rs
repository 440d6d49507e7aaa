//! Game rules for tic-tac-toe.
//!
//! The pure functions in the submodules are the rules themselves. The
//! [`RuleEngine`] trait is the seam the search and the classifier query them
//! through, so a service can hand the core an engine value built once at
//! startup instead of reaching for a global.

pub mod draw;
pub mod moves;
pub mod win;

pub use draw::{is_draw, is_full, is_terminal};
pub use moves::legal_successors;
pub use win::{LINES, is_win, winner};

use crate::{Board, Player, RuleError};

/// Answers the four rule queries the search needs.
///
/// Queries are fallible so that an engine backed by something other than
/// in-process code can report failures; [`StandardRules`] never fails.
pub trait RuleEngine {
    /// True iff `player` holds any of the 8 lines.
    fn is_win(&self, board: &Board, player: Player) -> Result<bool, RuleError>;

    /// True iff no cell is empty and nobody has won.
    fn is_draw(&self, board: &Board) -> Result<bool, RuleError>;

    /// Win for either side, or a draw.
    fn is_terminal(&self, board: &Board) -> Result<bool, RuleError> {
        Ok(self.is_win(board, Player::Ai)?
            || self.is_win(board, Player::Human)?
            || self.is_draw(board)?)
    }

    /// One successor per empty cell, by increasing cell index.
    fn legal_successors(&self, board: &Board, player: Player) -> Result<Vec<Board>, RuleError>;
}

impl<R: RuleEngine + ?Sized> RuleEngine for &R {
    fn is_win(&self, board: &Board, player: Player) -> Result<bool, RuleError> {
        (**self).is_win(board, player)
    }

    fn is_draw(&self, board: &Board) -> Result<bool, RuleError> {
        (**self).is_draw(board)
    }

    fn is_terminal(&self, board: &Board) -> Result<bool, RuleError> {
        (**self).is_terminal(board)
    }

    fn legal_successors(&self, board: &Board, player: Player) -> Result<Vec<Board>, RuleError> {
        (**self).legal_successors(board, player)
    }
}

/// Standard 3x3 three-in-a-row rules, evaluated in process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StandardRules;

impl StandardRules {
    /// Creates the rule engine.
    pub fn new() -> Self {
        Self
    }
}

impl RuleEngine for StandardRules {
    fn is_win(&self, board: &Board, player: Player) -> Result<bool, RuleError> {
        Ok(win::is_win(board, player))
    }

    fn is_draw(&self, board: &Board) -> Result<bool, RuleError> {
        Ok(draw::is_draw(board))
    }

    fn is_terminal(&self, board: &Board) -> Result<bool, RuleError> {
        Ok(draw::is_terminal(board))
    }

    fn legal_successors(&self, board: &Board, player: Player) -> Result<Vec<Board>, RuleError> {
        Ok(moves::legal_successors(board, player))
    }
}
