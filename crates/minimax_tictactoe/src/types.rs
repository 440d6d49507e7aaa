//! Core domain types for tic-tac-toe.

use crate::error::{BoardError, BoardErrorKind};
use crate::position::Position;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::instrument;

/// One of the two sides.
///
/// The AI maximizes the score and plays `x`; the human minimizes it and
/// plays `o`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Player {
    /// The engine (maximizer).
    Ai,
    /// The human opponent (minimizer).
    Human,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::Ai => Player::Human,
            Player::Human => Player::Ai,
        }
    }

    /// The side to move for a search level.
    pub fn to_move(maximizing: bool) -> Self {
        if maximizing { Player::Ai } else { Player::Human }
    }

    /// True for the maximizing side.
    pub fn is_maximizer(self) -> bool {
        self == Player::Ai
    }

    /// Mark this player places.
    pub fn marker(self) -> Marker {
        match self {
            Player::Ai => Marker::X,
            Player::Human => Marker::O,
        }
    }
}

/// Contents of one cell.
///
/// Serialized as the single-character tokens `"x"`, `"o"` and `"v"`.
/// Parsing accepts either case.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Marker {
    /// AI mark.
    #[serde(rename = "x", alias = "X")]
    #[strum(serialize = "x")]
    X,
    /// Human mark.
    #[serde(rename = "o", alias = "O")]
    #[strum(serialize = "o")]
    O,
    /// Empty cell.
    #[default]
    #[serde(rename = "v", alias = "V")]
    #[strum(serialize = "v")]
    Empty,
}

impl Marker {
    /// The player owning this mark, if any.
    pub fn owner(self) -> Option<Player> {
        match self {
            Marker::X => Some(Player::Ai),
            Marker::O => Some(Player::Human),
            Marker::Empty => None,
        }
    }

    /// Parses a single-character token.
    pub fn from_char(c: char) -> Result<Self, BoardError> {
        match c.to_ascii_lowercase() {
            'x' => Ok(Marker::X),
            'o' => Ok(Marker::O),
            'v' => Ok(Marker::Empty),
            other => Err(BoardError::new(BoardErrorKind::UnknownMarker(
                other.to_string(),
            ))),
        }
    }

    /// Token character.
    pub fn as_char(self) -> char {
        match self {
            Marker::X => 'x',
            Marker::O => 'o',
            Marker::Empty => 'v',
        }
    }
}

/// 3x3 tic-tac-toe board.
///
/// Boards are values: playing a mark yields a new board and never touches
/// the original.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Marker>", into = "Vec<Marker>")]
pub struct Board {
    /// Cells in row-major order (0-8).
    cells: [Marker; 9],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            cells: [Marker::Empty; 9],
        }
    }

    /// Creates a board from its nine cells.
    pub const fn from_cells(cells: [Marker; 9]) -> Self {
        Self { cells }
    }

    /// Gets the cell at the given position.
    pub fn get(&self, pos: Position) -> Marker {
        self.cells[pos.to_index()]
    }

    /// Checks if a cell is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Marker::Empty
    }

    /// Returns all cells.
    pub fn cells(&self) -> &[Marker; 9] {
        &self.cells
    }

    /// Empty positions in increasing index order.
    pub fn empty_positions(&self) -> impl Iterator<Item = Position> + '_ {
        Position::ALL.into_iter().filter(|pos| self.is_empty(*pos))
    }

    /// Number of empty cells.
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| **c == Marker::Empty).count()
    }

    /// Returns a new board with `marker` written at `pos`.
    #[must_use]
    pub fn with(&self, pos: Position, marker: Marker) -> Self {
        let mut cells = self.cells;
        cells[pos.to_index()] = marker;
        Self { cells }
    }

    /// The single cell that went from empty to occupied between `self` and
    /// `after`, if the two boards differ by exactly one placed mark.
    #[instrument(level = "trace")]
    pub fn placed_between(&self, after: &Board) -> Option<Position> {
        let mut changed = Position::ALL
            .into_iter()
            .filter(|pos| self.get(*pos) != after.get(*pos));
        let pos = changed.next()?;
        if changed.next().is_some() || !self.is_empty(pos) || after.is_empty(pos) {
            return None;
        }
        Some(pos)
    }

    /// Formats the board as a human-readable grid.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let pos = row * 3 + col;
                let symbol = match self.cells[pos] {
                    Marker::Empty => (pos + 1).to_string(),
                    Marker::X => "X".to_string(),
                    Marker::O => "O".to_string(),
                };
                result.push_str(&symbol);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

/// Compact form, e.g. `xxvoovvvv`.
impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for cell in &self.cells {
            write!(f, "{}", cell.as_char())?;
        }
        Ok(())
    }
}

impl TryFrom<Vec<Marker>> for Board {
    type Error = BoardError;

    fn try_from(cells: Vec<Marker>) -> Result<Self, Self::Error> {
        let len = cells.len();
        let cells: [Marker; 9] = cells
            .try_into()
            .map_err(|_| BoardError::new(BoardErrorKind::WrongLength(len)))?;
        Ok(Self { cells })
    }
}

impl From<Board> for Vec<Marker> {
    fn from(board: Board) -> Self {
        board.cells.to_vec()
    }
}

/// Parses the compact form (`"xxvoovvvv"`) or a JSON-style list
/// (`["x","x","v",...]`).
impl FromStr for Board {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let cells = if let Some(rest) = s.strip_prefix('[') {
            let inner = rest.strip_suffix(']').ok_or_else(|| {
                BoardError::new(BoardErrorKind::UnknownMarker(s.to_string()))
            })?;
            if inner.trim().is_empty() {
                Vec::new()
            } else {
                inner
                    .split(',')
                    .map(|tok| {
                        let tok = tok.trim();
                        let tok = unquote(tok, '"').or_else(|| unquote(tok, '\'')).unwrap_or(tok);
                        tok.parse::<Marker>().map_err(|_| {
                            BoardError::new(BoardErrorKind::UnknownMarker(tok.to_string()))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?
            }
        } else {
            s.chars()
                .filter(|c| !c.is_whitespace())
                .map(Marker::from_char)
                .collect::<Result<Vec<_>, _>>()?
        };
        Board::try_from(cells)
    }
}

fn unquote(tok: &str, quote: char) -> Option<&str> {
    tok.strip_prefix(quote)?.strip_suffix(quote)
}
