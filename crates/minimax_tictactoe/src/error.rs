//! Error types for board construction and rule queries.

use derive_more::{Display, Error};
use tracing::instrument;

/// What was wrong with a caller-supplied board.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum BoardErrorKind {
    /// The board did not have exactly 9 cells.
    #[display("board must have 9 cells, got {}", _0)]
    WrongLength(usize),

    /// A cell held something other than `x`, `o` or `v`.
    #[display("unknown cell marker {:?} (expected \"x\", \"o\" or \"v\")", _0)]
    UnknownMarker(String),
}

/// Malformed board error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Board error: {} at {}:{}", kind, file, line)]
pub struct BoardError {
    /// Error kind.
    pub kind: BoardErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl BoardError {
    /// Creates a new board error with caller location tracking.
    #[track_caller]
    #[instrument]
    pub fn new(kind: BoardErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Why a rule query could not be answered.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum RuleErrorKind {
    /// The rule engine never came up.
    #[display("rule engine unavailable: {}", _0)]
    Unavailable(String),

    /// A single query failed.
    #[display("rule query {} failed: {}", query, reason)]
    QueryFailed {
        /// Name of the failed query.
        query: &'static str,
        /// Engine-supplied reason.
        reason: String,
    },
}

/// Rule engine error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Rule error: {} at {}:{}", kind, file, line)]
pub struct RuleError {
    /// Error kind.
    pub kind: RuleErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl RuleError {
    /// Creates a new rule error with caller location tracking.
    #[track_caller]
    #[instrument]
    pub fn new(kind: RuleErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Shorthand for [`RuleErrorKind::Unavailable`].
    #[track_caller]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::new(RuleErrorKind::Unavailable(reason.into()))
    }

    /// Shorthand for [`RuleErrorKind::QueryFailed`].
    #[track_caller]
    pub fn query_failed(query: &'static str, reason: impl Into<String>) -> Self {
        Self::new(RuleErrorKind::QueryFailed {
            query,
            reason: reason.into(),
        })
    }

    /// True if the engine itself is down rather than a single query failing.
    pub fn is_unavailable(&self) -> bool {
        matches!(self.kind, RuleErrorKind::Unavailable(_))
    }
}
