//! Tic-tac-toe rules and a perfect-play AI.
//!
//! # Architecture
//!
//! - **Board model**: [`Board`], [`Marker`], [`Player`], [`Position`]
//! - **Rules**: win, draw and successor queries behind [`RuleEngine`]
//! - **Search**: minimax with alpha-beta pruning ([`Searcher`])
//! - **Explanation**: depth-bounded annotated trees ([`SearchNode`])
//! - **Status**: [`classify`] a board into a [`GameStatus`]
//!
//! # Example
//!
//! ```
//! use minimax_tictactoe::{Board, GameStatus, StandardRules, classify, find_best_move};
//!
//! let rules = StandardRules::new();
//! let board: Board = "xxvoovvvv".parse().unwrap();
//! let reply = find_best_move(&rules, &board).unwrap();
//! assert_eq!(reply.to_string(), "xxxoovvvv");
//! assert_eq!(classify(&rules, &reply), GameStatus::AiWins);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod position;
pub mod rules;
mod search;
mod status;
mod types;

pub use error::{BoardError, BoardErrorKind, RuleError, RuleErrorKind};
pub use position::Position;
pub use rules::{RuleEngine, StandardRules};
pub use search::{
    DEFAULT_EXPLAIN_DEPTH, DRAW, Explanation, FailurePolicy, LOSS, NEG_INF, POS_INF, Score,
    SearchNode, SearchOptions, SearchOutcome, SearchStats, Searcher, WIN, Window, build_tree,
    evaluate, find_best_move, search,
};
pub use status::{GameStatus, classify, try_classify};
pub use types::{Board, Marker, Player};
