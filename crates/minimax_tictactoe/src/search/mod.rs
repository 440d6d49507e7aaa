//! Adversarial search: scalar minimax and explanation trees.

mod explain;
mod minimax;
mod traversal;

pub use explain::{Explanation, SearchNode};
pub use minimax::{
    DEFAULT_EXPLAIN_DEPTH, SearchOptions, SearchOutcome, Searcher, build_tree, evaluate,
    find_best_move, search,
};
pub use traversal::{
    DRAW, FailurePolicy, LOSS, NEG_INF, POS_INF, Score, SearchStats, WIN, Window,
};
