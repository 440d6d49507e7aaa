//! The alpha-beta traversal shared by scalar search and tree building.
//!
//! Both callers walk the same tree in the same order with the same cutoffs;
//! they differ only in what a visited child turns into. A [`Visit`]
//! implementation decides that: [`ScoreOnly`] folds children away,
//! [`Record`] keeps them as [`SearchNode`]s.

use super::explain::SearchNode;
use super::minimax::evaluate;
use crate::{Board, Player, RuleEngine, RuleError};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

/// Minimax value of a board from the AI's point of view.
pub type Score = i32;

/// AI has won.
pub const WIN: Score = 1;
/// Nobody has won.
pub const DRAW: Score = 0;
/// Human has won.
pub const LOSS: Score = -1;

/// Lower bound used for an open window.
pub const NEG_INF: Score = Score::MIN;
/// Upper bound used for an open window.
pub const POS_INF: Score = Score::MAX;

/// Alpha-beta bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    /// Best score the maximizer is already guaranteed.
    pub alpha: Score,
    /// Best score the minimizer is already guaranteed.
    pub beta: Score,
}

impl Window {
    /// The unbounded window `(-inf, +inf)`.
    pub const FULL: Window = Window {
        alpha: NEG_INF,
        beta: POS_INF,
    };

    /// Creates a window.
    pub fn new(alpha: Score, beta: Score) -> Self {
        Self { alpha, beta }
    }

    /// No remaining sibling can change the parent's choice.
    pub fn is_closed(&self) -> bool {
        self.beta <= self.alpha
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::FULL
    }
}

/// What to do when a successor query fails below the root.
///
/// Only single failed queries are subject to the policy. An unavailable
/// engine always aborts the search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log, count in [`SearchStats::rule_failures`], and treat the node as
    /// having no successors.
    #[default]
    Degrade,
    /// Abort the whole search with the error.
    Propagate,
}

/// Counters gathered during one traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct SearchStats {
    /// Boards visited, leaves included.
    nodes_visited: u64,
    /// Boards scored without expansion.
    leaves: u64,
    /// Times the window closed and remaining siblings were skipped.
    cutoffs: u64,
    /// Successor queries that failed and were degraded.
    rule_failures: u64,
}

impl SearchStats {
    pub(crate) fn merge(&mut self, other: SearchStats) {
        self.nodes_visited += other.nodes_visited;
        self.leaves += other.leaves;
        self.cutoffs += other.cutoffs;
        self.rule_failures += other.rule_failures;
    }
}

/// Turns visited boards into the traversal's output.
pub(crate) trait Visit {
    /// Result of visiting one board.
    type Node;
    /// Accumulator for a node's children.
    type Children: Default;

    fn score(node: &Self::Node) -> Score;
    fn push(children: &mut Self::Children, node: Self::Node);
    fn leaf(board: Board, score: Score, is_terminal: bool, maximizing: bool) -> Self::Node;
    fn branch(board: Board, score: Score, maximizing: bool, children: Self::Children)
        -> Self::Node;
}

/// Keeps only the score.
pub(crate) struct ScoreOnly;

impl Visit for ScoreOnly {
    type Node = Score;
    type Children = ();

    fn score(node: &Score) -> Score {
        *node
    }

    fn push(_: &mut (), _: Score) {}

    fn leaf(_: Board, score: Score, _: bool, _: bool) -> Score {
        score
    }

    fn branch(_: Board, score: Score, _: bool, _: ()) -> Score {
        score
    }
}

/// Materializes every visited board.
pub(crate) struct Record;

impl Visit for Record {
    type Node = SearchNode;
    type Children = Vec<SearchNode>;

    fn score(node: &SearchNode) -> Score {
        *node.score()
    }

    fn push(children: &mut Vec<SearchNode>, node: SearchNode) {
        children.push(node);
    }

    fn leaf(board: Board, score: Score, is_terminal: bool, maximizing: bool) -> SearchNode {
        SearchNode::new(board, score, is_terminal, maximizing, Vec::new())
    }

    fn branch(board: Board, score: Score, maximizing: bool, children: Vec<SearchNode>) -> SearchNode {
        SearchNode::new(board, score, false, maximizing, children)
    }
}

/// One walk over the game tree.
pub(crate) struct Traversal<'r, R: ?Sized> {
    rules: &'r R,
    max_depth: Option<u8>,
    policy: FailurePolicy,
    stats: SearchStats,
}

impl<'r, R: RuleEngine + ?Sized> Traversal<'r, R> {
    pub(crate) fn new(rules: &'r R, max_depth: Option<u8>, policy: FailurePolicy) -> Self {
        Self {
            rules,
            max_depth,
            policy,
            stats: SearchStats::default(),
        }
    }

    pub(crate) fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Visits `board` with `maximizing` to move.
    ///
    /// Terminal boards, and boards at `max_depth` when one is set, become
    /// leaves scored by [`evaluate`]. Otherwise successors are visited in
    /// generation order and folded with max (AI) or min (human), narrowing
    /// the window, until it closes. Children built before the cutoff are
    /// kept. A non-terminal board without successors is a leaf scored as a
    /// draw.
    pub(crate) fn visit<V: Visit>(
        &mut self,
        board: Board,
        maximizing: bool,
        mut window: Window,
        depth: u8,
    ) -> Result<V::Node, RuleError> {
        self.stats.nodes_visited += 1;

        let is_terminal = self.rules.is_terminal(&board)?;
        if is_terminal || self.max_depth.is_some_and(|max| depth >= max) {
            self.stats.leaves += 1;
            let score = evaluate(self.rules, &board)?;
            trace!(depth, %board, score, is_terminal, "Leaf");
            return Ok(V::leaf(board, score, is_terminal, maximizing));
        }

        let successors = self.successors(&board, Player::to_move(maximizing), depth)?;
        if successors.is_empty() {
            self.stats.leaves += 1;
            trace!(depth, %board, "Non-terminal board without successors");
            return Ok(V::leaf(board, DRAW, false, maximizing));
        }

        let mut best = if maximizing { NEG_INF } else { POS_INF };
        let mut children = V::Children::default();
        for next in successors {
            let child = self.visit::<V>(next, !maximizing, window, depth.saturating_add(1))?;
            let score = V::score(&child);
            V::push(&mut children, child);

            if maximizing {
                best = best.max(score);
                window.alpha = window.alpha.max(best);
            } else {
                best = best.min(score);
                window.beta = window.beta.min(best);
            }
            if window.is_closed() {
                self.stats.cutoffs += 1;
                trace!(depth, %board, best, "Cutoff");
                break;
            }
        }

        Ok(V::branch(board, best, maximizing, children))
    }

    fn successors(
        &mut self,
        board: &Board,
        player: Player,
        depth: u8,
    ) -> Result<Vec<Board>, RuleError> {
        match self.rules.legal_successors(board, player) {
            Ok(successors) => Ok(successors),
            Err(err) if err.is_unavailable() => Err(err),
            Err(err) => match self.policy {
                FailurePolicy::Degrade => {
                    self.stats.rule_failures += 1;
                    warn!(
                        error = %err,
                        %board,
                        depth,
                        "Successor query failed, treating board as having no moves"
                    );
                    Ok(Vec::new())
                }
                FailurePolicy::Propagate => Err(err),
            },
        }
    }
}
