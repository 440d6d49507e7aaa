//! Minimax search with alpha-beta pruning.

use super::explain::{Explanation, SearchNode};
use super::traversal::{
    DRAW, FailurePolicy, LOSS, NEG_INF, POS_INF, Record, Score, ScoreOnly, SearchStats,
    Traversal, WIN, Window,
};
use crate::{Board, Player, Position, RuleEngine, RuleError};
use derive_getters::Getters;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Default explanation depth in plies below the root.
pub const DEFAULT_EXPLAIN_DEPTH: u8 = 3;

/// Scores a board: +1 if the AI has won, -1 if the human has, 0 otherwise.
///
/// Non-terminal boards score 0 as well.
pub fn evaluate<R: RuleEngine + ?Sized>(rules: &R, board: &Board) -> Result<Score, RuleError> {
    if rules.is_win(board, Player::Ai)? {
        return Ok(WIN);
    }
    if rules.is_win(board, Player::Human)? {
        return Ok(LOSS);
    }
    Ok(DRAW)
}

/// Knobs shared by every search entry point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct SearchOptions {
    /// Handling of successor query failures below the root.
    pub on_rule_failure: FailurePolicy,
}

/// Result of choosing the AI's move.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize)]
pub struct SearchOutcome {
    /// Board after the AI's move, or the input when there was nothing to play.
    board: Board,
    /// Cell the AI played.
    played: Option<Position>,
    /// Minimax value of the chosen move.
    score: Option<Score>,
    /// Traversal counters summed over all root moves.
    stats: SearchStats,
}

impl SearchOutcome {
    fn unchanged(board: &Board) -> Self {
        Self {
            board: *board,
            played: None,
            score: None,
            stats: SearchStats::default(),
        }
    }
}

/// Runs searches against one rule engine.
#[derive(Debug, Clone, Copy)]
pub struct Searcher<'r, R: ?Sized> {
    rules: &'r R,
    options: SearchOptions,
}

impl<'r, R: RuleEngine + ?Sized> Searcher<'r, R> {
    /// Creates a searcher with default options.
    pub fn new(rules: &'r R) -> Self {
        Self::with_options(rules, SearchOptions::default())
    }

    /// Creates a searcher with explicit options.
    pub fn with_options(rules: &'r R, options: SearchOptions) -> Self {
        Self { rules, options }
    }

    /// Returns the options in use.
    pub fn options(&self) -> SearchOptions {
        self.options
    }

    /// Minimax value of `board` with `maximizing` to move, searched to the
    /// end of the game.
    pub fn search(
        &self,
        board: &Board,
        maximizing: bool,
        window: Window,
        depth: u8,
    ) -> Result<Score, RuleError> {
        let mut traversal = Traversal::new(self.rules, None, self.options.on_rule_failure);
        traversal.visit::<ScoreOnly>(*board, maximizing, window, depth)
    }

    /// Picks the AI's move.
    ///
    /// Root successors are searched in generation order with the human to
    /// move; the first one reaching a strictly higher score than all before
    /// it is kept, so ties go to the lowest cell index. The best score so
    /// far is carried into later siblings as alpha. A finished game, or a
    /// board without successors, comes back unchanged.
    ///
    /// # Errors
    ///
    /// A failing query at the root is returned as-is instead of being
    /// mistaken for "no moves".
    #[instrument(skip(self, board), fields(board = %board))]
    pub fn best_move(&self, board: &Board) -> Result<SearchOutcome, RuleError> {
        if self.rules.is_terminal(board)? {
            debug!("Game already over, returning board unchanged");
            return Ok(SearchOutcome::unchanged(board));
        }
        let successors = self.rules.legal_successors(board, Player::Ai)?;
        if successors.is_empty() {
            debug!("No moves available, returning board unchanged");
            return Ok(SearchOutcome::unchanged(board));
        }
        debug!(candidates = successors.len(), "Searching root moves");

        let mut stats = SearchStats::default();
        let mut best: Option<(Board, Score)> = None;
        let mut alpha = NEG_INF;
        for (i, next) in successors.into_iter().enumerate() {
            let mut traversal = Traversal::new(self.rules, None, self.options.on_rule_failure);
            let score =
                traversal.visit::<ScoreOnly>(next, false, Window::new(alpha, POS_INF), 1)?;
            stats.merge(traversal.stats());
            debug!(candidate = i, board = %next, score, "Root move searched");

            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((next, score));
            }
            if let Some((_, best_score)) = best {
                alpha = alpha.max(best_score);
            }
        }

        let (chosen, score) = best.unwrap_or((*board, DRAW));
        let played = board.placed_between(&chosen);
        info!(
            chosen = %chosen,
            ?played,
            score,
            nodes = stats.nodes_visited(),
            cutoffs = stats.cutoffs(),
            rule_failures = stats.rule_failures(),
            "Best move found"
        );
        Ok(SearchOutcome {
            board: chosen,
            played,
            score: Some(score),
            stats,
        })
    }

    /// Builds the annotated tree below `board`, cut off at `max_depth`.
    pub fn build_tree(
        &self,
        board: &Board,
        maximizing: bool,
        window: Window,
        depth: u8,
        max_depth: u8,
    ) -> Result<SearchNode, RuleError> {
        let mut traversal =
            Traversal::new(self.rules, Some(max_depth), self.options.on_rule_failure);
        traversal.visit::<Record>(*board, maximizing, window, depth)
    }

    /// Explains the AI's choice: the tree rooted at `board` with the AI to
    /// move and an open window.
    #[instrument(skip(self, board), fields(board = %board))]
    pub fn explain(&self, board: &Board, max_depth: u8) -> Result<Explanation, RuleError> {
        let mut traversal =
            Traversal::new(self.rules, Some(max_depth), self.options.on_rule_failure);
        let root = traversal.visit::<Record>(*board, true, Window::FULL, 0)?;
        let stats = traversal.stats();
        info!(
            score = root.score(),
            nodes = stats.nodes_visited(),
            cutoffs = stats.cutoffs(),
            "Explanation tree built"
        );
        Ok(Explanation::new(root, max_depth, stats))
    }
}

/// Minimax value of `board` with `maximizing` to move.
pub fn search<R: RuleEngine + ?Sized>(
    rules: &R,
    board: &Board,
    maximizing: bool,
    window: Window,
    depth: u8,
) -> Result<Score, RuleError> {
    Searcher::new(rules).search(board, maximizing, window, depth)
}

/// The board after the AI's best move, or `board` itself when no move exists.
pub fn find_best_move<R: RuleEngine + ?Sized>(rules: &R, board: &Board) -> Result<Board, RuleError> {
    Searcher::new(rules)
        .best_move(board)
        .map(|outcome| outcome.board)
}

/// Annotated search tree below `board`, cut off at `max_depth`.
pub fn build_tree<R: RuleEngine + ?Sized>(
    rules: &R,
    board: &Board,
    maximizing: bool,
    window: Window,
    depth: u8,
    max_depth: u8,
) -> Result<SearchNode, RuleError> {
    Searcher::new(rules).build_tree(board, maximizing, window, depth, max_depth)
}
