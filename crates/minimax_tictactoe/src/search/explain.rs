//! Annotated search trees for explaining a move.

use super::traversal::{Score, SearchStats};
use crate::Board;
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};

/// One visited board in an explanation tree.
///
/// `is_terminal` reports whether the game is over on this board, not
/// whether the search stopped here: a node cut off by the depth limit is a
/// leaf with `is_terminal == false`.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize, new)]
pub struct SearchNode {
    /// Board at this node.
    board: Board,
    /// Folded minimax value, or the static evaluation for leaves.
    score: Score,
    /// Game over on this board.
    is_terminal: bool,
    /// AI to move at this node.
    is_maximizing_turn: bool,
    /// Visited successors in generation order, up to any cutoff.
    children: Vec<SearchNode>,
}

impl SearchNode {
    /// True if nothing below this node was visited.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Nodes in this subtree, itself included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SearchNode::node_count).sum::<usize>()
    }

    /// Plies from this node to its deepest descendant.
    pub fn height(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.height() + 1)
            .max()
            .unwrap_or(0)
    }

    /// The first child whose score equals this node's score: the reply the
    /// side to move settles on.
    pub fn best_child(&self) -> Option<&SearchNode> {
        self.children.iter().find(|child| child.score == self.score)
    }

    /// Boards along the line of best replies, starting with this node.
    pub fn principal_variation(&self) -> Vec<Board> {
        let mut line = vec![self.board];
        let mut node = self;
        while let Some(next) = node.best_child() {
            line.push(next.board);
            node = next;
        }
        line
    }
}

/// An explanation tree together with how it was produced.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, new)]
pub struct Explanation {
    /// Root node, AI to move.
    root: SearchNode,
    /// Depth limit the tree was built with.
    max_depth: u8,
    /// Traversal counters.
    stats: SearchStats,
}

impl Explanation {
    /// Gives up the tree.
    pub fn into_root(self) -> SearchNode {
        self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{Score, Searcher, Window, build_tree, evaluate};
    use crate::{Player, StandardRules, rules};

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    /// Value and size of the unpruned game tree below `board`.
    fn unpruned(board: Board, maximizing: bool) -> (Score, usize) {
        if rules::is_terminal(&board) {
            return (evaluate(&StandardRules, &board).unwrap(), 1);
        }
        let children: Vec<(Score, usize)> =
            rules::legal_successors(&board, Player::to_move(maximizing))
                .into_iter()
                .map(|next| unpruned(next, !maximizing))
                .collect();
        let scores = children.iter().map(|(score, _)| *score);
        let score = if maximizing { scores.max() } else { scores.min() };
        let nodes = 1 + children.iter().map(|(_, n)| n).sum::<usize>();
        (score.unwrap_or(0), nodes)
    }

    #[test]
    fn test_depth_limited_leaves_are_not_terminal() {
        let explanation = Searcher::new(&StandardRules)
            .explain(&Board::new(), 1)
            .unwrap();
        let root = explanation.root();
        assert_eq!(root.children().len(), 9);
        assert!(root.children().iter().all(|c| !c.is_terminal() && c.is_leaf()));
        assert!(root.children().iter().all(|c| *c.score() == 0));
        assert!(root.children().iter().all(|c| !c.is_maximizing_turn()));
        assert!(*root.is_maximizing_turn());
        assert_eq!(root.height(), 1);
    }

    #[test]
    fn test_terminal_root_is_a_single_leaf() {
        let won = board("xxxoovvvv");
        let root = Searcher::new(&StandardRules)
            .explain(&won, 3)
            .unwrap()
            .into_root();
        assert!(*root.is_terminal());
        assert_eq!(*root.score(), 1);
        assert_eq!(root.node_count(), 1);
    }

    #[test]
    fn test_immediate_win_is_first_child() {
        // Beta stays open at the root, so every root move is still expanded.
        let root = Searcher::new(&StandardRules)
            .explain(&board("xxvoovvvv"), 2)
            .unwrap()
            .into_root();
        assert_eq!(*root.score(), 1);
        assert_eq!(root.children().len(), 5);
        let first = &root.children()[0];
        assert!(*first.is_terminal());
        assert_eq!(*first.board(), board("xxxoovvvv"));
    }

    #[test]
    fn test_principal_variation_follows_the_played_move() {
        let root = Searcher::new(&StandardRules)
            .explain(&board("xxvoovvvv"), 3)
            .unwrap()
            .into_root();
        let line = root.principal_variation();
        assert_eq!(line.len(), 2);
        assert!(rules::is_win(&line[1], Player::Ai));
    }

    #[test]
    fn test_serializes_with_wire_field_names() {
        let root = Searcher::new(&StandardRules)
            .explain(&board("xxxoovvvv"), 3)
            .unwrap()
            .into_root();
        let json = serde_json::to_value(&root).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "board": ["x", "x", "x", "o", "o", "v", "v", "v", "v"],
                "score": 1,
                "is_terminal": true,
                "is_maximizing_turn": true,
                "children": []
            })
        );
    }

    #[test]
    fn test_cutoff_keeps_children_built_so_far() {
        // Once the win at index 2 raises alpha to 1, every human reply that
        // scores at most 1 closes the window after one grandchild.
        let root = build_tree(
            &StandardRules,
            &board("xxvoovvvv"),
            true,
            Window::FULL,
            0,
            2,
        )
        .unwrap();
        let counts: Vec<usize> = root.children().iter().map(|c| c.children().len()).collect();
        assert_eq!(counts, vec![0, 1, 1, 1, 1]);
        assert!(root.children()[1..].iter().all(|c| !c.is_terminal()));
    }

    #[test]
    fn test_full_depth_tree_matches_unpruned_minimax() {
        let mid_game = board("xvvvovvvv");
        let (value, full_size) = unpruned(mid_game, true);
        let root = build_tree(&StandardRules, &mid_game, true, Window::FULL, 0, 9).unwrap();

        assert_eq!(*root.score(), value);
        assert_eq!(root.best_child().map(|c| *c.score()), Some(value));
        // The first child is searched with an open window, so its value is exact.
        let first = &root.children()[0];
        assert_eq!(*first.score(), unpruned(*first.board(), false).0);
        assert!(root.node_count() < full_size);
    }
}
