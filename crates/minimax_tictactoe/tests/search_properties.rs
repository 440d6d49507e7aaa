//! Properties of the search checked over every reachable board.

use std::collections::{HashMap, HashSet};

use minimax_tictactoe::{
    Board, DRAW, GameStatus, Marker, Player, Score, Searcher, StandardRules, Window, classify,
    evaluate, find_best_move, rules, search,
};

/// Every board reachable from the empty board with either side moving
/// first, stopping at finished games.
fn reachable_boards() -> Vec<Board> {
    let mut seen = HashSet::new();
    let mut stack = vec![(Board::new(), Player::Ai), (Board::new(), Player::Human)];
    while let Some((board, to_move)) = stack.pop() {
        if !seen.insert((board, to_move)) || rules::is_terminal(&board) {
            continue;
        }
        for next in rules::legal_successors(&board, to_move) {
            stack.push((next, to_move.opponent()));
        }
    }
    let boards: HashSet<Board> = seen.into_iter().map(|(board, _)| board).collect();
    let mut boards: Vec<Board> = boards.into_iter().collect();
    boards.sort_by_key(|b| b.to_string());
    boards
}

/// Plain minimax without pruning.
fn full_minimax(board: Board, maximizing: bool, memo: &mut HashMap<(Board, bool), Score>) -> Score {
    if let Some(score) = memo.get(&(board, maximizing)) {
        return *score;
    }
    let score = if rules::is_terminal(&board) {
        evaluate(&StandardRules, &board).unwrap()
    } else {
        let scores = rules::legal_successors(&board, Player::to_move(maximizing))
            .into_iter()
            .map(|next| full_minimax(next, !maximizing, memo));
        let folded = if maximizing { scores.max() } else { scores.min() };
        folded.unwrap_or(DRAW)
    };
    memo.insert((board, maximizing), score);
    score
}

fn board(s: &str) -> Board {
    s.parse().unwrap()
}

#[test]
fn test_pruning_never_changes_the_value() {
    let mut memo = HashMap::new();
    for board in reachable_boards() {
        for maximizing in [true, false] {
            let pruned = search(&StandardRules, &board, maximizing, Window::FULL, 0).unwrap();
            let full = full_minimax(board, maximizing, &mut memo);
            assert_eq!(pruned, full, "board {board}, maximizing {maximizing}");
        }
    }
}

#[test]
fn test_best_move_places_exactly_one_ai_mark() {
    let mut memo = HashMap::new();
    for board in reachable_boards() {
        let chosen = find_best_move(&StandardRules, &board).unwrap();
        if rules::is_terminal(&board) {
            assert_eq!(chosen, board);
            continue;
        }
        assert_eq!(chosen.empty_count() + 1, board.empty_count(), "board {board}");
        let placed = board.placed_between(&chosen).expect("one new mark");
        assert_eq!(chosen.get(placed), Marker::X);

        // The chosen move achieves the optimal value.
        let best = rules::legal_successors(&board, Player::Ai)
            .into_iter()
            .map(|next| full_minimax(next, false, &mut memo))
            .max()
            .unwrap();
        assert_eq!(full_minimax(chosen, false, &mut memo), best, "board {board}");
    }
}

#[test]
fn test_best_move_breaks_ties_by_lowest_index() {
    // Every opening move draws, so the first generated one is kept.
    let chosen = find_best_move(&StandardRules, &Board::new()).unwrap();
    assert_eq!(chosen, board("xvvvvvvvv"));
    assert_eq!(classify(&StandardRules, &chosen), GameStatus::InProgress);
}

#[test]
fn test_best_move_is_deterministic() {
    for board in reachable_boards().into_iter().step_by(37) {
        let first = find_best_move(&StandardRules, &board).unwrap();
        let second = find_best_move(&StandardRules, &board).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn test_takes_the_win_at_index_two() {
    let chosen = find_best_move(&StandardRules, &board("xxvoovvvv")).unwrap();
    assert_eq!(chosen, board("xxxoovvvv"));
    assert_eq!(classify(&StandardRules, &chosen), GameStatus::AiWins);
}

#[test]
fn test_never_loses_against_any_human_reply() {
    // Play the AI against every human line from every human opening.
    fn play(board: Board, memo: &mut HashSet<Board>) {
        if !memo.insert(board) || rules::is_terminal(&board) {
            assert_ne!(classify(&StandardRules, &board), GameStatus::HumanWins, "{board}");
            return;
        }
        let reply = find_best_move(&StandardRules, &board).unwrap();
        if rules::is_terminal(&reply) {
            assert_ne!(classify(&StandardRules, &reply), GameStatus::HumanWins);
            return;
        }
        for next in rules::legal_successors(&reply, Player::Human) {
            play(next, memo);
        }
    }

    let mut memo = HashSet::new();
    for opening in rules::legal_successors(&Board::new(), Player::Human) {
        play(opening, &mut memo);
    }
}

#[test]
fn test_full_depth_tree_agrees_with_search() {
    let searcher = Searcher::new(&StandardRules);
    for board in reachable_boards()
        .into_iter()
        .filter(|b| b.empty_count() <= 7)
    {
        let tree = searcher
            .build_tree(&board, true, Window::FULL, 0, 9)
            .unwrap();
        let score = searcher.search(&board, true, Window::FULL, 0).unwrap();
        assert_eq!(*tree.score(), score, "board {board}");
    }

    let tree = searcher.explain(&Board::new(), 9).unwrap();
    assert_eq!(*tree.root().score(), DRAW);
}

#[test]
fn test_tree_and_search_visit_the_same_nodes() {
    let searcher = Searcher::new(&StandardRules);
    let board = board("xvvvovvvv");
    let explanation = searcher.explain(&board, 9).unwrap();
    assert_eq!(
        explanation.root().node_count() as u64,
        *explanation.stats().nodes_visited()
    );
}
