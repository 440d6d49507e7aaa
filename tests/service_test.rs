//! Game service behavior with rule engines that fail part-way through.

use minimax_server::{GameService, ServerConfig};
use minimax_tictactoe::{
    Board, FailurePolicy, GameStatus, Player, RuleEngine, RuleError, SearchOptions, StandardRules,
};

/// Standard rules whose successor query fails once few cells remain.
struct FlakyRules {
    fail_below: usize,
}

impl RuleEngine for FlakyRules {
    fn is_win(&self, board: &Board, player: Player) -> Result<bool, RuleError> {
        StandardRules.is_win(board, player)
    }

    fn is_draw(&self, board: &Board) -> Result<bool, RuleError> {
        StandardRules.is_draw(board)
    }

    fn legal_successors(&self, board: &Board, player: Player) -> Result<Vec<Board>, RuleError> {
        if board.empty_count() < self.fail_below {
            return Err(RuleError::query_failed("legal_successors", "engine crashed"));
        }
        StandardRules.legal_successors(board, player)
    }
}

/// Standard rules whose engine dies once the search leaves the root.
struct DyingRules;

impl RuleEngine for DyingRules {
    fn is_win(&self, board: &Board, player: Player) -> Result<bool, RuleError> {
        StandardRules.is_win(board, player)
    }

    fn is_draw(&self, board: &Board) -> Result<bool, RuleError> {
        StandardRules.is_draw(board)
    }

    fn legal_successors(&self, board: &Board, player: Player) -> Result<Vec<Board>, RuleError> {
        if board.empty_count() < 9 {
            return Err(RuleError::unavailable("engine process exited"));
        }
        StandardRules.legal_successors(board, player)
    }
}

fn board(s: &str) -> Board {
    s.parse().unwrap()
}

fn service(policy: FailurePolicy) -> GameService<FlakyRules> {
    GameService::new(
        FlakyRules { fail_below: 5 },
        SearchOptions::default().with_on_rule_failure(policy),
        3,
    )
}

#[test]
fn test_degrade_still_takes_the_win() {
    let resp = service(FailurePolicy::Degrade)
        .play(&board("xxvoovvvv"))
        .unwrap();
    assert_eq!(resp.new_board(), &board("xxxoovvvv"));
    assert_eq!(*resp.status(), GameStatus::AiWins);
}

#[test]
fn test_propagate_surfaces_deep_failures() {
    let err = service(FailurePolicy::Propagate)
        .play(&board("xxvoovvvv"))
        .unwrap_err();
    assert!(!err.is_unavailable());
    assert!(err.to_string().contains("legal_successors"));
}

#[test]
fn test_root_failure_is_never_degraded() {
    let svc = GameService::new(
        FlakyRules { fail_below: 10 },
        SearchOptions::default(),
        3,
    );
    assert!(svc.play(&Board::new()).is_err());
}

#[test]
fn test_degraded_explanation_keeps_failed_nodes_as_leaves() {
    let root = service(FailurePolicy::Degrade)
        .explain(&board("xxvoovvvv"))
        .unwrap();
    assert_eq!(root.children().len(), 5);
    for child in root.children() {
        assert!(child.children().is_empty());
    }
    assert_eq!(*root.score(), 1);
}

#[test]
fn test_config_policy_reaches_the_service() {
    let config = ServerConfig::from_toml("on_rule_failure = \"propagate\"").unwrap();
    let svc = GameService::from_config(FlakyRules { fail_below: 5 }, &config);
    assert!(svc.play(&board("xxvoovvvv")).is_err());
    assert_eq!(svc.explain_depth(), 3);
}

#[test]
fn test_engine_loss_below_root_fails_even_when_degrading() {
    let svc = GameService::new(DyingRules, SearchOptions::default(), 3);
    let err = svc.play(&Board::new()).unwrap_err();
    assert!(err.is_unavailable());
    assert!(svc.explain(&Board::new()).unwrap_err().is_unavailable());
}
