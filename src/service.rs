//! Request-level game operations on top of the search core.

use crate::config::ServerConfig;
use derive_getters::Getters;
use derive_more::{Display, Error, From};
use minimax_tictactoe::{
    Board, GameStatus, RuleEngine, RuleError, SearchNode, SearchOptions, Searcher, classify,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Reply to a move request.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct MoveResponse {
    /// Board after the AI's move, or the submitted board if no move was made.
    new_board: Board,
    /// Status of `new_board`.
    status: GameStatus,
}

impl MoveResponse {
    /// Creates a move response.
    pub fn new(new_board: Board, status: GameStatus) -> Self {
        Self { new_board, status }
    }
}

/// Classifies, moves and explains with one rule engine.
///
/// The engine is built once at startup and owned here; nothing in the
/// service mutates it, so one instance serves every request.
#[derive(Debug, Clone)]
pub struct GameService<R> {
    rules: R,
    options: SearchOptions,
    explain_depth: u8,
}

impl<R: RuleEngine> GameService<R> {
    /// Creates a service around `rules`.
    pub fn new(rules: R, options: SearchOptions, explain_depth: u8) -> Self {
        Self {
            rules,
            options,
            explain_depth,
        }
    }

    /// Creates a service configured from `config`.
    pub fn from_config(rules: R, config: &ServerConfig) -> Self {
        Self::new(rules, config.search_options(), *config.explain_depth())
    }

    /// Depth used for explanation trees.
    pub fn explain_depth(&self) -> u8 {
        self.explain_depth
    }

    /// Status of a board.
    pub fn classify(&self, board: &Board) -> GameStatus {
        classify(&self.rules, board)
    }

    /// Plays the AI's reply to `board`.
    ///
    /// Boards whose game is already decided (or that the rule engine cannot
    /// classify) come back unchanged with their status and no search runs.
    ///
    /// # Errors
    ///
    /// Returns the [`RuleError`] if the root successor query fails.
    #[instrument(skip(self, board), fields(board = %board))]
    pub fn play(&self, board: &Board) -> Result<MoveResponse, RuleError> {
        let status = self.classify(board);
        if status != GameStatus::InProgress {
            info!(%status, "Game not in progress, skipping search");
            return Ok(MoveResponse::new(*board, status));
        }

        let outcome = Searcher::with_options(&self.rules, self.options).best_move(board)?;
        if *outcome.stats().rule_failures() > 0 {
            warn!(
                rule_failures = outcome.stats().rule_failures(),
                "Move chosen with degraded subtrees; it may not be optimal"
            );
        }
        let new_board = *outcome.board();
        let status = self.classify(&new_board);
        info!(new_board = %new_board, played = ?outcome.played(), %status, "AI move computed");
        Ok(MoveResponse::new(new_board, status))
    }

    /// Explanation tree for the AI's decision on `board`.
    ///
    /// # Errors
    ///
    /// Returns the [`RuleError`] if a rule query fails and the configured
    /// policy does not absorb it.
    #[instrument(skip(self, board), fields(board = %board, depth = self.explain_depth))]
    pub fn explain(&self, board: &Board) -> Result<SearchNode, RuleError> {
        Searcher::with_options(&self.rules, self.options)
            .explain(board, self.explain_depth)
            .map(|explanation| explanation.into_root())
    }
}

/// Failure of an asynchronous service call.
#[derive(Debug, Display, Error, From)]
pub enum ServiceError {
    /// The rule engine failed.
    #[display("{}", _0)]
    Rules(RuleError),

    /// The computation ran past its deadline.
    #[display("computation exceeded its {:?} deadline", after)]
    Timeout {
        /// Configured deadline.
        after: Duration,
    },

    /// The blocking task panicked or was cancelled.
    #[display("search task failed: {}", _0)]
    Join(tokio::task::JoinError),
}

/// Shared state handed to every HTTP handler.
#[derive(Debug)]
pub struct AppState<R> {
    service: Arc<GameService<R>>,
    timeout: Option<Duration>,
}

impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            timeout: self.timeout,
        }
    }
}

impl<R: RuleEngine + Send + Sync + 'static> AppState<R> {
    /// Wraps a service; `timeout` bounds each computation.
    pub fn new(service: GameService<R>, timeout: Option<Duration>) -> Self {
        Self {
            service: Arc::new(service),
            timeout,
        }
    }

    /// The wrapped service.
    pub fn service(&self) -> &GameService<R> {
        &self.service
    }

    /// Runs `f` on the blocking pool, bounded by the configured deadline.
    ///
    /// A timed-out computation is abandoned, not interrupted; it finishes on
    /// its blocking thread and its result is dropped.
    pub async fn run<T, F>(&self, f: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&GameService<R>) -> Result<T, RuleError> + Send + 'static,
        T: Send + 'static,
    {
        let service = Arc::clone(&self.service);
        let task = tokio::task::spawn_blocking(move || f(&service));
        let joined = match self.timeout {
            Some(after) => tokio::time::timeout(after, task)
                .await
                .map_err(|_| ServiceError::Timeout { after })?,
            None => task.await,
        };
        Ok(joined??)
    }
}
