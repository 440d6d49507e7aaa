//! Game status classification.

use crate::{Board, Player, RuleEngine, RuleError};
use serde::{Deserialize, Serialize};
use tracing::{error, instrument};

/// Where a game stands, derived from a board.
///
/// Serialized as the tokens the browser client already understands.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
pub enum GameStatus {
    /// The AI holds a line.
    #[serde(rename = "gana_ia")]
    #[strum(serialize = "gana_ia")]
    AiWins,
    /// The human holds a line.
    #[serde(rename = "gana_humano")]
    #[strum(serialize = "gana_humano")]
    HumanWins,
    /// Full board, no line.
    #[serde(rename = "empate")]
    #[strum(serialize = "empate")]
    Draw,
    /// Game is ongoing.
    #[serde(rename = "en_juego")]
    #[strum(serialize = "en_juego")]
    InProgress,
    /// The rule engine could not answer; not a game outcome.
    #[serde(rename = "error_backend_prolog")]
    #[strum(serialize = "error_backend_prolog")]
    BackendError,
}

impl GameStatus {
    /// True for wins and draws.
    pub fn is_game_over(self) -> bool {
        matches!(
            self,
            GameStatus::AiWins | GameStatus::HumanWins | GameStatus::Draw
        )
    }
}

/// Classifies a board: AI win, else human win, else draw, else in progress.
///
/// A rule engine failure is logged and reported as
/// [`GameStatus::BackendError`] rather than returned, so callers always have
/// a status to relay.
#[instrument(skip(rules, board), fields(board = %board))]
pub fn classify<R: RuleEngine + ?Sized>(rules: &R, board: &Board) -> GameStatus {
    match try_classify(rules, board) {
        Ok(status) => status,
        Err(err) => {
            error!(error = %err, "Rule engine failed while classifying board");
            GameStatus::BackendError
        }
    }
}

/// Classifies a board, surfacing rule engine failures.
pub fn try_classify<R: RuleEngine + ?Sized>(
    rules: &R,
    board: &Board,
) -> Result<GameStatus, RuleError> {
    if rules.is_win(board, Player::Ai)? {
        return Ok(GameStatus::AiWins);
    }
    if rules.is_win(board, Player::Human)? {
        return Ok(GameStatus::HumanWins);
    }
    if rules.is_draw(board)? {
        return Ok(GameStatus::Draw);
    }
    Ok(GameStatus::InProgress)
}
