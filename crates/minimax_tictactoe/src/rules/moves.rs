//! Successor generation.

use crate::{Board, Player};
use tracing::instrument;

/// Every board reachable by `player` placing one mark, ordered by
/// increasing cell index.
///
/// Ordering is what makes tie-breaking in the search reproducible: among
/// equally scored moves the lowest index wins.
#[instrument(level = "trace")]
pub fn legal_successors(board: &Board, player: Player) -> Vec<Board> {
    let mark = player.marker();
    board
        .empty_positions()
        .map(|pos| board.with(pos, mark))
        .collect()
}
