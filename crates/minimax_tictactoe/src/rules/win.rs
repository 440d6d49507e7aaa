//! Win detection logic for tic-tac-toe.

use crate::{Board, Player, Position};
use tracing::instrument;

/// The 8 winning lines: 3 rows, 3 columns, 2 diagonals.
pub const LINES: [[Position; 3]; 8] = [
    // Rows
    [Position::TopLeft, Position::TopCenter, Position::TopRight],
    [Position::MiddleLeft, Position::Center, Position::MiddleRight],
    [Position::BottomLeft, Position::BottomCenter, Position::BottomRight],
    // Columns
    [Position::TopLeft, Position::MiddleLeft, Position::BottomLeft],
    [Position::TopCenter, Position::Center, Position::BottomCenter],
    [Position::TopRight, Position::MiddleRight, Position::BottomRight],
    // Diagonals
    [Position::TopLeft, Position::Center, Position::BottomRight],
    [Position::TopRight, Position::Center, Position::BottomLeft],
];

/// Checks if `player` has three in a row on any line.
#[instrument(level = "trace")]
pub fn is_win(board: &Board, player: Player) -> bool {
    let mark = player.marker();
    LINES
        .iter()
        .any(|line| line.iter().all(|pos| board.get(*pos) == mark))
}

/// Returns the player holding a completed line, checking the AI first.
#[instrument(level = "trace")]
pub fn winner(board: &Board) -> Option<Player> {
    [Player::Ai, Player::Human]
        .into_iter()
        .find(|player| is_win(board, *player))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Marker;

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    #[test]
    fn test_no_winner_empty_board() {
        assert_eq!(winner(&Board::new()), None);
    }

    #[test]
    fn test_every_line_wins_for_both_players() {
        for player in [Player::Ai, Player::Human] {
            for line in LINES {
                let b = line
                    .iter()
                    .fold(Board::new(), |b, pos| b.with(*pos, player.marker()));
                assert!(is_win(&b, player), "{line:?} should win for {player}");
                assert!(!is_win(&b, player.opponent()));
                assert_eq!(winner(&b), Some(player));
            }
        }
    }

    #[test]
    fn test_winner_top_row() {
        assert!(is_win(&board("xxxoovvvv"), Player::Ai));
    }

    #[test]
    fn test_winner_diagonal() {
        assert!(is_win(&board("oxvxovvxo"), Player::Human));
    }

    #[test]
    fn test_no_winner_incomplete() {
        let b = Board::new()
            .with(Position::TopLeft, Marker::X)
            .with(Position::TopCenter, Marker::X);
        assert!(!is_win(&b, Player::Ai));
    }

    #[test]
    fn test_mixed_line_is_not_a_win() {
        assert_eq!(winner(&board("xoxvvvvvv")), None);
    }
}
