//! Stone placement and capture resolution.
//!
//! [`apply_move`] is pure: it works on a copy and never touches the input
//! board. Opponent captures are resolved before the placing group is checked
//! for liberties, so a stone that fills its own last liberty while taking the
//! last liberty of an adjacent enemy group is legal.

use crate::board::{Board, Color, Point};
use crate::group::{flood_fill, liberty_count};

/// Outcome of simulating a placement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Board after the stone and any captures. Equal to the input board when
    /// `legal` is false.
    pub board: Board,
    /// Opponent stones removed by the placement.
    pub captured: Vec<Point>,
    /// False only for suicide: no liberties and nothing captured.
    pub legal: bool,
}

/// Place `color` at `(x, y)` on a copy of `board` and resolve captures.
///
/// The caller is responsible for bounds and occupancy; see
/// [`crate::rules::check_move`].
pub fn apply_move(board: &Board, x: usize, y: usize, color: Color) -> Placement {
    let mut next = board.clone();
    next.set(x, y, Some(color));
    let captured = remove_dead_neighbors(&mut next, x, y, color);

    // Suicide looks at the placing group only.
    let own = flood_fill(&next, (x, y));
    if liberty_count(&next, &own) == 0 && captured.is_empty() {
        return Placement {
            board: board.clone(),
            captured: Vec::new(),
            legal: false,
        };
    }

    Placement {
        board: next,
        captured,
        legal: true,
    }
}

/// Remove every opponent group adjacent to the stone at `(x, y)` that has no
/// liberties left, returning the removed points.
pub(crate) fn remove_dead_neighbors(
    board: &mut Board,
    x: usize,
    y: usize,
    color: Color,
) -> Vec<Point> {
    let opp = color.opponent();
    let mut to_remove: Vec<Point> = Vec::new();
    let adjacent: Vec<Point> = board.neighbors(x, y).collect();
    for (nx, ny) in adjacent {
        if board.get(nx, ny) != Some(opp) || to_remove.contains(&(nx, ny)) {
            continue;
        }
        let group = flood_fill(board, (nx, ny));
        if liberty_count(board, &group) == 0 {
            to_remove.extend(group);
        }
    }
    for &(rx, ry) in &to_remove {
        board.set(rx, ry, None);
    }
    to_remove
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(size: usize, black: &[Point], white: &[Point]) -> Board {
        let mut board = Board::new(size);
        for &(x, y) in black {
            board.set(x, y, Some(Color::Black));
        }
        for &(x, y) in white {
            board.set(x, y, Some(Color::White));
        }
        board
    }

    #[test]
    fn test_plain_placement() {
        let board = Board::new(9);
        let p = apply_move(&board, 4, 4, Color::Black);
        assert!(p.legal);
        assert!(p.captured.is_empty());
        assert_eq!(p.board.get(4, 4), Some(Color::Black));
        // Input untouched
        assert_eq!(board.get(4, 4), None);
    }

    #[test]
    fn test_captures_single_stone() {
        let board = board_with(9, &[(4, 3), (3, 4), (5, 4)], &[(4, 4)]);
        let p = apply_move(&board, 4, 5, Color::Black);
        assert!(p.legal);
        assert_eq!(p.captured, vec![(4, 4)]);
        assert_eq!(p.board.get(4, 4), None);
    }

    #[test]
    fn test_captures_group_touched_from_two_sides_once() {
        // Black at (0,1) touches the white group at (0,0) and at (1,1).
        let board = board_with(
            3,
            &[(2, 0), (2, 1), (1, 2), (0, 2)],
            &[(0, 0), (1, 0), (1, 1)],
        );
        let p = apply_move(&board, 0, 1, Color::Black);
        assert!(p.legal);
        let mut captured = p.captured.clone();
        captured.sort();
        assert_eq!(captured, vec![(0, 0), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_suicide_returns_original_board() {
        let board = board_with(9, &[(1, 0), (0, 1)], &[]);
        let p = apply_move(&board, 0, 0, Color::White);
        assert!(!p.legal);
        assert!(p.captured.is_empty());
        assert_eq!(p.board, board);
    }

    #[test]
    fn test_filling_own_last_liberty_while_capturing_is_legal() {
        // Black (1,0) has no liberties of its own; white (0,0) is in atari.
        let board = board_with(3, &[(0, 1)], &[(0, 0), (2, 0), (1, 1)]);
        let p = apply_move(&board, 1, 0, Color::Black);
        assert!(p.legal);
        assert_eq!(p.captured, vec![(0, 0)]);
        assert_eq!(p.board.get(0, 0), None);
    }

    #[test]
    fn test_multi_stone_suicide_detected() {
        // White joins (1,0) at (0,0); the pair has no liberties and the
        // adjacent black group keeps three.
        let board = board_with(3, &[(2, 0), (0, 1), (1, 1)], &[(1, 0)]);
        let p = apply_move(&board, 0, 0, Color::White);
        assert!(!p.legal);
    }

    #[test]
    fn test_only_group_without_liberties_is_removed() {
        // Black (2,0) takes the last liberty of the white pair on the left;
        // white (3,0) still has (4,0) and (3,1).
        let board = board_with(5, &[(0, 1), (1, 1)], &[(0, 0), (1, 0), (3, 0)]);
        let p = apply_move(&board, 2, 0, Color::Black);
        assert!(p.legal);
        let mut captured = p.captured.clone();
        captured.sort();
        assert_eq!(captured, vec![(0, 0), (1, 0)]);
        assert_eq!(p.board.get(3, 0), Some(Color::White));
    }
}
