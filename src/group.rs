//! Connected groups and liberties.
//!
//! Both traversals use an explicit stack and a visited set, never recursion,
//! so they are safe on the largest boards.

use crate::board::{Board, Point};

/// A maximal set of same-colored points connected orthogonally.
pub type Group = Vec<Point>;

/// Collect the group containing `origin`.
///
/// Follows 4-adjacency through cells with the same contents as `origin`, so
/// an empty origin yields the connected empty region.
pub fn flood_fill(board: &Board, origin: Point) -> Group {
    let (ox, oy) = origin;
    if !board.in_bounds(ox, oy) {
        return Vec::new();
    }
    let color = board.get(ox, oy);
    let size = board.size();
    let mut visited = vec![false; size * size];
    let mut stack = vec![origin];
    let mut group = Vec::new();
    visited[oy * size + ox] = true;

    while let Some((cx, cy)) = stack.pop() {
        group.push((cx, cy));
        for (nx, ny) in board.neighbors(cx, cy) {
            let ni = ny * size + nx;
            if !visited[ni] && board.get(nx, ny) == color {
                visited[ni] = true;
                stack.push((nx, ny));
            }
        }
    }
    group
}

/// Distinct empty points adjacent to any stone of `group`.
pub fn liberties(board: &Board, group: &[Point]) -> Vec<Point> {
    let size = board.size();
    let mut seen = vec![false; size * size];
    let mut libs = Vec::new();
    for &(x, y) in group {
        for (nx, ny) in board.neighbors(x, y) {
            let ni = ny * size + nx;
            if board.get(nx, ny).is_none() && !seen[ni] {
                seen[ni] = true;
                libs.push((nx, ny));
            }
        }
    }
    libs
}

/// Number of distinct liberties. A liberty shared by two stones counts once.
pub fn liberty_count(board: &Board, group: &[Point]) -> usize {
    liberties(board, group).len()
}
