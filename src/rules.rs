//! Move legality.
//!
//! A placement is checked in a fixed order: bounds, occupancy, then a dry
//! run through [`apply_move`] for suicide, and finally the single-ply ko
//! test against the board one move back. Only the immediately preceding
//! board is compared; this is not superko.

use thiserror::Error;

use crate::board::{Board, Color};
use crate::capture::{Placement, apply_move};

/// Why a transition was refused. Every variant leaves the game unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("illegal move: ({x}, {y}) is off the board")]
    InvalidPosition { x: usize, y: usize },
    #[error("illegal move: point not empty")]
    OccupiedCell,
    #[error("illegal move: suicide")]
    SuicideViolation,
    #[error("illegal move: retakes ko")]
    KoViolation,
    #[error("not {0}'s turn")]
    OutOfTurn(Color),
    #[error("{0} already passed, waiting for the opponent")]
    DoublePassRejected(Color),
    #[error("game is over")]
    GameOver,
}

/// Validate a placement and return the resulting [`Placement`].
///
/// `previous` is the board one committed move before `board`, if any.
pub fn check_move(
    board: &Board,
    previous: Option<&Board>,
    x: usize,
    y: usize,
    color: Color,
) -> Result<Placement, MoveError> {
    if !board.in_bounds(x, y) {
        return Err(MoveError::InvalidPosition { x, y });
    }
    if board.get(x, y).is_some() {
        return Err(MoveError::OccupiedCell);
    }

    let placement = apply_move(board, x, y, color);
    if !placement.legal {
        return Err(MoveError::SuicideViolation);
    }
    if previous == Some(&placement.board) {
        return Err(MoveError::KoViolation);
    }
    Ok(placement)
}

/// Convenience wrapper around [`check_move`].
pub fn is_legal(board: &Board, previous: Option<&Board>, x: usize, y: usize, color: Color) -> bool {
    check_move(board, previous, x, y, color).is_ok()
}
