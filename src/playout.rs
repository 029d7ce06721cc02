//! Monte Carlo playouts and a flat UCB search built on them.
//!
//! A playout plays random legal moves, never filling the mover's own
//! eye-like points, until two consecutive passes or a length limit, then
//! scores the board. [`PlayoutSearch`] spreads its simulation budget over the
//! root moves with UCB1 and returns the move with the best win rate.

use std::time::Instant;

use anyhow::{Result, bail};
use tracing::debug;

use crate::board::{Board, Color, Point};
use crate::capture::Placement;
use crate::constants::PLAYOUT_LENGTH_FACTOR;
use crate::game::GameState;
use crate::rules::check_move;
use crate::search::{SearchParams, SearchProcedure};

/// True if every on-board neighbor of the empty point `(x, y)` is a `color`
/// stone. May be a false eye.
pub fn is_eyeish(board: &Board, x: usize, y: usize, color: Color) -> bool {
    board.get(x, y).is_none()
        && board
            .neighbors(x, y)
            .all(|(nx, ny)| board.get(nx, ny) == Some(color))
}

/// Area-style score from Black's point of view: stones plus eye-like empty
/// points. No komi.
pub fn score(board: &Board) -> f64 {
    let mut s = 0.0;
    for (x, y) in board.points() {
        let owner = match board.get(x, y) {
            Some(c) => Some(c),
            None if is_eyeish(board, x, y, Color::Black) => Some(Color::Black),
            None if is_eyeish(board, x, y, Color::White) => Some(Color::White),
            None => None,
        };
        match owner {
            Some(Color::Black) => s += 1.0,
            Some(Color::White) => s -= 1.0,
            None => {}
        }
    }
    s
}

/// Play random moves on a scratch copy of `state` until two passes in a row
/// or the length limit. Returns the final [`score`].
pub fn playout(state: &mut GameState, rng: &mut fastrand::Rng) -> f64 {
    let size = state.size();
    let limit = PLAYOUT_LENGTH_FACTOR * size * size;
    let mut passes = 0;
    let mut moves = 0;

    while passes < 2 && moves < limit {
        let color = state.current_player;
        match choose_random_move(state, color, rng) {
            Some((pt, placement)) => {
                state.commit(color, pt, placement);
                passes = 0;
            }
            None => {
                state.current_player = color.opponent();
                state.ko_point = None;
                passes += 1;
            }
        }
        moves += 1;
    }
    score(&state.board)
}

/// A random legal point for `color` that is not one of its own eye-like
/// points, together with the validated placement.
fn choose_random_move(
    state: &GameState,
    color: Color,
    rng: &mut fastrand::Rng,
) -> Option<(Point, Placement)> {
    let board = &state.board;
    let mut candidates: Vec<Point> = board
        .points()
        .filter(|&(x, y)| board.get(x, y).is_none() && !is_eyeish(board, x, y, color))
        .collect();

    // Partial shuffle: stop at the first legal candidate.
    let n = candidates.len();
    for i in 0..n {
        let j = rng.usize(i..n);
        candidates.swap(i, j);
        let (x, y) = candidates[i];
        if let Ok(p) = check_move(board, state.previous_board.as_ref(), x, y, color) {
            return Some(((x, y), p));
        }
    }
    None
}

/// Statistics for one root move.
#[derive(Clone, Debug)]
struct Arm {
    point: Point,
    visits: u32,
    wins: u32,
}

impl Arm {
    fn winrate(&self) -> f64 {
        if self.visits > 0 {
            self.wins as f64 / self.visits as f64
        } else {
            0.0
        }
    }

    fn urgency(&self, total: u32, exploration: f64) -> f64 {
        if self.visits == 0 {
            return f64::INFINITY;
        }
        self.winrate() + exploration * ((total as f64).ln() / self.visits as f64).sqrt()
    }
}

/// Flat Monte Carlo search with UCB1 over the root moves.
pub struct PlayoutSearch {
    rng: fastrand::Rng,
}

impl Default for PlayoutSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayoutSearch {
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl SearchProcedure for PlayoutSearch {
    fn search(
        &mut self,
        state: &GameState,
        color: Color,
        params: &SearchParams,
    ) -> Result<Option<Point>> {
        let start = Instant::now();
        let mut arms: Vec<Arm> = state
            .legal_moves(color)
            .into_iter()
            .filter(|&(x, y)| !is_eyeish(&state.board, x, y, color))
            .map(|point| Arm {
                point,
                visits: 0,
                wins: 0,
            })
            .collect();
        if arms.is_empty() {
            bail!("no candidate moves for {color}");
        }

        let mut total = 0u32;
        for _ in 0..params.simulations.max(arms.len()) {
            if start.elapsed() >= params.inner_timeout {
                break;
            }
            let idx = most_urgent(&arms, total, params.exploration);
            let (x, y) = arms[idx].point;

            let mut scratch = state.clone();
            let placement =
                check_move(&scratch.board, scratch.previous_board.as_ref(), x, y, color)?;
            scratch.commit(color, (x, y), placement);
            let s = playout(&mut scratch, &mut self.rng);

            let won = match color {
                Color::Black => s > 0.0,
                Color::White => s < 0.0,
            };
            arms[idx].visits += 1;
            if won {
                arms[idx].wins += 1;
            }
            total += 1;
        }

        let best = arms
            .iter()
            .filter(|a| a.visits > 0)
            .max_by(|a, b| {
                a.winrate()
                    .partial_cmp(&b.winrate())
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.visits.cmp(&b.visits))
            });
        match best {
            Some(arm) => {
                debug!(
                    point = ?arm.point,
                    visits = arm.visits,
                    winrate = arm.winrate(),
                    total,
                    "playout search"
                );
                Ok(Some(arm.point))
            }
            None => Ok(None),
        }
    }
}

fn most_urgent(arms: &[Arm], total: u32, exploration: f64) -> usize {
    arms.iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| {
            a.urgency(total, exploration)
                .partial_cmp(&b.urgency(total, exploration))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)
        .unwrap_or(0)
}
