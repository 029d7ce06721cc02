//! Bounded-time wrapper around an external search procedure.
//!
//! The deadline is best-effort. [`BoundedTimeSearch`] checks the clock only
//! between invocations of the procedure, and an invocation cannot be
//! interrupted. A single call that blocks past the deadline overruns it by
//! that call's duration. Procedures are expected to honor
//! [`SearchParams::inner_timeout`] themselves.

use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{debug, warn};

use crate::board::{Color, Point};
use crate::constants::{
    SEARCH_DEADLINE_MS, SEARCH_EXPLORATION, SEARCH_INNER_TIMEOUT_MS, SEARCH_SIMULATIONS,
};
use crate::game::GameState;

/// Budget handed to every invocation of a [`SearchProcedure`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchParams {
    pub simulations: usize,
    pub exploration: f64,
    pub inner_timeout: Duration,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            simulations: SEARCH_SIMULATIONS,
            exploration: SEARCH_EXPLORATION,
            inner_timeout: Duration::from_millis(SEARCH_INNER_TIMEOUT_MS),
        }
    }
}

/// A move search treated as a black box.
///
/// `Ok(Some(pt))` is an answer, `Ok(None)` means "no answer yet" and is
/// retried while time remains, `Err` abandons the search.
pub trait SearchProcedure {
    fn search(
        &mut self,
        state: &GameState,
        color: Color,
        params: &SearchParams,
    ) -> Result<Option<Point>>;
}

pub struct BoundedTimeSearch {
    procedure: Box<dyn SearchProcedure>,
    params: SearchParams,
    deadline: Duration,
}

impl BoundedTimeSearch {
    pub fn new(procedure: Box<dyn SearchProcedure>) -> Self {
        Self::with_limits(
            procedure,
            SearchParams::default(),
            Duration::from_millis(SEARCH_DEADLINE_MS),
        )
    }

    pub fn with_limits(
        procedure: Box<dyn SearchProcedure>,
        params: SearchParams,
        deadline: Duration,
    ) -> Self {
        Self {
            procedure,
            params,
            deadline,
        }
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Poll the procedure until it answers, fails, or the deadline passes.
    ///
    /// Answers that are not legal for `color` are treated as failures.
    pub fn select_move(&mut self, state: &GameState, color: Color) -> Option<Point> {
        let start = Instant::now();
        let mut attempts = 0u32;
        while start.elapsed() < self.deadline {
            attempts += 1;
            match self.procedure.search(state, color, &self.params) {
                Ok(Some((x, y))) if state.is_legal(x, y, color) => {
                    debug!(x, y, attempts, elapsed = ?start.elapsed(), "search answered");
                    return Some((x, y));
                }
                Ok(Some(pt)) => {
                    warn!(?pt, "search proposed an illegal move");
                    return None;
                }
                Ok(None) => continue,
                Err(e) => {
                    warn!(error = %e, attempts, "search failed");
                    return None;
                }
            }
        }
        warn!(attempts, deadline = ?self.deadline, "search deadline elapsed");
        None
    }
}
