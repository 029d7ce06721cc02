//! Move-selection agents.
//!
//! Every agent reads a [`GameState`] and proposes a point for `color`, or
//! `None` when it has nothing to offer. For the last agent in a chain `None`
//! means "pass". Agents never mutate the game; the caller feeds the proposal
//! back through [`Game`](crate::game::Game).

use tracing::debug;

use crate::board::{Color, Point};
use crate::constants::OPENING_STONE_LIMIT;
use crate::game::GameState;
use crate::policy::PolicySampling;
use crate::search::BoundedTimeSearch;

/// The agent variants, dispatched by `match`.
pub enum Agent {
    UniformRandom(UniformRandom),
    PolicySampling(PolicySampling),
    OpeningHeuristic(OpeningHeuristic),
    BoundedTimeSearch(BoundedTimeSearch),
}

impl Agent {
    pub fn name(&self) -> &'static str {
        match self {
            Agent::UniformRandom(_) => "uniform-random",
            Agent::PolicySampling(_) => "policy-sampling",
            Agent::OpeningHeuristic(_) => "opening-heuristic",
            Agent::BoundedTimeSearch(_) => "bounded-time-search",
        }
    }

    pub fn select_move(&mut self, state: &GameState, color: Color) -> Option<Point> {
        match self {
            Agent::UniformRandom(a) => a.select_move(state, color),
            Agent::PolicySampling(a) => a.select_move(state, color),
            Agent::OpeningHeuristic(a) => a.select_move(state, color),
            Agent::BoundedTimeSearch(a) => a.select_move(state, color),
        }
    }
}

/// Picks uniformly among all legal points.
pub struct UniformRandom {
    rng: fastrand::Rng,
}

impl Default for UniformRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl UniformRandom {
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

    pub fn select_move(&mut self, state: &GameState, color: Color) -> Option<Point> {
        let moves = state.legal_moves(color);
        if moves.is_empty() {
            return None;
        }
        Some(moves[self.rng.usize(..moves.len())])
    }
}

/// Takes a corner or star point while the board is nearly empty.
#[derive(Clone, Copy, Debug, Default)]
pub struct OpeningHeuristic;

impl OpeningHeuristic {
    /// Candidate points in priority order: 4-4 points, then 3-3 points.
    /// Points that do not fit on a small board are dropped.
    pub fn priority_points(size: usize) -> Vec<Point> {
        let n = size as isize;
        let raw = [
            (3, 3),
            (n - 4, 3),
            (3, n - 4),
            (n - 4, n - 4),
            (2, 2),
            (n - 3, 2),
            (2, n - 3),
            (n - 3, n - 3),
        ];
        raw.iter()
            .filter(|&&(x, y)| x >= 0 && y >= 0 && x < n && y < n)
            .map(|&(x, y)| (x as usize, y as usize))
            .collect()
    }

    pub fn select_move(&mut self, state: &GameState, color: Color) -> Option<Point> {
        if state.board.stone_count() >= OPENING_STONE_LIMIT {
            return None;
        }
        let choice = Self::priority_points(state.size())
            .into_iter()
            .find(|&(x, y)| state.is_legal(x, y, color));
        debug!(?choice, "opening heuristic");
        choice
    }
}

/// Tries each agent in order and returns the first proposal.
///
/// The default chain is opening heuristic, then bounded-time search, then
/// uniform random. Because the random agent only gives up when there is no
/// legal point, that chain yields a legal move whenever one exists. The
/// total time is bounded by the search deadline plus one search invocation.
pub struct Orchestrator {
    chain: Vec<Agent>,
}

impl Orchestrator {
    pub fn new(chain: Vec<Agent>) -> Self {
        Self { chain }
    }

    /// Opening heuristic, then `search`, then uniform random.
    pub fn standard(search: BoundedTimeSearch, random: UniformRandom) -> Self {
        Self::new(vec![
            Agent::OpeningHeuristic(OpeningHeuristic),
            Agent::BoundedTimeSearch(search),
            Agent::UniformRandom(random),
        ])
    }

    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.chain.iter()
    }

    pub fn select_move(&mut self, state: &GameState, color: Color) -> Option<Point> {
        for agent in &mut self.chain {
            if let Some(pt) = agent.select_move(state, color) {
                debug!(agent = agent.name(), ?pt, "move selected");
                return Some(pt);
            }
            debug!(agent = agent.name(), "no proposal, falling through");
        }
        None
    }
}
