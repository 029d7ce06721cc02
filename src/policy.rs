//! Weighted sampling from a per-size policy vector.
//!
//! Weights are row-major, one per intersection (`y * size + x`). They need
//! not be normalized; negative and non-finite entries count as zero. When no
//! vector of the right length exists for the board, the agent falls back to
//! uniform random play.

use std::collections::HashMap;

use tracing::warn;

use crate::agent::UniformRandom;
use crate::board::{Color, Point};
use crate::game::GameState;

/// Source of policy weights, keyed by board size.
pub trait WeightsProvider {
    fn weights(&self, size: usize) -> Option<&[f64]>;
}

/// In-memory weights table.
#[derive(Clone, Debug, Default)]
pub struct PolicyTable {
    by_size: HashMap<usize, Vec<f64>>,
}

impl PolicyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, size: usize, weights: Vec<f64>) {
        self.by_size.insert(size, weights);
    }

    /// Weights favoring the center, falling off linearly toward the edges.
    pub fn center_weighted(size: usize) -> Vec<f64> {
        let mid = (size as f64 - 1.0) / 2.0;
        let mut w = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                let d = (x as f64 - mid).abs().max((y as f64 - mid).abs());
                w.push(mid + 1.0 - d);
            }
        }
        w
    }
}

impl WeightsProvider for PolicyTable {
    fn weights(&self, size: usize) -> Option<&[f64]> {
        self.by_size.get(&size).map(Vec::as_slice)
    }
}

pub struct PolicySampling {
    provider: Box<dyn WeightsProvider>,
    rng: fastrand::Rng,
    fallback: UniformRandom,
}

impl PolicySampling {
    pub fn new(provider: Box<dyn WeightsProvider>) -> Self {
        Self {
            provider,
            rng: fastrand::Rng::new(),
            fallback: UniformRandom::new(),
        }
    }

    pub fn with_seed(provider: Box<dyn WeightsProvider>, seed: u64) -> Self {
        Self {
            provider,
            rng: fastrand::Rng::with_seed(seed),
            fallback: UniformRandom::with_seed(seed.wrapping_add(1)),
        }
    }

    pub fn select_move(&mut self, state: &GameState, color: Color) -> Option<Point> {
        let size = state.size();
        let weights = match self.provider.weights(size) {
            Some(w) if w.len() == size * size => w,
            Some(w) => {
                warn!(
                    size,
                    len = w.len(),
                    "policy weights do not match board, playing randomly"
                );
                return self.fallback.select_move(state, color);
            }
            None => {
                warn!(size, "no policy weights for board size, playing randomly");
                return self.fallback.select_move(state, color);
            }
        };

        let candidates: Vec<(Point, f64)> = state
            .legal_moves(color)
            .into_iter()
            .map(|(x, y)| ((x, y), sanitize(weights[y * size + x])))
            .collect();
        let first = candidates.first()?.0;

        let total: f64 = candidates.iter().map(|&(_, w)| w).sum();
        let mut r = self.rng.f64() * total;
        for &(pt, w) in &candidates {
            r -= w;
            if r <= 0.0 {
                return Some(pt);
            }
        }
        Some(first)
    }
}

fn sanitize(w: f64) -> f64 {
    if w.is_finite() && w > 0.0 { w } else { 0.0 }
}
