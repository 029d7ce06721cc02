//! Default board geometry, agent parameters and protocol limits.
//!
//! Board size is chosen at runtime (`--size`, GTP `boardsize`); the values
//! here are defaults and hard bounds.

// =============================================================================
// Board Geometry
// =============================================================================

/// Default board size (NxN).
pub const DEFAULT_BOARD_SIZE: usize = 9;

/// Smallest accepted board.
pub const MIN_BOARD_SIZE: usize = 2;

/// Largest accepted board. GTP column letters run out at 25.
pub const MAX_BOARD_SIZE: usize = 25;

/// Self-play stops after `MAX_GAME_FACTOR * N * N` moves.
pub const MAX_GAME_FACTOR: usize = 3;

// =============================================================================
// Opening Heuristic
// =============================================================================

/// The opening heuristic is consulted while fewer stones than this are on
/// the board.
pub const OPENING_STONE_LIMIT: usize = 10;

// =============================================================================
// Bounded-Time Search
// =============================================================================

/// Simulation budget passed to the search procedure.
pub const SEARCH_SIMULATIONS: usize = 100;

/// Exploration constant passed to the search procedure.
pub const SEARCH_EXPLORATION: f64 = 1.4;

/// Inner timeout handed to a single search invocation, in milliseconds.
pub const SEARCH_INNER_TIMEOUT_MS: u64 = 28_000;

/// Outer wall-clock deadline for the whole retry loop, in milliseconds.
pub const SEARCH_DEADLINE_MS: u64 = 30_000;

/// Random playouts stop after this many moves per board point.
pub const PLAYOUT_LENGTH_FACTOR: usize = 2;
