//! Tengen: Go rules engine and move-selection agents.
//!
//! The engine enforces bounds, occupancy, suicide and a single-ply ko rule,
//! resolves captures by group and liberty analysis, and runs the
//! pass/resign lifecycle. A small family of agents reads the game state and
//! proposes moves.
//!
//! ## Modules
//!
//! - [`board`] - Board grid, colors and points
//! - [`group`] - Flood fill and liberty counting
//! - [`capture`] - Pure placement with capture resolution
//! - [`rules`] - Legality checks and the move error type
//! - [`game`] - Game state and its transitions
//! - [`remote`] - Applying trusted events from a remote peer
//! - [`agent`] - Random and opening agents, and the orchestrator
//! - [`policy`] - Weighted sampling from a policy vector
//! - [`search`] - Deadline-bounded wrapper around a search procedure
//! - [`playout`] - Built-in Monte Carlo search procedure
//! - [`gtp`] - Go Text Protocol front end
//!
//! ## Example
//!
//! ```
//! use tengen::agent::{Agent, OpeningHeuristic, Orchestrator, UniformRandom};
//! use tengen::board::Color;
//! use tengen::game::Game;
//!
//! let mut game = Game::new(9);
//! game.place_stone(Color::Black, 4, 4).unwrap();
//!
//! let mut agent = Orchestrator::new(vec![
//!     Agent::OpeningHeuristic(OpeningHeuristic),
//!     Agent::UniformRandom(UniformRandom::new()),
//! ]);
//! let (x, y) = agent.select_move(game.state(), Color::White).unwrap();
//! game.place_stone(Color::White, x, y).unwrap();
//! ```

pub mod agent;
pub mod board;
pub mod capture;
pub mod constants;
pub mod game;
pub mod group;
pub mod gtp;
pub mod playout;
pub mod policy;
pub mod remote;
pub mod rules;
pub mod search;
