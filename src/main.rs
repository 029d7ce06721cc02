//! Tengen: Go rules engine and agents.
//!
//! ## Usage
//!
//! - `tengen gtp` - Start a GTP server for GUI integration
//! - `tengen selfplay` - Let two agents play a full game
//! - `tengen demo` (default) - A short scripted game with a capture
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`.

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::builder::TypedValueParser;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tengen::agent::{Agent, Orchestrator, UniformRandom};
use tengen::board::Color;
use tengen::constants::{
    DEFAULT_BOARD_SIZE, MAX_BOARD_SIZE, MAX_GAME_FACTOR, MIN_BOARD_SIZE, SEARCH_DEADLINE_MS,
    SEARCH_EXPLORATION, SEARCH_INNER_TIMEOUT_MS, SEARCH_SIMULATIONS,
};
use tengen::game::Game;
use tengen::gtp::{GtpEngine, format_vertex};
use tengen::playout::PlayoutSearch;
use tengen::policy::{PolicySampling, PolicyTable};
use tengen::search::{BoundedTimeSearch, SearchParams};

/// Tengen: a Go rules engine with simple playing agents
#[derive(Parser)]
#[command(name = "tengen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Board size
    #[arg(long, global = true, default_value_t = DEFAULT_BOARD_SIZE,
          value_parser = clap::value_parser!(u16).range(MIN_BOARD_SIZE as i64..=MAX_BOARD_SIZE as i64).map(usize::from))]
    size: usize,

    /// Which agent picks moves
    #[arg(long, global = true, value_enum, default_value_t = AgentKind::Orchestrated)]
    agent: AgentKind,

    /// Seed for reproducible agents
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Simulations per search invocation
    #[arg(long, global = true, default_value_t = SEARCH_SIMULATIONS)]
    sims: usize,

    /// Outer search deadline in milliseconds
    #[arg(long, global = true, default_value_t = SEARCH_DEADLINE_MS)]
    deadline_ms: u64,

    /// Timeout for a single search invocation in milliseconds
    #[arg(long, global = true, default_value_t = SEARCH_INNER_TIMEOUT_MS)]
    inner_timeout_ms: u64,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the GTP (Go Text Protocol) server for use with GUI applications
    Gtp,
    /// Let the selected agent play both sides until the game ends
    Selfplay,
    /// Run a short scripted demo
    Demo,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AgentKind {
    /// Opening heuristic, then bounded search, then random
    Orchestrated,
    /// Sampling from a center-weighted policy
    Policy,
    /// Uniformly random legal moves
    Random,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Gtp) => {
            let mut engine = GtpEngine::new(cli.size, build_agent(&cli));
            engine
                .run(io::stdin().lock(), io::stdout().lock())
                .context("GTP session failed")
        }
        Some(Commands::Selfplay) => run_selfplay(&cli),
        Some(Commands::Demo) | None => run_demo(),
    }
}

fn build_agent(cli: &Cli) -> Orchestrator {
    let seeded = |offset: u64| cli.seed.map(|s| s.wrapping_add(offset));
    let random = match seeded(0) {
        Some(s) => UniformRandom::with_seed(s),
        None => UniformRandom::new(),
    };
    match cli.agent {
        AgentKind::Orchestrated => {
            let procedure = match seeded(1) {
                Some(s) => PlayoutSearch::with_seed(s),
                None => PlayoutSearch::new(),
            };
            let params = SearchParams {
                simulations: cli.sims,
                exploration: SEARCH_EXPLORATION,
                inner_timeout: Duration::from_millis(cli.inner_timeout_ms),
            };
            let search = BoundedTimeSearch::with_limits(
                Box::new(procedure),
                params,
                Duration::from_millis(cli.deadline_ms),
            );
            Orchestrator::standard(search, random)
        }
        AgentKind::Policy => {
            let mut table = PolicyTable::new();
            table.insert(cli.size, PolicyTable::center_weighted(cli.size));
            let policy = match seeded(2) {
                Some(s) => PolicySampling::with_seed(Box::new(table), s),
                None => PolicySampling::new(Box::new(table)),
            };
            Orchestrator::new(vec![Agent::PolicySampling(policy)])
        }
        AgentKind::Random => Orchestrator::new(vec![Agent::UniformRandom(random)]),
    }
}

fn run_selfplay(cli: &Cli) -> Result<()> {
    let mut game = Game::new(cli.size);
    let mut agent = build_agent(cli);
    let max_moves = MAX_GAME_FACTOR * cli.size * cli.size;
    info!(size = cli.size, agent = ?cli.agent, "self-play started");

    while !game.state().is_over() && game.state().move_number < max_moves {
        let color = game.current_player();
        let choice = agent.select_move(game.state(), color);
        match choice {
            Some((x, y)) => {
                game.place_stone(color, x, y)
                    .with_context(|| format!("agent proposed {x},{y} for {color}"))?;
            }
            None => {
                game.pass(color).context("agent pass refused")?;
            }
        }
        println!(
            "{:>3}. {color} {}",
            game.state().move_number,
            format_vertex(choice, cli.size)
        );
    }

    if !game.state().is_over() {
        println!("Move limit reached");
    }
    print!("{}", game.state());
    Ok(())
}

fn run_demo() -> Result<()> {
    println!("Tengen: Go rules engine\n");

    // Black takes a ko at (5,4); White may not retake at (4,4) at once.
    let mut game = Game::new(DEFAULT_BOARD_SIZE);
    let script = [
        (Color::Black, 4, 3),
        (Color::White, 4, 4),
        (Color::Black, 3, 4),
        (Color::White, 5, 3),
        (Color::Black, 4, 5),
        (Color::White, 6, 4),
        (Color::Black, 2, 2),
        (Color::White, 5, 5),
        (Color::Black, 5, 4),
    ];
    for (color, x, y) in script {
        let placement = game.place_stone(color, x, y)?;
        if !placement.captured.is_empty() {
            println!("{color} at ({x},{y}) captures {:?}", placement.captured);
        }
    }
    print!("{}", game.state());
    println!("Ko point: {:?}", game.state().ko_point);

    if let Err(e) = game.place_stone(Color::White, 4, 4) {
        println!("White retakes at (4,4): {e}");
    }

    game.pass(Color::White)?;
    game.pass(Color::Black)?;
    if let Some(t) = &game.state().terminal {
        println!("{}", t.summary);
    }
    Ok(())
}
