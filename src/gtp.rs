//! Go Text Protocol (GTP) front end.
//!
//! Implements enough of GTP version 2 to drive the engine from a graphical
//! client such as Sabaki or GoGui.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`
//! - `list_commands`, `known_command <cmd>`
//! - `quit`
//! - `boardsize <size>` - Any size from 2 to 25; clears the board
//! - `clear_board` - Start a fresh game
//! - `play <color> <vertex>` - Play a move or `pass`; must be that color's turn
//! - `genmove <color>` - Ask the agents for a move and play it
//! - `showboard` - Print the board
//! - `final_score` - Result of a finished game
//!
//! Vertices use letters A-Z without I for columns and 1-based rows counted
//! from the bottom edge.

use std::io::{BufRead, Write};

use anyhow::Result;
use tracing::{debug, info};

use crate::agent::Orchestrator;
use crate::board::{Color, Point};
use crate::constants::{MAX_BOARD_SIZE, MIN_BOARD_SIZE};
use crate::game::Game;

/// The list of known GTP commands.
const KNOWN_COMMANDS: &[&str] = &[
    "boardsize",
    "clear_board",
    "final_score",
    "genmove",
    "known_command",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "showboard",
    "version",
];

/// Column letters; GTP skips `I`.
const COLUMNS: &[u8] = b"ABCDEFGHJKLMNOPQRSTUVWXYZ";

/// Parse a vertex such as `D4` or `pass`.
///
/// Returns `Some(None)` for a pass, `Some(Some(point))` for an on-board
/// vertex and `None` for anything else.
pub fn parse_vertex(s: &str, size: usize) -> Option<Option<Point>> {
    if s.eq_ignore_ascii_case("pass") {
        return Some(None);
    }
    let upper = s.to_ascii_uppercase();
    let (col, row) = upper.split_at_checked(1)?;
    let x = COLUMNS.iter().position(|&c| c == col.as_bytes()[0])?;
    let row: usize = row.parse().ok()?;
    if x >= size || row == 0 || row > size {
        return None;
    }
    Some(Some((x, size - row)))
}

/// Format a point as a vertex, or `pass` for `None`.
pub fn format_vertex(pt: Option<Point>, size: usize) -> String {
    match pt {
        None => "pass".into(),
        Some((x, y)) => format!("{}{}", COLUMNS[x] as char, size - y),
    }
}

/// GTP engine state.
pub struct GtpEngine {
    game: Game,
    agent: Orchestrator,
}

impl GtpEngine {
    pub fn new(size: usize, agent: Orchestrator) -> Self {
        Self {
            game: Game::new(size),
            agent,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Run the GTP command loop until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        for line in input.lines() {
            let line = line?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }

            let command = parts[0].to_lowercase();
            let args = &parts[1..];
            debug!(%command, ?args, "gtp command");

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            write!(output, "{prefix}{id_str} {message}\n\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end > 0 {
            if let Ok(id) = trimmed[..end].parse::<u32>() {
                return (Some(id), trimmed[end..].trim());
            }
        }
        (None, trimmed)
    }

    /// Execute a GTP command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "2".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => match args.first() {
                Some(cmd) => {
                    let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                    (true, known.to_string())
                }
                None => (false, "missing argument".to_string()),
            },

            "quit" => (true, String::new()),

            "boardsize" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                match arg.parse::<usize>() {
                    Ok(size) if (MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) => {
                        self.game.resize(size);
                        (true, String::new())
                    }
                    Ok(_) => (false, "unacceptable size".to_string()),
                    Err(_) => (false, "invalid size".to_string()),
                }
            }

            "clear_board" => {
                self.game.restart();
                (true, String::new())
            }

            "play" => {
                if args.len() < 2 {
                    return (false, "missing arguments".to_string());
                }
                let Some(color) = Color::parse(args[0]) else {
                    return (false, "invalid color".to_string());
                };
                let size = self.game.state().size();
                let result = match parse_vertex(args[1], size) {
                    Some(Some((x, y))) => self.game.place_stone(color, x, y).map(|_| ()),
                    Some(None) => self.game.pass(color).map(|_| ()),
                    None => return (false, "invalid vertex".to_string()),
                };
                match result {
                    Ok(()) => (true, String::new()),
                    Err(e) => (false, e.to_string()),
                }
            }

            "genmove" => {
                let Some(color) = args.first().and_then(|a| Color::parse(a)) else {
                    return (false, "invalid color".to_string());
                };
                if self.game.state().is_over() {
                    return (false, "game is over".to_string());
                }
                if color != self.game.current_player() {
                    return (false, format!("not {color}'s turn"));
                }
                self.genmove(color)
            }

            "showboard" => (true, format!("\n{}", self.game.state())),

            "final_score" => match &self.game.state().terminal {
                Some(t) => (true, t.summary.clone()),
                None => (false, "game is not over".to_string()),
            },

            _ => (false, format!("unknown command: {command}")),
        }
    }

    fn genmove(&mut self, color: Color) -> (bool, String) {
        let size = self.game.state().size();
        let choice = self.agent.select_move(self.game.state(), color);
        let played = match choice {
            Some((x, y)) => self.game.place_stone(color, x, y).map(|_| Some((x, y))),
            None => self.game.pass(color).map(|_| None),
        };
        match played {
            Ok(pt) => {
                let vertex = format_vertex(pt, size);
                info!(%color, %vertex, "genmove");
                (true, vertex)
            }
            Err(e) => (false, e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{Agent, OpeningHeuristic, UniformRandom};

    fn engine() -> GtpEngine {
        let agent = Orchestrator::new(vec![
            Agent::OpeningHeuristic(OpeningHeuristic),
            Agent::UniformRandom(UniformRandom::with_seed(5)),
        ]);
        GtpEngine::new(9, agent)
    }

    #[test]
    fn test_parse_id_with_id() {
        let (id, cmd) = GtpEngine::parse_id("123 name");
        assert_eq!(id, Some(123));
        assert_eq!(cmd, "name");
    }

    #[test]
    fn test_parse_id_without_id() {
        let (id, cmd) = GtpEngine::parse_id("name");
        assert_eq!(id, None);
        assert_eq!(cmd, "name");
    }

    #[test]
    fn test_vertex_roundtrip() {
        assert_eq!(parse_vertex("A1", 9), Some(Some((0, 8))));
        assert_eq!(parse_vertex("j9", 9), Some(Some((8, 0))));
        assert_eq!(parse_vertex("PASS", 9), Some(None));
        assert_eq!(parse_vertex("I5", 9), None);
        assert_eq!(parse_vertex("K1", 9), None);
        assert_eq!(parse_vertex("A0", 9), None);
        assert_eq!(parse_vertex("", 9), None);
        assert_eq!(format_vertex(Some((0, 8)), 9), "A1");
        assert_eq!(format_vertex(Some((8, 0)), 9), "J9");
        assert_eq!(format_vertex(None, 9), "pass");
    }

    #[test]
    fn test_known_command() {
        let mut engine = engine();
        assert_eq!(engine.execute("known_command", &["genmove"]), (true, "true".into()));
        assert_eq!(engine.execute("known_command", &["komi"]), (true, "false".into()));
    }

    #[test]
    fn test_boardsize() {
        let mut engine = engine();
        let (success, _) = engine.execute("boardsize", &["13"]);
        assert!(success);
        assert_eq!(engine.game().state().size(), 13);
        let (success, _) = engine.execute("boardsize", &["30"]);
        assert!(!success);
    }

    #[test]
    fn test_play_enforces_turn_order() {
        let mut engine = engine();
        let (success, _) = engine.execute("play", &["black", "D4"]);
        assert!(success);
        let (success, msg) = engine.execute("play", &["black", "E5"]);
        assert!(!success);
        assert_eq!(msg, "not Black's turn");
        let (success, msg) = engine.execute("play", &["white", "D4"]);
        assert!(!success);
        assert_eq!(msg, "illegal move: point not empty");
    }

    #[test]
    fn test_genmove_uses_opening_point() {
        let mut engine = engine();
        let (success, vertex) = engine.execute("genmove", &["b"]);
        assert!(success);
        assert_eq!(vertex, "D6");
        assert_eq!(engine.game().state().board.get(3, 3), Some(Color::Black));
    }

    #[test]
    fn test_two_passes_then_final_score() {
        let mut engine = engine();
        let (success, _) = engine.execute("final_score", &[]);
        assert!(!success);
        assert!(engine.execute("play", &["b", "pass"]).0);
        assert!(!engine.execute("play", &["b", "pass"]).0);
        assert!(engine.execute("play", &["w", "pass"]).0);
        let (success, summary) = engine.execute("final_score", &[]);
        assert!(success);
        assert_eq!(summary, "Draw at 0");
    }

    #[test]
    fn test_run_writes_responses() {
        let mut engine = engine();
        let input = b"1 name\n# comment\nprotocol_version\nquit\nname\n";
        let mut out = Vec::new();
        engine.run(&input[..], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "=1 tengen\n\n= 2\n\n= \n\n");
    }
}
