//! Inbound remote-play events.
//!
//! Events from the peer are trusted: a remote move is written to the board
//! without running the validator, and the sender's capture count and turn
//! are taken as given. Opponent groups left without liberties by the stone
//! are still cleared so the board stays consistent. Only bounds are checked,
//! since an off-board point cannot be represented at all.

use tracing::{debug, warn};

use crate::board::{Color, Point};
use crate::capture::{Placement, remove_dead_neighbors};
use crate::game::{Game, Phase};
use crate::rules::MoveError;

/// One message from the peer, mirroring what the local side sends.
#[derive(Clone, Debug, PartialEq)]
pub enum RemoteEvent {
    Move {
        x: usize,
        y: usize,
        color: Color,
        /// Side to move after this one, as the sender sees it.
        current_turn: Option<Color>,
        captured: usize,
    },
    Pass {
        current_turn: Option<Color>,
        /// The sender's result line, used if this pass ends the game.
        summary: Option<String>,
    },
    Resign {
        winner: Color,
    },
    GameOver {
        summary: String,
    },
    Restart {
        current_player: Option<Color>,
    },
}

impl Game {
    /// Apply a peer event directly to the state. Returns the resulting phase.
    pub fn apply_remote(&mut self, event: RemoteEvent) -> Result<Phase, MoveError> {
        debug!(?event, "remote event");
        match event {
            RemoteEvent::Restart { current_player } => {
                self.restart();
                if let Some(c) = current_player {
                    self.state_mut().current_player = c;
                }
            }
            _ if self.state().is_over() => return Err(MoveError::GameOver),
            RemoteEvent::Move {
                x,
                y,
                color,
                current_turn,
                captured,
            } => {
                if !self.state().board.in_bounds(x, y) {
                    warn!(x, y, "remote move off the board");
                    return Err(MoveError::InvalidPosition { x, y });
                }
                let placement = place_unchecked(self, (x, y), color);
                let state = self.state_mut();
                let tally = state.captures;
                // Without a turn from the sender, flip the local side to move.
                let next = state.current_player.opponent();
                state.commit(color, (x, y), placement);
                // The sender's capture count replaces what was removed here.
                state.captures = tally;
                state.captures.add(color, captured);
                state.current_player = current_turn.unwrap_or(next);
            }
            RemoteEvent::Pass {
                current_turn,
                summary,
            } => {
                let state = self.state_mut();
                state.pass_count += 1;
                state.awaiting_opponent_pass = false;
                state.ko_point = None;
                state.last_move = None;
                state.move_number += 1;
                let next = state.current_player.opponent();
                state.current_player = current_turn.unwrap_or(next);
                if state.pass_count >= 2 {
                    match summary {
                        Some(summary) => self.end_with_summary(summary),
                        None => self.finish_by_pass(),
                    }
                }
            }
            RemoteEvent::Resign { winner } => self.end_by_resignation(winner.opponent()),
            RemoteEvent::GameOver { summary } => self.end_with_summary(summary),
        }
        Ok(self.phase())
    }
}

/// Write the stone and clear dead neighbors, without any legality checks.
fn place_unchecked(game: &Game, (x, y): Point, color: Color) -> Placement {
    let mut board = game.state().board.clone();
    board.set(x, y, Some(color));
    let captured = remove_dead_neighbors(&mut board, x, y, color);
    Placement {
        board,
        captured,
        legal: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::EndReason;

    #[test]
    fn test_remote_move_is_not_revalidated() {
        let mut game = Game::new(9);
        game.place_stone(Color::Black, 4, 4).unwrap();
        // White to move, but the peer says Black played again. Trusted.
        let phase = game
            .apply_remote(RemoteEvent::Move {
                x: 5,
                y: 5,
                color: Color::Black,
                current_turn: Some(Color::White),
                captured: 0,
            })
            .unwrap();
        assert_eq!(phase, Phase::Active);
        assert_eq!(game.state().board.get(5, 5), Some(Color::Black));
        assert_eq!(game.current_player(), Color::White);
    }

    #[test]
    fn test_remote_move_uses_sender_capture_count() {
        let mut game = Game::new(9);
        for (c, x, y) in [
            (Color::Black, 4, 3),
            (Color::White, 4, 4),
            (Color::Black, 3, 4),
            (Color::White, 0, 0),
            (Color::Black, 5, 4),
        ] {
            game.place_stone(c, x, y).unwrap();
        }
        game
            .apply_remote(RemoteEvent::Pass {
                current_turn: None,
                summary: None,
            })
            .unwrap();
        game.apply_remote(RemoteEvent::Move {
            x: 4,
            y: 5,
            color: Color::Black,
            current_turn: None,
            captured: 1,
        })
        .unwrap();
        let s = game.state();
        assert_eq!(s.board.get(4, 4), None);
        assert_eq!(s.captures.black, 1);
        assert_eq!(s.pass_count, 0);
    }

    #[test]
    fn test_remote_off_board_rejected() {
        let mut game = Game::new(9);
        let before = game.state().clone();
        assert_eq!(
            game.apply_remote(RemoteEvent::Move {
                x: 9,
                y: 1,
                color: Color::Black,
                current_turn: None,
                captured: 0,
            }),
            Err(MoveError::InvalidPosition { x: 9, y: 1 })
        );
        assert_eq!(game.state(), &before);
    }

    #[test]
    fn test_local_pass_then_remote_pass_ends_game() {
        let mut game = Game::new(9);
        game.pass(Color::Black).unwrap();
        let phase = game
            .apply_remote(RemoteEvent::Pass {
                current_turn: Some(Color::Black),
                summary: None,
            })
            .unwrap();
        assert_eq!(phase, Phase::Terminal(EndReason::PassOut));
        assert!(game.state().terminal.as_ref().unwrap().score.is_some());
    }

    #[test]
    fn test_remote_resign_and_restart() {
        let mut game = Game::new(9);
        game.apply_remote(RemoteEvent::Resign {
            winner: Color::White,
        })
        .unwrap();
        assert_eq!(
            game.phase(),
            Phase::Terminal(EndReason::Resignation {
                loser: Color::Black
            })
        );
        assert_eq!(
            game.apply_remote(RemoteEvent::Pass {
                current_turn: None,
                summary: None,
            }),
            Err(MoveError::GameOver)
        );
        game.apply_remote(RemoteEvent::Restart {
            current_player: Some(Color::White),
        })
        .unwrap();
        assert_eq!(game.phase(), Phase::Active);
        assert_eq!(game.current_player(), Color::White);
    }

    #[test]
    fn test_remote_game_over_keeps_summary() {
        let mut game = Game::new(9);
        game.apply_remote(RemoteEvent::GameOver {
            summary: "Black wins by 3".to_string(),
        })
        .unwrap();
        assert_eq!(
            game.state().terminal.as_ref().unwrap().summary,
            "Black wins by 3"
        );
    }

    #[test]
    fn test_remote_move_without_turn_flips_local_side() {
        let mut game = Game::new(9);
        let white_move = |x| RemoteEvent::Move {
            x,
            y: 0,
            color: Color::White,
            current_turn: None,
            captured: 0,
        };
        game.apply_remote(white_move(0)).unwrap();
        assert_eq!(game.current_player(), Color::White);
        game.apply_remote(white_move(2)).unwrap();
        assert_eq!(game.current_player(), Color::Black);
    }

    #[test]
    fn test_remote_pass_out_prefers_sender_summary() {
        let mut game = Game::new(9);
        game.place_stone(Color::Black, 4, 4).unwrap();
        game.pass(Color::White).unwrap();
        let phase = game
            .apply_remote(RemoteEvent::Pass {
                current_turn: None,
                summary: Some("White wins by 2.5".to_string()),
            })
            .unwrap();
        assert_eq!(phase, Phase::Terminal(EndReason::PassOut));
        let t = game.state().terminal.as_ref().unwrap();
        assert_eq!(t.summary, "White wins by 2.5");
        assert!(t.score.is_none());
    }
}
