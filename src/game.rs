//! Game state and the transitions that mutate it.
//!
//! [`Game`] exclusively owns a [`GameState`]. The board only changes inside
//! [`Game::place_stone`], [`Game::pass`], [`Game::resign`],
//! [`Game::restart`] and [`Game::apply_remote`]; agents get a shared
//! reference. Every rejected transition leaves the state untouched.

use std::fmt;

use tracing::{debug, info};

use crate::board::{Board, Color, Point};
use crate::capture::Placement;
use crate::rules::{MoveError, check_move, is_legal};

/// Captured-stone tallies, indexed by the capturing side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Captures {
    pub black: usize,
    pub white: usize,
}

impl Captures {
    pub fn get(&self, color: Color) -> usize {
        match color {
            Color::Black => self.black,
            Color::White => self.white,
        }
    }

    pub(crate) fn add(&mut self, color: Color, n: usize) {
        match color {
            Color::Black => self.black += n,
            Color::White => self.white += n,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndReason {
    /// Two consecutive passes.
    PassOut,
    /// The named side resigned.
    Resignation { loser: Color },
}

/// Result produced by a [`ScoringOracle`].
#[derive(Clone, Debug, PartialEq)]
pub struct Score {
    pub black: f64,
    pub white: f64,
    pub summary: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Terminal {
    pub reason: EndReason,
    pub summary: String,
    /// Present only for pass-out.
    pub score: Option<Score>,
}

/// Coarse lifecycle phase derived from a [`GameState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Active,
    AwaitingOpponentPass,
    Terminal(EndReason),
}

/// Scores a finished board. Invoked exactly once per pass-out.
pub trait ScoringOracle {
    fn compute(&mut self, board: &Board) -> Score;
}

/// Stones-on-board count. No territory estimation.
#[derive(Clone, Copy, Debug, Default)]
pub struct StoneCount;

impl ScoringOracle for StoneCount {
    fn compute(&mut self, board: &Board) -> Score {
        let black = board.count(Color::Black) as f64;
        let white = board.count(Color::White) as f64;
        let summary = if black > white {
            format!("Black wins {black} to {white}")
        } else if white > black {
            format!("White wins {white} to {black}")
        } else {
            format!("Draw at {black}")
        };
        Score {
            black,
            white,
            summary,
        }
    }
}

/// Everything needed to judge the next move.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub board: Board,
    pub current_player: Color,
    /// Board one committed placement back. Ko compares against this only.
    pub previous_board: Option<Board>,
    /// The stone removed by the last placement, when it captured exactly one.
    pub ko_point: Option<Point>,
    pub pass_count: u32,
    pub captures: Captures,
    pub awaiting_opponent_pass: bool,
    pub terminal: Option<Terminal>,
    pub last_move: Option<Point>,
    /// Placements and passes committed so far.
    pub move_number: usize,
}

impl GameState {
    /// An empty board with Black to move.
    ///
    /// # Panics
    /// If `size` is outside `MIN_BOARD_SIZE..=MAX_BOARD_SIZE`, as
    /// [`Board::new`] does.
    pub fn new(size: usize) -> Self {
        Self {
            board: Board::new(size),
            current_player: Color::Black,
            previous_board: None,
            ko_point: None,
            pass_count: 0,
            captures: Captures::default(),
            awaiting_opponent_pass: false,
            terminal: None,
            last_move: None,
            move_number: 0,
        }
    }

    pub fn size(&self) -> usize {
        self.board.size()
    }

    pub fn phase(&self) -> Phase {
        match &self.terminal {
            Some(t) => Phase::Terminal(t.reason),
            None if self.awaiting_opponent_pass => Phase::AwaitingOpponentPass,
            None => Phase::Active,
        }
    }

    pub fn is_over(&self) -> bool {
        self.terminal.is_some()
    }

    /// Whether `color` may legally place at `(x, y)` in this state.
    pub fn is_legal(&self, x: usize, y: usize, color: Color) -> bool {
        is_legal(&self.board, self.previous_board.as_ref(), x, y, color)
    }

    /// Every legal point for `color`, in row-major order.
    pub fn legal_moves(&self, color: Color) -> Vec<Point> {
        self.board
            .points()
            .filter(|&(x, y)| self.board.get(x, y).is_none() && self.is_legal(x, y, color))
            .collect()
    }

    /// Commit a validated placement. Shared by local and remote moves.
    pub(crate) fn commit(&mut self, color: Color, point: Point, placement: Placement) {
        let before = std::mem::replace(&mut self.board, placement.board);
        self.previous_board = Some(before);
        self.captures.add(color, placement.captured.len());
        self.ko_point = match placement.captured.as_slice() {
            [single] => Some(*single),
            _ => None,
        };
        self.pass_count = 0;
        self.awaiting_opponent_pass = false;
        self.current_player = color.opponent();
        self.last_move = Some(point);
        self.move_number += 1;
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)?;
        writeln!(
            f,
            "Move {}, {} to play. Captures: Black {}, White {}",
            self.move_number, self.current_player, self.captures.black, self.captures.white
        )?;
        if let Some(t) = &self.terminal {
            writeln!(f, "{}", t.summary)?;
        }
        Ok(())
    }
}

/// Owner of a [`GameState`] and its scoring oracle.
pub struct Game {
    state: GameState,
    oracle: Box<dyn ScoringOracle>,
}

impl Game {
    /// A fresh game scored by [`StoneCount`].
    ///
    /// # Panics
    /// If `size` is outside `MIN_BOARD_SIZE..=MAX_BOARD_SIZE`.
    pub fn new(size: usize) -> Self {
        Self::with_oracle(size, Box::new(StoneCount))
    }

    /// # Panics
    /// If `size` is outside `MIN_BOARD_SIZE..=MAX_BOARD_SIZE`.
    pub fn with_oracle(size: usize, oracle: Box<dyn ScoringOracle>) -> Self {
        Self {
            state: GameState::new(size),
            oracle,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn current_player(&self) -> Color {
        self.state.current_player
    }

    pub fn legal_moves(&self, color: Color) -> Vec<Point> {
        self.state.legal_moves(color)
    }

    /// Place a stone for `mover`.
    ///
    /// # Errors
    /// [`MoveError::GameOver`] once terminal, [`MoveError::OutOfTurn`] before
    /// any validation, then whatever [`check_move`] reports.
    pub fn place_stone(&mut self, mover: Color, x: usize, y: usize) -> Result<Placement, MoveError> {
        if self.state.is_over() {
            return Err(MoveError::GameOver);
        }
        if mover != self.state.current_player {
            debug!(?mover, x, y, "rejected out-of-turn placement");
            return Err(MoveError::OutOfTurn(mover));
        }
        let placement = match check_move(
            &self.state.board,
            self.state.previous_board.as_ref(),
            x,
            y,
            mover,
        ) {
            Ok(p) => p,
            Err(e) => {
                debug!(?mover, x, y, error = %e, "rejected placement");
                return Err(e);
            }
        };

        self.state.commit(mover, (x, y), placement.clone());
        debug!(
            ?mover,
            x,
            y,
            captured = placement.captured.len(),
            ko = ?self.state.ko_point,
            "placed stone"
        );
        Ok(placement)
    }

    /// Pass for `mover`. Returns the phase after the pass.
    ///
    /// A side that has just passed may not pass again until the opponent
    /// responds; two passes by alternating sides end the game and score it.
    pub fn pass(&mut self, mover: Color) -> Result<Phase, MoveError> {
        if self.state.is_over() {
            return Err(MoveError::GameOver);
        }
        if self.state.awaiting_opponent_pass && mover != self.state.current_player {
            debug!(?mover, "rejected repeated pass");
            return Err(MoveError::DoublePassRejected(mover));
        }
        if mover != self.state.current_player {
            return Err(MoveError::OutOfTurn(mover));
        }

        self.state.pass_count += 1;
        self.state.ko_point = None;
        self.state.current_player = mover.opponent();
        self.state.last_move = None;
        self.state.move_number += 1;

        if self.state.pass_count >= 2 {
            self.finish_by_pass();
        } else {
            self.state.awaiting_opponent_pass = true;
            debug!(?mover, "passed");
        }
        Ok(self.state.phase())
    }

    /// Resign on behalf of the side to move. Returns the loser.
    pub fn resign(&mut self) -> Result<Color, MoveError> {
        if self.state.is_over() {
            return Err(MoveError::GameOver);
        }
        let loser = self.state.current_player;
        self.end_by_resignation(loser);
        Ok(loser)
    }

    /// Discard the current game and start an empty one of the same size.
    pub fn restart(&mut self) {
        let size = self.state.size();
        self.state = GameState::new(size);
        info!(size, "game restarted");
    }

    /// Replace the game with an empty board of another size.
    ///
    /// # Panics
    /// If `size` is outside `MIN_BOARD_SIZE..=MAX_BOARD_SIZE`.
    pub fn resize(&mut self, size: usize) {
        self.state = GameState::new(size);
        info!(size, "board resized");
    }

    pub(crate) fn finish_by_pass(&mut self) {
        let score = self.oracle.compute(&self.state.board);
        info!(summary = %score.summary, "game over by passes");
        self.state.awaiting_opponent_pass = false;
        self.state.terminal = Some(Terminal {
            reason: EndReason::PassOut,
            summary: score.summary.clone(),
            score: Some(score),
        });
    }

    pub(crate) fn end_by_resignation(&mut self, loser: Color) {
        let summary = format!("{loser} resigns, {} wins", loser.opponent());
        info!(%summary, "game over by resignation");
        self.state.awaiting_opponent_pass = false;
        self.state.terminal = Some(Terminal {
            reason: EndReason::Resignation { loser },
            summary,
            score: None,
        });
    }

    /// End the game with a summary computed elsewhere.
    pub(crate) fn end_with_summary(&mut self, summary: String) {
        info!(%summary, "game over");
        self.state.awaiting_opponent_pass = false;
        self.state.terminal = Some(Terminal {
            reason: EndReason::PassOut,
            summary,
            score: None,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct CountingOracle(Rc<Cell<usize>>);

    impl ScoringOracle for CountingOracle {
        fn compute(&mut self, board: &Board) -> Score {
            self.0.set(self.0.get() + 1);
            StoneCount.compute(board)
        }
    }

    fn counting_game(size: usize) -> (Game, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let game = Game::with_oracle(size, Box::new(CountingOracle(calls.clone())));
        (game, calls)
    }

    #[test]
    fn test_first_move_on_empty_board() {
        let mut game = Game::new(9);
        game.place_stone(Color::Black, 4, 4).unwrap();
        let s = game.state();
        assert_eq!(s.board.get(4, 4), Some(Color::Black));
        assert_eq!(s.current_player, Color::White);
        assert_eq!(s.pass_count, 0);
        assert_eq!(s.ko_point, None);
        assert_eq!(s.previous_board, Some(Board::new(9)));
        assert_eq!(game.phase(), Phase::Active);
    }

    #[test]
    fn test_out_of_turn_rejected_before_validation() {
        let mut game = Game::new(9);
        // Off-board and out of turn: the turn check wins.
        assert_eq!(
            game.place_stone(Color::White, 20, 20),
            Err(MoveError::OutOfTurn(Color::White))
        );
        assert_eq!(game.state(), &GameState::new(9));
    }

    #[test]
    fn test_rejection_leaves_state_unchanged() {
        let mut game = Game::new(9);
        game.place_stone(Color::Black, 0, 0).unwrap();
        let before = game.state().clone();
        assert_eq!(
            game.place_stone(Color::White, 0, 0),
            Err(MoveError::OccupiedCell)
        );
        assert_eq!(game.state(), &before);
    }

    #[test]
    fn test_pass_then_pass_ends_game_and_scores_once() {
        let (mut game, calls) = counting_game(9);
        assert_eq!(game.pass(Color::Black), Ok(Phase::AwaitingOpponentPass));
        assert_eq!(game.current_player(), Color::White);
        assert_eq!(
            game.pass(Color::White),
            Ok(Phase::Terminal(EndReason::PassOut))
        );
        assert_eq!(calls.get(), 1);
        assert!(game.state().terminal.as_ref().unwrap().score.is_some());

        // Further transitions are refused and do not rescore.
        assert_eq!(game.pass(Color::Black), Err(MoveError::GameOver));
        assert_eq!(game.place_stone(Color::Black, 1, 1), Err(MoveError::GameOver));
        assert_eq!(game.resign(), Err(MoveError::GameOver));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_same_side_cannot_pass_twice() {
        let mut game = Game::new(9);
        game.pass(Color::Black).unwrap();
        assert_eq!(
            game.pass(Color::Black),
            Err(MoveError::DoublePassRejected(Color::Black))
        );
        assert_eq!(game.state().pass_count, 1);
        assert_eq!(game.phase(), Phase::AwaitingOpponentPass);
    }

    #[test]
    fn test_placement_resets_pass_count() {
        let (mut game, calls) = counting_game(9);
        game.pass(Color::Black).unwrap();
        game.place_stone(Color::White, 2, 2).unwrap();
        assert_eq!(game.state().pass_count, 0);
        assert!(!game.state().awaiting_opponent_pass);
        game.pass(Color::Black).unwrap();
        assert_eq!(game.phase(), Phase::AwaitingOpponentPass);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_resign_loser_is_side_to_move() {
        let mut game = Game::new(9);
        game.place_stone(Color::Black, 3, 3).unwrap();
        assert_eq!(game.resign(), Ok(Color::White));
        let t = game.state().terminal.clone().unwrap();
        assert_eq!(t.reason, EndReason::Resignation { loser: Color::White });
        assert_eq!(t.summary, "White resigns, Black wins");
    }

    #[test]
    fn test_resign_while_awaiting_pass() {
        let mut game = Game::new(9);
        game.pass(Color::Black).unwrap();
        assert_eq!(game.resign(), Ok(Color::White));
        assert_eq!(
            game.phase(),
            Phase::Terminal(EndReason::Resignation { loser: Color::White })
        );
    }

    #[test]
    fn test_restart_clears_terminal() {
        let mut game = Game::new(9);
        game.resign().unwrap();
        game.restart();
        assert_eq!(game.state(), &GameState::new(9));
        assert!(game.place_stone(Color::Black, 4, 4).is_ok());
    }

    #[test]
    fn test_stone_count_summary() {
        let mut board = Board::new(5);
        board.set(0, 0, Some(Color::White));
        let score = StoneCount.compute(&board);
        assert_eq!(score.white, 1.0);
        assert_eq!(score.summary, "White wins 1 to 0");
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_oversized_game_panics() {
        Game::new(26);
    }
}
