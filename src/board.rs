//! 2D board representation.
//!
//! Cells are stored row-major (`y * size + x`) as `Option<Color>`, with
//! `None` meaning an empty intersection. Boards compare by exact positional
//! equality, which is what the ko check relies on.

use std::fmt;

use crate::constants::{MAX_BOARD_SIZE, MIN_BOARD_SIZE};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    /// The other side.
    pub fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::Black => "Black",
            Color::White => "White",
        }
    }

    /// Parse a GTP-style color argument (`b`, `black`, `w`, `white`).
    pub fn parse(s: &str) -> Option<Color> {
        match s.to_ascii_lowercase().as_str() {
            "b" | "black" => Some(Color::Black),
            "w" | "white" => Some(Color::White),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An intersection as `(x, y)`, with `(0, 0)` in the top-left corner.
pub type Point = (usize, usize);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<Option<Color>>,
}

impl Board {
    /// Create an empty board.
    ///
    /// # Panics
    /// If `size` is outside `MIN_BOARD_SIZE..=MAX_BOARD_SIZE`.
    pub fn new(size: usize) -> Self {
        assert!(
            (MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size),
            "board size {size} out of range"
        );
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.size && y < self.size
    }

    #[inline]
    fn idx(&self, x: usize, y: usize) -> usize {
        y * self.size + x
    }

    /// Contents of `(x, y)`. Off-board points read as empty.
    pub fn get(&self, x: usize, y: usize) -> Option<Color> {
        if !self.in_bounds(x, y) {
            return None;
        }
        self.cells[self.idx(x, y)]
    }

    pub fn is_empty_at(&self, x: usize, y: usize) -> bool {
        self.in_bounds(x, y) && self.get(x, y).is_none()
    }

    /// Overwrite a cell. Callers must have bounds-checked `(x, y)`.
    pub(crate) fn set(&mut self, x: usize, y: usize, cell: Option<Color>) {
        let i = self.idx(x, y);
        self.cells[i] = cell;
    }

    /// The up to four orthogonal neighbors of `(x, y)` that lie on the board.
    pub fn neighbors(&self, x: usize, y: usize) -> impl Iterator<Item = Point> + '_ {
        let s = self.size;
        let mut v = Vec::with_capacity(4);
        if x > 0 {
            v.push((x - 1, y));
        }
        if x + 1 < s {
            v.push((x + 1, y));
        }
        if y > 0 {
            v.push((x, y - 1));
        }
        if y + 1 < s {
            v.push((x, y + 1));
        }
        v.into_iter()
    }

    /// All points in row-major order.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.size).flat_map(move |y| (0..self.size).map(move |x| (x, y)))
    }

    pub fn stone_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn count(&self, color: Color) -> usize {
        self.cells.iter().filter(|&&c| c == Some(color)).count()
    }
}

/// Star points (hoshi) for the standard sizes, used only for display.
pub fn star_points(size: usize) -> &'static [Point] {
    match size {
        9 => &[(2, 2), (6, 2), (2, 6), (6, 6), (4, 4)],
        13 => &[(3, 3), (9, 3), (3, 9), (9, 9), (6, 6)],
        19 => &[
            (3, 3),
            (9, 3),
            (15, 3),
            (3, 9),
            (9, 9),
            (15, 9),
            (3, 15),
            (9, 15),
            (15, 15),
        ],
        _ => &[],
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stars = star_points(self.size);
        for y in 0..self.size {
            for x in 0..self.size {
                let ch = match self.get(x, y) {
                    Some(Color::Black) => 'X',
                    Some(Color::White) => 'O',
                    None if stars.contains(&(x, y)) => '+',
                    None => '.',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
