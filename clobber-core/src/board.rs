//! Rectangular board geometry shared by the grid games

use std::fmt;

use crate::error::ParseError;
use crate::game::Side;

/// Text symbol for a HOME stone
pub const HOME_SYM: char = 'x';
/// Text symbol for an AWAY stone
pub const AWAY_SYM: char = 'o';
/// Text symbol for an empty cell
pub const EMPTY_SYM: char = '.';

/// Orthogonal direction vectors (drow, dcol)
/// Index: 0=up, 1=down, 2=left, 3=right
pub const DIRECTIONS: [(i32, i32); 4] = [
    (-1, 0), // up
    (1, 0),  // down
    (0, -1), // left
    (0, 1),  // right
];

/// Contents of one board cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Home,
    Away,
}

impl Cell {
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => EMPTY_SYM,
            Cell::Home => HOME_SYM,
            Cell::Away => AWAY_SYM,
        }
    }

    pub fn from_symbol(ch: char) -> Option<Self> {
        match ch {
            EMPTY_SYM => Some(Cell::Empty),
            HOME_SYM => Some(Cell::Home),
            AWAY_SYM => Some(Cell::Away),
            _ => None,
        }
    }

    /// Side owning the stone in this cell, if any
    pub fn owner(self) -> Option<Side> {
        match self {
            Cell::Empty => None,
            Cell::Home => Some(Side::Home),
            Cell::Away => Some(Side::Away),
        }
    }

    /// Same cell with HOME and AWAY exchanged
    pub fn swapped(self) -> Self {
        match self {
            Cell::Empty => Cell::Empty,
            Cell::Home => Cell::Away,
            Cell::Away => Cell::Home,
        }
    }
}

impl From<Side> for Cell {
    fn from(side: Side) -> Self {
        match side {
            Side::Home => Cell::Home,
            Side::Away => Cell::Away,
        }
    }
}

/// Fixed-size grid of cells, row-major
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Grid<const ROWS: usize, const COLS: usize> {
    cells: [[Cell; COLS]; ROWS],
}

impl<const ROWS: usize, const COLS: usize> Grid<ROWS, COLS> {
    pub fn empty() -> Self {
        Self {
            cells: [[Cell::Empty; COLS]; ROWS],
        }
    }

    /// Check if a signed coordinate is on the board
    #[inline]
    pub fn in_bounds(row: i32, col: i32) -> bool {
        row >= 0 && col >= 0 && (row as usize) < ROWS && (col as usize) < COLS
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        self.cells[row][col] = cell;
    }

    /// Cell at a signed coordinate, `None` when off the board
    #[inline]
    pub fn at(&self, row: i32, col: i32) -> Option<Cell> {
        if Self::in_bounds(row, col) {
            Some(self.cells[row as usize][col as usize])
        } else {
            None
        }
    }

    /// Neighbor of (row, col) in direction `dir` (index into `DIRECTIONS`)
    #[inline]
    pub fn neighbor(row: usize, col: usize, dir: usize) -> Option<(usize, usize)> {
        let (dr, dc) = DIRECTIONS[dir];
        let (r, c) = (row as i32 + dr, col as i32 + dc);
        if Self::in_bounds(r, c) {
            Some((r as usize, c as usize))
        } else {
            None
        }
    }

    /// Iterate cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .flat_map(|(r, row)| row.iter().enumerate().map(move |(c, &cell)| (r, c, cell)))
    }

    pub fn count(&self, cell: Cell) -> usize {
        self.cells().filter(|&(_, _, c)| c == cell).count()
    }

    /// Grid with every HOME stone turned AWAY and vice versa
    pub fn swapped(&self) -> Self {
        let mut out = *self;
        for row in out.cells.iter_mut() {
            for cell in row.iter_mut() {
                *cell = cell.swapped();
            }
        }
        out
    }

    /// Parse one line of symbols per row
    pub fn parse_rows<S: AsRef<str>>(lines: &[S]) -> Result<Self, ParseError> {
        if lines.len() != ROWS {
            return Err(ParseError::InvalidBoard(format!(
                "expected {} rows, found {}",
                ROWS,
                lines.len()
            )));
        }

        let mut grid = Self::empty();
        for (r, line) in lines.iter().enumerate() {
            let symbols: Vec<char> = line.as_ref().chars().filter(|c| !c.is_whitespace()).collect();
            if symbols.len() != COLS {
                return Err(ParseError::InvalidBoard(format!(
                    "row {} has {} cells, expected {}",
                    r,
                    symbols.len(),
                    COLS
                )));
            }
            for (c, ch) in symbols.into_iter().enumerate() {
                let cell = Cell::from_symbol(ch).ok_or_else(|| {
                    ParseError::InvalidBoard(format!("unknown symbol {:?} at ({}, {})", ch, r, c))
                })?;
                grid.set(r, c, cell);
            }
        }
        Ok(grid)
    }
}

impl<const ROWS: usize, const COLS: usize> fmt::Display for Grid<ROWS, COLS> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.cells.iter().enumerate() {
            if r > 0 {
                writeln!(f)?;
            }
            for cell in row {
                write!(f, "{}", cell.symbol())?;
            }
        }
        Ok(())
    }
}
