//! Clobber: board state, move generation and apply/undo

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::{Cell, Grid, DIRECTIONS};
use crate::error::{parse_ints, MoveError, ParseError};
use crate::game::{GameMove, GameState, Side, Status};

// ============================================================================
// CONSTANTS
// ============================================================================

pub const ROWS: usize = 5;
pub const COLS: usize = 6;

pub type ClobberGrid = Grid<ROWS, COLS>;

// ============================================================================
// MOVE
// ============================================================================

/// Capture of the stone at (row2, col2) by the stone at (row1, col1)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClobberMove {
    pub row1: u8,
    pub col1: u8,
    pub row2: u8,
    pub col2: u8,
}

impl ClobberMove {
    /// Build a move, rejecting off-board or non-adjacent cells
    pub fn new(row1: i32, col1: i32, row2: i32, col2: i32) -> Result<Self, MoveError> {
        for (row, col) in [(row1, col1), (row2, col2)] {
            if !ClobberGrid::in_bounds(row, col) {
                return Err(MoveError::OffBoard { row, col });
            }
        }
        if (row1 - row2).abs() + (col1 - col2).abs() != 1 {
            return Err(MoveError::NotAdjacent {
                r1: row1,
                c1: col1,
                r2: row2,
                c2: col2,
            });
        }
        Ok(Self::from_cells((row1 as usize, col1 as usize), (row2 as usize, col2 as usize)))
    }

    pub(crate) fn from_cells(from: (usize, usize), to: (usize, usize)) -> Self {
        Self {
            row1: from.0 as u8,
            col1: from.1 as u8,
            row2: to.0 as u8,
            col2: to.1 as u8,
        }
    }

    /// Attacking cell
    pub fn from(&self) -> (usize, usize) {
        (self.row1 as usize, self.col1 as usize)
    }

    /// Target cell
    pub fn to(&self) -> (usize, usize) {
        (self.row2 as usize, self.col2 as usize)
    }
}

impl fmt::Display for ClobberMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.row1, self.col1, self.row2, self.col2)
    }
}

impl FromStr for ClobberMove {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let v = parse_ints(s, 4)?;
        Ok(ClobberMove::new(v[0], v[1], v[2], v[3])?)
    }
}

impl GameMove for ClobberMove {}

// ============================================================================
// STATE
// ============================================================================

/// Clobber position (mutate with apply/undo, clone to branch)
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClobberState {
    grid: ClobberGrid,
    who: Side,
    num_moves: u32,
    status: Status,
}

impl ClobberState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Standard opening: full checkerboard, HOME on even (row + col), HOME to move
    pub fn new() -> Self {
        let mut grid = ClobberGrid::empty();
        for r in 0..ROWS {
            for c in 0..COLS {
                let cell = if (r + c) % 2 == 0 { Cell::Home } else { Cell::Away };
                grid.set(r, c, cell);
            }
        }
        Self::from_grid(grid, Side::Home, 0)
    }

    /// Position from an arbitrary grid; status is derived
    pub fn from_grid(grid: ClobberGrid, who: Side, num_moves: u32) -> Self {
        let mut state = Self {
            grid,
            who,
            num_moves,
            status: Status::InProgress,
        };
        state.status = state.derive_status();
        state
    }

    /// Parse a board written one row per line (`x` HOME, `o` AWAY, `.` empty)
    pub fn parse(text: &str, who: Side, num_moves: u32) -> Result<Self, ParseError> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let grid = ClobberGrid::parse_rows(&lines)?;
        Ok(Self::from_grid(grid, who, num_moves))
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn grid(&self) -> &ClobberGrid {
        &self.grid
    }

    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.grid.get(row, col)
    }

    /// True if the stone at (row, col) has an adjacent opponent stone
    pub fn can_capture(&self, row: usize, col: usize) -> bool {
        let Some(side) = self.grid.get(row, col).owner() else {
            return false;
        };
        let target = Cell::from(side.opponent());
        (0..DIRECTIONS.len()).any(|dir| {
            ClobberGrid::neighbor(row, col, dir).map_or(false, |(r, c)| self.grid.get(r, c) == target)
        })
    }

    /// True if `side` has at least one legal capture
    pub fn has_any_move(&self, side: Side) -> bool {
        let own = Cell::from(side);
        self.grid
            .cells()
            .any(|(r, c, cell)| cell == own && self.can_capture(r, c))
    }

    /// Same position with HOME and AWAY exchanged
    pub fn swapped(&self) -> Self {
        Self::from_grid(self.grid.swapped(), self.who.opponent(), self.num_moves)
    }

    fn derive_status(&self) -> Status {
        if self.has_any_move(self.who) {
            Status::InProgress
        } else {
            // The side with no remaining moves loses
            self.who.opponent().win_status()
        }
    }
}

impl Default for ClobberState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClobberState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.grid)
    }
}

// ============================================================================
// GAME CONTRACT
// ============================================================================

impl GameState for ClobberState {
    type Move = ClobberMove;

    fn who(&self) -> Side {
        self.who
    }

    fn status(&self) -> Status {
        self.status
    }

    fn num_moves(&self) -> u32 {
        self.num_moves
    }

    fn legal_moves(&self) -> Vec<ClobberMove> {
        let own = Cell::from(self.who);
        let opp = Cell::from(self.who.opponent());
        let mut moves = Vec::new();

        for (r, c, cell) in self.grid.cells() {
            if cell != own {
                continue;
            }
            for dir in 0..DIRECTIONS.len() {
                if let Some(to) = ClobberGrid::neighbor(r, c, dir) {
                    if self.grid.get(to.0, to.1) == opp {
                        moves.push(ClobberMove::from_cells((r, c), to));
                    }
                }
            }
        }

        moves
    }

    fn is_legal(&self, mv: &ClobberMove) -> bool {
        // Moves built from raw fields skip the checks in ClobberMove::new
        if ClobberMove::new(mv.row1 as i32, mv.col1 as i32, mv.row2 as i32, mv.col2 as i32).is_err() {
            return false;
        }
        let (r1, c1) = mv.from();
        let (r2, c2) = mv.to();
        self.grid.get(r1, c1) == Cell::from(self.who)
            && self.grid.get(r2, c2) == Cell::from(self.who.opponent())
    }

    fn apply(&mut self, mv: ClobberMove) {
        debug_assert!(self.is_legal(&mv), "apply of illegal move {}", mv);
        let (r1, c1) = mv.from();
        let (r2, c2) = mv.to();

        self.grid.set(r2, c2, Cell::from(self.who));
        self.grid.set(r1, c1, Cell::Empty);
        self.who = self.who.opponent();
        self.num_moves += 1;
        self.status = self.derive_status();
    }

    fn undo(&mut self, mv: ClobberMove, prior: Side) {
        let (r1, c1) = mv.from();
        let (r2, c2) = mv.to();

        self.grid.set(r1, c1, Cell::from(prior));
        self.grid.set(r2, c2, Cell::from(prior.opponent()));
        self.who = prior;
        self.num_moves -= 1;
        self.status = Status::InProgress;
    }

    fn max_remaining_moves(&self) -> usize {
        // Every capture removes one stone
        ROWS * COLS - self.grid.count(Cell::Empty)
    }
}

// ============================================================================
// TESTS
// ============================================================================
