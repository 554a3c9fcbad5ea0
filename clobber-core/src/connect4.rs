//! Connect-4 on the same engine: gravity drops, four in a row wins

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::{Cell, Grid};
use crate::error::{parse_ints, MoveError, ParseError};
use crate::game::{GameMove, GameState, Side, Status};

pub const NUM_ROWS: usize = 6;
pub const NUM_COLS: usize = 7;

/// Row 0 is the bottom of the board
pub type Connect4Grid = Grid<NUM_ROWS, NUM_COLS>;

/// Line directions checked for four in a row (drow, dcol)
pub(crate) const LINES: [(i32, i32); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Drop a piece into a column
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connect4Move {
    pub col: u8,
}

impl Connect4Move {
    pub fn new(col: i32) -> Result<Self, MoveError> {
        if col < 0 || col as usize >= NUM_COLS {
            return Err(MoveError::ColumnOutOfRange(col));
        }
        Ok(Self { col: col as u8 })
    }
}

impl fmt::Display for Connect4Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.col)
    }
}

impl FromStr for Connect4Move {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let v = parse_ints(s, 1)?;
        Ok(Connect4Move::new(v[0])?)
    }
}

impl GameMove for Connect4Move {}

/// Connect-4 position
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Connect4State {
    grid: Connect4Grid,
    num_in_col: [u8; NUM_COLS],
    who: Side,
    num_moves: u32,
    status: Status,
}

impl Connect4State {
    pub fn new() -> Self {
        Self {
            grid: Connect4Grid::empty(),
            num_in_col: [0; NUM_COLS],
            who: Side::Home,
            num_moves: 0,
            status: Status::InProgress,
        }
    }

    /// Play a sequence of columns from the empty board
    pub fn from_moves(cols: &[i32]) -> Result<Self, MoveError> {
        let mut state = Self::new();
        for &col in cols {
            let mv = Connect4Move::new(col)?;
            if state.num_in_col[mv.col as usize] as usize >= NUM_ROWS {
                return Err(MoveError::ColumnFull(mv.col as usize));
            }
            state.make_move(mv)?;
        }
        Ok(state)
    }

    pub fn grid(&self) -> &Connect4Grid {
        &self.grid
    }

    /// Pieces currently stacked in `col`
    pub fn height(&self, col: usize) -> usize {
        self.num_in_col[col] as usize
    }

    /// Does the piece at (row, col) complete a line of four?
    fn completes_four(&self, row: usize, col: usize) -> bool {
        let cell = self.grid.get(row, col);
        LINES.iter().any(|&(dr, dc)| {
            let run = |sign: i32| {
                let mut n = 0;
                let (mut r, mut c) = (row as i32 + sign * dr, col as i32 + sign * dc);
                while self.grid.at(r, c) == Some(cell) {
                    n += 1;
                    r += sign * dr;
                    c += sign * dc;
                }
                n
            };
            1 + run(1) + run(-1) >= 4
        })
    }
}

impl Default for Connect4State {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Connect4State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in (0..NUM_ROWS).rev() {
            for c in 0..NUM_COLS {
                write!(f, "{}", self.grid.get(r, c).symbol())?;
            }
            if r > 0 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

impl GameState for Connect4State {
    type Move = Connect4Move;

    fn who(&self) -> Side {
        self.who
    }

    fn status(&self) -> Status {
        self.status
    }

    fn num_moves(&self) -> u32 {
        self.num_moves
    }

    fn legal_moves(&self) -> Vec<Connect4Move> {
        (0..NUM_COLS)
            .filter(|&c| (self.num_in_col[c] as usize) < NUM_ROWS)
            .map(|c| Connect4Move { col: c as u8 })
            .collect()
    }

    fn is_legal(&self, mv: &Connect4Move) -> bool {
        (mv.col as usize) < NUM_COLS && (self.num_in_col[mv.col as usize] as usize) < NUM_ROWS
    }

    fn apply(&mut self, mv: Connect4Move) {
        debug_assert!(self.is_legal(&mv), "apply of illegal move {}", mv);
        let col = mv.col as usize;
        let row = self.num_in_col[col] as usize;

        self.grid.set(row, col, Cell::from(self.who));
        self.num_in_col[col] += 1;
        self.num_moves += 1;

        self.status = if self.completes_four(row, col) {
            self.who.win_status()
        } else if self.num_moves as usize == NUM_ROWS * NUM_COLS {
            Status::Draw
        } else {
            Status::InProgress
        };
        self.who = self.who.opponent();
    }

    fn undo(&mut self, mv: Connect4Move, prior: Side) {
        let col = mv.col as usize;
        self.num_in_col[col] -= 1;
        self.grid.set(self.num_in_col[col] as usize, col, Cell::Empty);
        self.who = prior;
        self.num_moves -= 1;
        self.status = Status::InProgress;
    }

    fn max_remaining_moves(&self) -> usize {
        NUM_ROWS * NUM_COLS - self.num_moves as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board() {
        let game = Connect4State::new();
        assert_eq!(game.legal_moves().len(), NUM_COLS);
        assert_eq!(game.who(), Side::Home);
        assert_eq!(game.max_remaining_moves(), 42);
    }

    #[test]
    fn test_move_construction() {
        assert!(Connect4Move::new(0).is_ok());
        assert!(Connect4Move::new(6).is_ok());
        assert_eq!(Connect4Move::new(7), Err(MoveError::ColumnOutOfRange(7)));
        assert_eq!(Connect4Move::new(-1), Err(MoveError::ColumnOutOfRange(-1)));
        assert_eq!("3".parse::<Connect4Move>().unwrap().col, 3);
        assert!("3 4".parse::<Connect4Move>().is_err());
        assert!("9".parse::<Connect4Move>().is_err());
    }

    #[test]
    fn test_vertical_win() {
        let game = Connect4State::from_moves(&[0, 1, 0, 1, 0, 1, 0]).unwrap();
        assert_eq!(game.status(), Status::HomeWin);
    }

    #[test]
    fn test_horizontal_win_for_away() {
        let game = Connect4State::from_moves(&[0, 1, 0, 2, 0, 3, 6, 4]).unwrap();
        assert_eq!(game.status(), Status::AwayWin);
    }

    #[test]
    fn test_diagonal_win() {
        let game = Connect4State::from_moves(&[0, 1, 1, 2, 3, 2, 2, 3, 6, 3, 3]).unwrap();
        assert_eq!(game.status(), Status::HomeWin);
    }

    #[test]
    fn test_full_board_draw() {
        let row_pair = [0, 2, 1, 3, 4, 6, 5];
        let cols: Vec<i32> = row_pair.iter().copied().cycle().take(42).collect();
        let game = Connect4State::from_moves(&cols).unwrap();
        assert_eq!(game.status(), Status::Draw);
        assert!(game.legal_moves().is_empty());
    }

    #[test]
    fn test_full_column_rejected() {
        let err = Connect4State::from_moves(&[2, 2, 2, 2, 2, 2, 2]).unwrap_err();
        assert_eq!(err, MoveError::ColumnFull(2));
    }

    #[test]
    fn test_apply_undo_roundtrip() {
        let mut game = Connect4State::from_moves(&[3, 3, 2, 4]).unwrap();
        let snapshot = game.clone();
        for mv in game.legal_moves() {
            let prior = game.who();
            game.apply(mv);
            game.undo(mv, prior);
            assert_eq!(game, snapshot);
        }
    }

    #[test]
    fn test_display_top_row_first() {
        let game = Connect4State::from_moves(&[0, 0]).unwrap();
        let text = game.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), NUM_ROWS);
        assert_eq!(lines[NUM_ROWS - 1], "x......");
        assert_eq!(lines[NUM_ROWS - 2], "o......");
    }
}
