//! Position evaluation
//!
//! Every evaluator scores a non-terminal position from HOME's perspective:
//! positive favors HOME, negative favors AWAY. Terminal positions are scored
//! by the search itself with `WIN_VALUE`.

use serde::{Deserialize, Serialize};

use crate::board::{Cell, DIRECTIONS};
use crate::clobber::{ClobberGrid, ClobberState};
use crate::connect4::{Connect4Grid, Connect4State, LINES, NUM_COLS, NUM_ROWS};
use crate::game::Side;

/// Score of a forced win for HOME (negated for AWAY)
pub const WIN_VALUE: f64 = f64::INFINITY;

/// Heuristic evaluation of a position
pub trait Evaluator<G>: Send + Sync {
    fn evaluate(&self, state: &G) -> f64;
}

impl<G, F> Evaluator<G> for F
where
    F: Fn(&G) -> f64 + Send + Sync,
{
    fn evaluate(&self, state: &G) -> f64 {
        self(state)
    }
}

// ============================================================================
// CLOBBER
// ============================================================================

/// Clobber heuristics
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClobberHeuristic {
    /// Movable-stone difference
    #[default]
    Mobility,
    /// Per-stone weights compared as a ratio
    StoneWeight,
}

impl Evaluator<ClobberState> for ClobberHeuristic {
    fn evaluate(&self, state: &ClobberState) -> f64 {
        match self {
            ClobberHeuristic::Mobility => mobility(state),
            ClobberHeuristic::StoneWeight => stone_weight(state),
        }
    }
}

/// HOME stones that can capture minus AWAY stones that can capture
pub fn mobility(state: &ClobberState) -> f64 {
    let mut home = 0i32;
    let mut away = 0i32;

    for (r, c, cell) in state.grid().cells() {
        if !state.can_capture(r, c) {
            continue;
        }
        match cell {
            Cell::Home => home += 1,
            Cell::Away => away += 1,
            Cell::Empty => {}
        }
    }

    (home - away) as f64
}

/// Ratio of per-stone weights, larger side over smaller side.
///
/// Positive (>= 1) when HOME's total is larger, negative (<= -1) when AWAY's
/// is. Equal totals score 0. A side with no stones at all loses outright.
pub fn stone_weight(state: &ClobberState) -> f64 {
    let grid = state.grid();
    let mut home = 0.0f64;
    let mut away = 0.0f64;

    for (r, c, cell) in grid.cells() {
        match cell {
            Cell::Home => home += stone_score(grid, r, c),
            Cell::Away => away += stone_score(grid, r, c),
            Cell::Empty => {}
        }
    }

    if home == away {
        0.0
    } else if away == 0.0 {
        WIN_VALUE
    } else if home == 0.0 {
        -WIN_VALUE
    } else if home > away {
        home / away
    } else {
        -away / home
    }
}

/// Weight of a single stone: base 1, +1 per adjacent opponent that can take
/// it, +1 per diagonal friend sharing an opponent neighbor with it
fn stone_score(grid: &ClobberGrid, row: usize, col: usize) -> f64 {
    let Some(side) = grid.get(row, col).owner() else {
        return 0.0;
    };
    let friend = Cell::from(side);
    let opponent = Cell::from(side.opponent());
    let (r, c) = (row as i32, col as i32);
    let mut score = 1.0;

    for (dr, dc) in DIRECTIONS {
        if grid.at(r + dr, c + dc) == Some(opponent) {
            score += 1.0;
        }
    }

    for (dr, dc) in [(1, 1), (1, -1), (-1, 1), (-1, -1)] {
        if grid.at(r + dr, c + dc) != Some(friend) {
            continue;
        }
        // Both orthogonal cells between diagonal neighbors are on the board
        if grid.at(r + dr, c) == Some(opponent) || grid.at(r, c + dc) == Some(opponent) {
            score += 1.0;
        }
    }

    score
}

// ============================================================================
// CONNECT-4
// ============================================================================

/// Open-window heuristic: each window of four holding only one side's
/// pieces scores the square of that side's piece count
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connect4Heuristic;

impl Evaluator<Connect4State> for Connect4Heuristic {
    fn evaluate(&self, state: &Connect4State) -> f64 {
        window_score(state.grid())
    }
}

fn window_score(grid: &Connect4Grid) -> f64 {
    let mut score = 0i32;

    for r in 0..NUM_ROWS as i32 {
        for c in 0..NUM_COLS as i32 {
            for (dr, dc) in LINES {
                if !Connect4Grid::in_bounds(r + 3 * dr, c + 3 * dc) {
                    continue;
                }
                let (mut home, mut away) = (0i32, 0i32);
                for k in 0..4 {
                    match grid.at(r + k * dr, c + k * dc).and_then(Cell::owner) {
                        Some(Side::Home) => home += 1,
                        Some(Side::Away) => away += 1,
                        None => {}
                    }
                }
                if away == 0 {
                    score += home * home;
                } else if home == 0 {
                    score -= away * away;
                }
            }
        }
    }

    score as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameState;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn board(rows: &[&str]) -> ClobberState {
        ClobberState::from_grid(ClobberGrid::parse_rows(rows).unwrap(), Side::Home, 0)
    }

    fn random_positions(seed: u64, count: usize) -> Vec<ClobberState> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut out = Vec::new();
        while out.len() < count {
            let mut game = ClobberState::new();
            let plies = rng.gen_range(0..20);
            for _ in 0..plies {
                let moves = game.legal_moves();
                match moves.choose(&mut rng) {
                    Some(&mv) => game.apply(mv),
                    None => break,
                }
            }
            out.push(game);
        }
        out
    }

    #[test]
    fn test_mobility_opening_is_even() {
        assert_eq!(mobility(&ClobberState::new()), 0.0);
    }

    #[test]
    fn test_mobility_counts_movable_stones() {
        let game = board(&["xox...", "......", "......", "......", "....o."]);
        // Two HOME stones touch an AWAY stone; one AWAY stone can move
        assert_eq!(mobility(&game), 1.0);
    }

    #[test]
    fn test_mobility_antisymmetric() {
        for game in random_positions(3, 50) {
            assert_eq!(mobility(&game.swapped()), -mobility(&game));
        }
    }

    #[test]
    fn test_stone_weight_ratio() {
        let game = board(&["xo....", "x.....", "......", "......", "......"]);
        // HOME: 2 + 1, AWAY: 2
        assert_eq!(stone_weight(&game), 1.5);
        assert_eq!(stone_weight(&game.swapped()), -1.5);
    }

    #[test]
    fn test_stone_weight_diagonal_friend() {
        let game = board(&["xo....", "ox....", "......", "......", "......"]);
        // Every stone: base 1 + two opponents + one diagonal friend
        assert_eq!(stone_score(game.grid(), 0, 0), 4.0);
        assert_eq!(stone_score(game.grid(), 1, 0), 4.0);
        assert_eq!(stone_weight(&game), 0.0);
    }

    #[test]
    fn test_stone_weight_empty_side() {
        let home_only = board(&["x.....", "......", "......", "......", "......"]);
        assert_eq!(stone_weight(&home_only), WIN_VALUE);
        assert_eq!(stone_weight(&home_only.swapped()), -WIN_VALUE);

        let empty = board(&["......", "......", "......", "......", "......"]);
        assert_eq!(stone_weight(&empty), 0.0);
    }

    #[test]
    fn test_evaluators_are_pure() {
        for game in random_positions(5, 10) {
            let snapshot = game.clone();
            for heuristic in [ClobberHeuristic::Mobility, ClobberHeuristic::StoneWeight] {
                let first = heuristic.evaluate(&game);
                let second = heuristic.evaluate(&game);
                assert_eq!(first, second);
            }
            assert_eq!(game, snapshot);
        }
    }

    #[test]
    fn test_closure_evaluator() {
        let constant = |_: &ClobberState| 2.5;
        assert_eq!(constant.evaluate(&ClobberState::new()), 2.5);
    }

    #[test]
    fn test_connect4_single_piece_windows() {
        let game = Connect4State::from_moves(&[3]).unwrap();
        // Four horizontal, one vertical and one in each diagonal direction
        assert_eq!(Connect4Heuristic.evaluate(&game), 7.0);
    }

    #[test]
    fn test_connect4_symmetric_position() {
        let game = Connect4State::from_moves(&[3, 3]).unwrap();
        let home_only = Connect4State::from_moves(&[3]).unwrap();
        // The AWAY piece above blocks the vertical window and adds its own
        assert!(Connect4Heuristic.evaluate(&game) < Connect4Heuristic.evaluate(&home_only));
        assert_eq!(Connect4Heuristic.evaluate(&Connect4State::new()), 0.0);
    }
}
