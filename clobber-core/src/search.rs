//! Depth-limited alpha-beta search
//!
//! The engine threads one mutable board through the recursion and keeps one
//! best-move frame per depth. Each child is explored by `apply`, recursion
//! and `undo`, so the board is never copied per node. HOME maximizes and
//! AWAY minimizes.

use std::ops::AddAssign;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::config::SearchConfig;
use crate::eval::{Evaluator, WIN_VALUE};
use crate::game::{GameState, Scored, Side, Status};

// ============================================================================
// RESULTS
// ============================================================================

/// Counters for one search
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Nodes visited, root included
    pub nodes: u64,
    /// Evaluator calls at the depth limit
    pub evaluations: u64,
    /// Nodes abandoned by an alpha/beta cutoff
    pub cutoffs: u64,
}

impl AddAssign for SearchStats {
    fn add_assign(&mut self, other: Self) {
        self.nodes += other.nodes;
        self.evaluations += other.evaluations;
        self.cutoffs += other.cutoffs;
    }
}

/// Outcome of a search
#[derive(Clone, Copy, Debug)]
pub struct SearchResult<M> {
    /// Best root move and its score; no move when the root is terminal
    pub best: Scored<M>,
    pub stats: SearchStats,
    /// Searched to the end of the game rather than to the depth limit
    pub full_depth: bool,
}

impl<M: Copy> SearchResult<M> {
    pub fn best_move(&self) -> Option<M> {
        self.best.mv
    }

    pub fn score(&self) -> f64 {
        self.best.score
    }
}

/// Shuffle RNG from an optional seed (entropy when unset)
pub fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

// ============================================================================
// FRAMES
// ============================================================================

/// Best result recorded at one depth
#[derive(Clone, Copy, Debug)]
struct Frame<M> {
    best: Scored<M>,
    /// False when the score is only a bound left by a cutoff
    exact: bool,
}

impl<M> Frame<M> {
    fn scored(score: f64) -> Self {
        Self {
            best: Scored::sentinel(score),
            exact: true,
        }
    }

    /// Should `child`, reached by a move, replace the current best?
    ///
    /// Ties overwrite (later moves win) unless the child is only a bound.
    fn improved_by(&self, child: &Frame<M>, maximize: bool) -> bool {
        let (new, old) = (child.best.score, self.best.score);
        let strictly = if maximize { new > old } else { new < old };
        self.best.mv.is_none() || strictly || (new == old && child.exact)
    }
}

// ============================================================================
// ALPHA-BETA ENGINE
// ============================================================================

/// Alpha-beta search engine
pub struct AlphaBeta<G: GameState, E> {
    config: SearchConfig,
    evaluator: E,
    rng: ChaCha8Rng,
    frames: Vec<Frame<G::Move>>,
    stats: SearchStats,
    use_limit: bool,
}

impl<G: GameState, E: Evaluator<G>> AlphaBeta<G, E> {
    /// Engine seeded from `config.seed` (entropy when unset)
    pub fn new(config: SearchConfig, evaluator: E) -> Self {
        let rng = create_rng(config.seed);
        Self::with_rng(config, evaluator, rng)
    }

    pub fn with_rng(mut config: SearchConfig, evaluator: E, rng: ChaCha8Rng) -> Self {
        config.depth_limit = config.depth_limit.max(1);
        Self {
            config,
            evaluator,
            rng,
            frames: Vec::new(),
            stats: SearchStats::default(),
            use_limit: true,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Search from `board`. The board is left exactly as it was given.
    pub fn search(&mut self, board: &mut G, full_depth: bool) -> SearchResult<G::Move> {
        self.reset(board, full_depth);
        self.alpha_beta(board, 0, -WIN_VALUE, WIN_VALUE);
        self.result(full_depth)
    }

    /// Search only the given root moves, in the given order
    pub fn search_moves(
        &mut self,
        board: &mut G,
        moves: Vec<G::Move>,
        full_depth: bool,
    ) -> SearchResult<G::Move> {
        self.reset(board, full_depth);
        self.stats.nodes += 1;
        if !self.terminal_value(board, 0) && !moves.is_empty() {
            self.expand(board, 0, moves, -WIN_VALUE, WIN_VALUE);
        }
        self.result(full_depth)
    }

    fn reset(&mut self, board: &G, full_depth: bool) {
        let size = if full_depth {
            board.max_remaining_moves() + 1
        } else {
            self.config.depth_limit + 1
        };
        self.frames.clear();
        self.frames.resize(size, Frame::scored(0.0));
        self.stats = SearchStats::default();
        self.use_limit = !full_depth;
    }

    fn result(&self, full_depth: bool) -> SearchResult<G::Move> {
        SearchResult {
            best: self.frames[0].best,
            stats: self.stats,
            full_depth,
        }
    }

    /// Record the sentinel score of a finished game; false if in progress
    fn terminal_value(&mut self, board: &G, depth: usize) -> bool {
        let score = match board.status() {
            Status::InProgress => return false,
            Status::HomeWin => WIN_VALUE,
            Status::AwayWin => -WIN_VALUE,
            Status::Draw => 0.0,
        };
        self.frames[depth] = Frame::scored(score);
        true
    }

    fn alpha_beta(&mut self, board: &mut G, depth: usize, alpha: f64, beta: f64) {
        self.stats.nodes += 1;

        if self.terminal_value(board, depth) {
            return;
        }

        if self.use_limit && depth == self.config.depth_limit {
            self.stats.evaluations += 1;
            self.frames[depth] = Frame::scored(self.evaluator.evaluate(board));
            return;
        }

        let mut moves = board.legal_moves();
        debug_assert!(
            !moves.is_empty(),
            "in-progress position without legal moves at depth {}",
            depth
        );
        moves.shuffle(&mut self.rng);

        self.expand(board, depth, moves, alpha, beta);
    }

    /// Try each move in order, recording the best at `depth`
    fn expand(
        &mut self,
        board: &mut G,
        depth: usize,
        moves: Vec<G::Move>,
        mut alpha: f64,
        mut beta: f64,
    ) {
        let maximize = board.who() == Side::Home;
        let window = (alpha, beta);
        self.frames[depth] = Frame::scored(if maximize { -WIN_VALUE } else { WIN_VALUE });

        for mv in moves {
            let prior = board.who();
            board.apply(mv);
            self.alpha_beta(board, depth + 1, alpha, beta);
            board.undo(mv, prior);

            let child = self.frames[depth + 1];
            let frame = &mut self.frames[depth];
            if frame.improved_by(&child, maximize) {
                frame.best = Scored::new(mv, child.best.score);
                frame.exact = child.exact;
            }

            if !self.config.pruning {
                continue;
            }

            let best = frame.best.score;
            if maximize {
                alpha = alpha.max(best);
                if best == WIN_VALUE {
                    return;
                }
                if best >= beta {
                    frame.exact = false;
                    self.stats.cutoffs += 1;
                    return;
                }
            } else {
                beta = beta.min(best);
                if best == -WIN_VALUE {
                    return;
                }
                if best <= alpha {
                    frame.exact = false;
                    self.stats.cutoffs += 1;
                    return;
                }
            }
        }

        // A finite result outside the window is only a bound
        let frame = &mut self.frames[depth];
        let best = frame.best.score;
        let outside = if maximize { best <= window.0 } else { best >= window.1 };
        if self.config.pruning && outside && best.is_finite() {
            frame.exact = false;
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
