//! Players: the alpha-beta façade and the simple move pickers
//!
//! A player is handed the current position and the opponent's last move in
//! text form and answers with a move, or `None` when it has nothing to play.
//! Players never mutate the caller's board.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::board::{Cell, DIRECTIONS};
use crate::clobber::{ClobberGrid, ClobberMove, ClobberState, COLS, ROWS};
use crate::config::SearchConfig;
use crate::connect4::Connect4State;
use crate::eval::{ClobberHeuristic, Connect4Heuristic, Evaluator};
use crate::game::GameState;
use crate::parallel::parallel_search;
use crate::search::{create_rng, AlphaBeta, SearchResult};

/// Turn-taking contract between a match harness and a player
pub trait Player<G: GameState> {
    fn name(&self) -> &str;

    /// Called once before each game
    fn start_game(&mut self) {}

    /// Pick a move for the side to move in `state`
    fn get_move(&mut self, state: &G, last_move: Option<&str>) -> Option<G::Move>;
}

// ============================================================================
// ALPHA-BETA
// ============================================================================

/// Alpha-beta search player
pub struct AlphaBetaPlayer<G: GameState, E> {
    name: String,
    config: SearchConfig,
    evaluator: E,
    rng: ChaCha8Rng,
    last_result: Option<SearchResult<G::Move>>,
}

impl<G: GameState, E: Evaluator<G> + Clone> AlphaBetaPlayer<G, E> {
    pub fn new(config: SearchConfig, evaluator: E) -> Self {
        let name = if config.pruning {
            format!("alpha-beta(d={})", config.depth_limit)
        } else {
            format!("minimax(d={})", config.depth_limit)
        };
        Self {
            name,
            rng: create_rng(config.seed),
            config,
            evaluator,
            last_result: None,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Result of the most recent search
    pub fn last_result(&self) -> Option<&SearchResult<G::Move>> {
        self.last_result.as_ref()
    }

    /// Search a private copy of `state` with fresh frames
    pub fn search(&mut self, state: &G) -> SearchResult<G::Move> {
        let full_depth = self.config.full_depth_for(state.num_moves());

        let result = if self.config.threads > 1 {
            parallel_search(state, &self.config, &self.evaluator, &mut self.rng, full_depth)
        } else {
            let rng = create_rng(Some(self.rng.gen()));
            let mut engine = AlphaBeta::with_rng(self.config.clone(), self.evaluator.clone(), rng);
            engine.search(&mut state.clone(), full_depth)
        };

        tracing::debug!(
            player = %self.name,
            moves = state.num_moves(),
            full_depth,
            score = result.score(),
            nodes = result.stats.nodes,
            cutoffs = result.stats.cutoffs,
            "search finished"
        );

        self.last_result = Some(result);
        result
    }
}

impl AlphaBetaPlayer<ClobberState, ClobberHeuristic> {
    /// Clobber player using the configured heuristic
    pub fn clobber(config: SearchConfig) -> Self {
        let heuristic = config.heuristic;
        Self::new(config, heuristic)
    }
}

impl AlphaBetaPlayer<Connect4State, Connect4Heuristic> {
    pub fn connect4(config: SearchConfig) -> Self {
        Self::new(config, Connect4Heuristic)
    }
}

impl<G: GameState, E: Evaluator<G> + Clone> Player<G> for AlphaBetaPlayer<G, E> {
    fn name(&self) -> &str {
        &self.name
    }

    fn start_game(&mut self) {
        self.last_result = None;
    }

    fn get_move(&mut self, state: &G, last_move: Option<&str>) -> Option<G::Move> {
        if let Some(text) = last_move {
            tracing::trace!(player = %self.name, opponent = text, "opponent moved");
        }
        self.search(state).best_move()
    }
}

// ============================================================================
// RANDOM
// ============================================================================

/// Uniformly random legal move, for any game
pub struct RandomPlayer {
    rng: ChaCha8Rng,
}

impl RandomPlayer {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            rng: create_rng(seed),
        }
    }
}

impl<G: GameState> Player<G> for RandomPlayer {
    fn name(&self) -> &str {
        "random"
    }

    fn get_move(&mut self, state: &G, _last_move: Option<&str>) -> Option<G::Move> {
        state.legal_moves().choose(&mut self.rng).copied()
    }
}

// ============================================================================
// CLOBBER-ONLY PLAYERS
// ============================================================================

/// First capture found scanning from the bottom-right cell backwards
#[derive(Default)]
pub struct SystematicPlayer;

impl Player<ClobberState> for SystematicPlayer {
    fn name(&self) -> &str {
        "systematic"
    }

    fn get_move(&mut self, state: &ClobberState, _last_move: Option<&str>) -> Option<ClobberMove> {
        let own = Cell::from(state.who());
        let opp = Cell::from(state.who().opponent());

        for r in (0..ROWS).rev() {
            for c in (0..COLS).rev() {
                if state.cell(r, c) != own {
                    continue;
                }
                for dir in 0..DIRECTIONS.len() {
                    if let Some(to) = ClobberGrid::neighbor(r, c, dir) {
                        if state.cell(to.0, to.1) == opp {
                            return Some(ClobberMove::from_cells((r, c), to));
                        }
                    }
                }
            }
        }
        None
    }
}

/// Moves a stone that touches the most opponent stones
pub struct GreedyPlayer {
    rng: ChaCha8Rng,
}

impl GreedyPlayer {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            rng: create_rng(seed),
        }
    }
}

impl Player<ClobberState> for GreedyPlayer {
    fn name(&self) -> &str {
        "greedy"
    }

    fn get_move(&mut self, state: &ClobberState, _last_move: Option<&str>) -> Option<ClobberMove> {
        let own = Cell::from(state.who());
        let opp = Cell::from(state.who().opponent());
        let targets = |r: usize, c: usize| -> Vec<(usize, usize)> {
            (0..DIRECTIONS.len())
                .filter_map(|dir| ClobberGrid::neighbor(r, c, dir))
                .filter(|&(tr, tc)| state.cell(tr, tc) == opp)
                .collect()
        };

        let mut most = 0;
        let mut candidates = Vec::new();
        for (r, c, cell) in state.grid().cells() {
            if cell != own {
                continue;
            }
            let n = targets(r, c).len();
            if n == 0 || n < most {
                continue;
            }
            if n > most {
                most = n;
                candidates.clear();
            }
            candidates.push((r, c));
        }

        let &from = candidates.choose(&mut self.rng)?;
        let &to = targets(from.0, from.1).choose(&mut self.rng)?;
        Some(ClobberMove::from_cells(from, to))
    }
}

// ============================================================================
// TESTS
// ============================================================================
