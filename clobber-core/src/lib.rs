//! Clobber Core - Game engine and alpha-beta search
//!
//! This crate provides:
//! - Board geometry (fixed-size grid, orthogonal neighbors)
//! - The game capability contract shared by every game
//! - Clobber (5x6) and Connect-4 (6x7) states with apply/undo
//! - Heuristic evaluators
//! - Depth-limited alpha-beta search, sequential or root-split parallel
//! - Players and a match harness

pub mod board;
pub mod error;
pub mod game;
pub mod clobber;
pub mod connect4;
pub mod eval;
pub mod config;
pub mod search;
pub mod parallel;
pub mod player;
pub mod match_play;

// Re-exports for convenient access
pub use board::{Cell, Grid, DIRECTIONS};
pub use error::{MoveError, ParseError};
pub use game::{GameMove, GameState, Scored, Side, Status};
pub use clobber::{ClobberMove, ClobberState};
pub use connect4::{Connect4Move, Connect4State};
pub use eval::{ClobberHeuristic, Connect4Heuristic, Evaluator, WIN_VALUE};
pub use config::SearchConfig;
pub use search::{AlphaBeta, SearchResult, SearchStats};
pub use parallel::parallel_search;
pub use player::{AlphaBetaPlayer, GreedyPlayer, Player, RandomPlayer, SystematicPlayer};
pub use match_play::{play_game, play_match, GameOutcome, MatchSummary};
