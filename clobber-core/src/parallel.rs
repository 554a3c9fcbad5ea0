//! Root-split parallel search
//!
//! The shuffled root moves are dealt round-robin into one partition per
//! worker. Each worker owns a clone of the board and its own engine, so no
//! mutable state is shared; the partition results are then reduced with the
//! same HOME-maximizing comparison the engine uses.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::config::SearchConfig;
use crate::eval::{Evaluator, WIN_VALUE};
use crate::game::{GameState, Scored, Side, Status};
use crate::search::{AlphaBeta, SearchResult, SearchStats};

/// Search `board` on up to `config.threads` rayon workers
pub fn parallel_search<G, E>(
    board: &G,
    config: &SearchConfig,
    evaluator: &E,
    rng: &mut ChaCha8Rng,
    full_depth: bool,
) -> SearchResult<G::Move>
where
    G: GameState,
    E: Evaluator<G> + Clone,
{
    let root_score = match board.status() {
        Status::InProgress => None,
        Status::HomeWin => Some(WIN_VALUE),
        Status::AwayWin => Some(-WIN_VALUE),
        Status::Draw => Some(0.0),
    };
    if let Some(score) = root_score {
        return SearchResult {
            best: Scored::sentinel(score),
            stats: SearchStats { nodes: 1, ..Default::default() },
            full_depth,
        };
    }

    let mut moves = board.legal_moves();
    moves.shuffle(rng);

    let workers = config.threads.clamp(1, moves.len().max(1));
    let mut partitions: Vec<Vec<G::Move>> = vec![Vec::new(); workers];
    for (i, mv) in moves.into_iter().enumerate() {
        partitions[i % workers].push(mv);
    }

    let base_seed: u64 = rng.gen();
    tracing::debug!(workers, base_seed, "root-split search");

    let results: Vec<SearchResult<G::Move>> = partitions
        .into_par_iter()
        .enumerate()
        .map(|(i, partition)| {
            let worker_rng = ChaCha8Rng::seed_from_u64(base_seed.wrapping_add(i as u64));
            let mut engine = AlphaBeta::with_rng(config.clone(), evaluator.clone(), worker_rng);
            let mut local = board.clone();
            engine.search_moves(&mut local, partition, full_depth)
        })
        .collect();

    reduce(board.who(), results, full_depth)
}

/// Combine worker results; later partitions win ties
fn reduce<M: Copy>(who: Side, results: Vec<SearchResult<M>>, full_depth: bool) -> SearchResult<M> {
    let maximize = who == Side::Home;
    let mut best: Scored<M> = Scored::sentinel(if maximize { -WIN_VALUE } else { WIN_VALUE });
    let mut stats = SearchStats::default();

    for result in results {
        stats += result.stats;
        if result.best.mv.is_none() {
            continue;
        }
        let (new, old) = (result.best.score, best.score);
        let better = if maximize { new >= old } else { new <= old };
        if best.mv.is_none() || better {
            best = result.best;
        }
    }

    SearchResult {
        best,
        stats,
        full_depth,
    }
}
