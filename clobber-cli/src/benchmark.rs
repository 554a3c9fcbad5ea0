//! Benchmark command - pruned vs unpruned search at increasing depths
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: create_positions(), benchmark_depth(), report_results()
//! - Level 3: timed_search()
//! - Level 4: timing utilities, formatting

use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use clobber_core::search::create_rng;
use clobber_core::{AlphaBeta, ClobberHeuristic, ClobberState, GameState, SearchConfig, SearchStats};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct BenchmarkArgs {
    /// Maximum depth to test
    #[arg(long, default_value = "4")]
    pub depth: usize,

    /// Number of random positions searched at each depth
    #[arg(long, default_value = "5")]
    pub positions: usize,

    /// Random moves played from the opening to reach each position
    #[arg(long, default_value = "6")]
    pub plies: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Totals for one search variant at one depth
#[derive(Clone, Debug, Default)]
struct VariantTotals {
    stats: SearchStats,
    time: Duration,
}

/// Pruned and unpruned totals at one depth
#[derive(Clone, Debug)]
struct DepthResult {
    depth: usize,
    pruned: VariantTotals,
    unpruned: VariantTotals,
    scores_match: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run benchmark command
///
/// 1. Create random mid-game positions
/// 2. Search each at every depth, with and without pruning
/// 3. Report node counts and timing
pub fn run(args: BenchmarkArgs, seed: Option<u64>) -> Result<()> {
    if args.depth == 0 || args.positions == 0 {
        bail!("Depth and position count must be at least 1");
    }

    tracing::info!(
        "Starting benchmark: {} positions, depths 1..={}",
        args.positions,
        args.depth
    );

    let mut rng = create_rng(seed);
    let positions = create_positions(&mut rng, args.positions, args.plies);

    let progress = if args.json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new((args.depth * positions.len()) as u64)
    };
    progress.set_style(ProgressStyle::with_template("{bar:40} {pos}/{len} searches ({elapsed})")?);

    let search_seed: u64 = rng.gen();
    let results: Vec<DepthResult> = (1..=args.depth)
        .map(|depth| {
            let result = benchmark_depth(depth, &positions, search_seed, &progress);
            if !result.scores_match {
                tracing::warn!("Pruned and unpruned scores differ at depth {}", depth);
            }
            result
        })
        .collect();
    progress.finish_and_clear();

    report_results(&results, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Random in-progress positions a few plies from the opening
fn create_positions(rng: &mut ChaCha8Rng, count: usize, plies: usize) -> Vec<ClobberState> {
    let mut positions = Vec::with_capacity(count);

    while positions.len() < count {
        let mut state = ClobberState::new();
        for _ in 0..plies {
            match state.legal_moves().choose(rng) {
                Some(&mv) => state.apply(mv),
                None => break,
            }
        }
        if !state.status().is_terminal() {
            positions.push(state);
        }
    }

    positions
}

/// Search every position at `depth` with and without pruning
fn benchmark_depth(
    depth: usize,
    positions: &[ClobberState],
    seed: u64,
    progress: &ProgressBar,
) -> DepthResult {
    let mut pruned = VariantTotals::default();
    let mut unpruned = VariantTotals::default();
    let mut scores_match = true;

    for position in positions {
        let config = SearchConfig::depth_limited(depth).with_seed(seed);
        let a = timed_search(position, config.clone(), &mut pruned);
        let b = timed_search(position, config.with_pruning(false), &mut unpruned);
        scores_match &= a == b;
        progress.inc(1);
    }

    DepthResult {
        depth,
        pruned,
        unpruned,
        scores_match,
    }
}

/// Report benchmark results
fn report_results(results: &[DepthResult], json: bool) -> Result<()> {
    if json {
        print_json_results(results)
    } else {
        print_text_results(results);
        Ok(())
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Search one position, adding its counts into `totals`; returns the score
fn timed_search(position: &ClobberState, config: SearchConfig, totals: &mut VariantTotals) -> f64 {
    let mut engine = AlphaBeta::new(config, ClobberHeuristic::Mobility);
    let mut board = position.clone();

    let start = Instant::now();
    let result = engine.search(&mut board, false);
    totals.time += start.elapsed();
    totals.stats += result.stats;

    result.score()
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Format duration for display
fn format_duration(d: Duration) -> String {
    if d.as_secs() >= 1 {
        format!("{:.2}s", d.as_secs_f64())
    } else if d.as_millis() >= 1 {
        format!("{:.1}ms", d.as_secs_f64() * 1000.0)
    } else {
        format!("{:.1}us", d.as_secs_f64() * 1_000_000.0)
    }
}

/// Fraction of unpruned nodes the pruned search visited
fn node_ratio(result: &DepthResult) -> f64 {
    if result.unpruned.stats.nodes == 0 {
        return 1.0;
    }
    result.pruned.stats.nodes as f64 / result.unpruned.stats.nodes as f64
}

/// Print results as JSON
fn print_json_results(results: &[DepthResult]) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonDepth {
        depth: usize,
        pruned: SearchStats,
        unpruned: SearchStats,
        pruned_ms: f64,
        unpruned_ms: f64,
        node_ratio: f64,
        scores_match: bool,
    }

    let output: Vec<JsonDepth> = results
        .iter()
        .map(|r| JsonDepth {
            depth: r.depth,
            pruned: r.pruned.stats,
            unpruned: r.unpruned.stats,
            pruned_ms: r.pruned.time.as_secs_f64() * 1000.0,
            unpruned_ms: r.unpruned.time.as_secs_f64() * 1000.0,
            node_ratio: node_ratio(r),
            scores_match: r.scores_match,
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Print results as text table
fn print_text_results(results: &[DepthResult]) {
    println!("\n=== Clobber Search Benchmark ===\n");
    println!(
        "{:>5} {:>12} {:>12} {:>8} {:>10} {:>10}  {}",
        "Depth", "Pruned", "Unpruned", "Ratio", "Pruned", "Unpruned", "Scores"
    );
    println!("{}", "-".repeat(72));

    for r in results {
        println!(
            "{:>5} {:>12} {:>12} {:>8.3} {:>10} {:>10}  {}",
            r.depth,
            r.pruned.stats.nodes,
            r.unpruned.stats.nodes,
            node_ratio(r),
            format_duration(r.pruned.time),
            format_duration(r.unpruned.time),
            if r.scores_match { "match" } else { "DIFFER" }
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_format_duration() {
        assert!(format_duration(Duration::from_micros(20)).contains("us"));
        assert!(format_duration(Duration::from_millis(500)).contains("ms"));
        assert!(format_duration(Duration::from_secs(5)).ends_with('s'));
    }

    #[test]
    fn test_create_positions_in_progress() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let positions = create_positions(&mut rng, 4, 8);
        assert_eq!(positions.len(), 4);
        for p in &positions {
            assert_eq!(p.num_moves(), 8);
            assert!(!p.status().is_terminal());
        }
    }

    #[test]
    fn test_benchmark_depth_scores_match() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let positions = create_positions(&mut rng, 2, 6);
        let result = benchmark_depth(3, &positions, 7, &ProgressBar::hidden());
        assert!(result.scores_match);
        assert!(result.pruned.stats.nodes <= result.unpruned.stats.nodes);
        assert!(node_ratio(&result) <= 1.0);
    }
}
