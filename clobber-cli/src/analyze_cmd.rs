//! Analyze command - search a single Clobber position
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_position(), analyze(), report_results()
//! - Level 3: timed_search()
//! - Level 4: formatting utilities

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use clobber_core::{
    AlphaBetaPlayer, ClobberHeuristic, ClobberMove, ClobberState, GameState, SearchConfig,
    SearchResult, Side,
};

use crate::match_cmd::search_config;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SideArg {
    Home,
    Away,
}

impl From<SideArg> for Side {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::Home => Side::Home,
            SideArg::Away => Side::Away,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum HeuristicArg {
    Mobility,
    StoneWeight,
}

impl From<HeuristicArg> for ClobberHeuristic {
    fn from(heuristic: HeuristicArg) -> Self {
        match heuristic {
            HeuristicArg::Mobility => ClobberHeuristic::Mobility,
            HeuristicArg::StoneWeight => ClobberHeuristic::StoneWeight,
        }
    }
}

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Board text file: one row per line, x = HOME, o = AWAY, . = empty
    #[arg(long, value_name = "FILE")]
    pub board: PathBuf,

    /// Side to move
    #[arg(long, value_enum, default_value = "home")]
    pub to_move: SideArg,

    /// Moves already played (decides full-depth search)
    #[arg(long, default_value = "0")]
    pub moves: u32,

    /// Search config JSON file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override the search depth limit
    #[arg(long)]
    pub depth: Option<usize>,

    /// Override the number of search threads
    #[arg(long)]
    pub threads: Option<usize>,

    /// Override the evaluator
    #[arg(long, value_enum)]
    pub heuristic: Option<HeuristicArg>,

    /// Also run the unpruned search and compare
    #[arg(long)]
    pub compare_unpruned: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// One timed search
#[derive(Clone, Debug)]
struct Analysis {
    label: &'static str,
    result: SearchResult<ClobberMove>,
    elapsed: Duration,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run analyze command
pub fn run(args: AnalyzeArgs, seed: Option<u64>) -> Result<()> {
    let mut config = search_config(args.config.as_deref(), args.depth, args.threads, seed)?;
    if let Some(heuristic) = args.heuristic {
        config = config.with_heuristic(heuristic.into());
    }

    let state = load_position(&args.board, args.to_move.into(), args.moves)?;
    let analyses = analyze(&state, &config, args.compare_unpruned);

    report_results(&state, &analyses, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Read a board file into a position
fn load_position(path: &Path, who: Side, num_moves: u32) -> Result<ClobberState> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read board: {}", path.display()))?;
    let state = ClobberState::parse(&text, who, num_moves)
        .with_context(|| format!("Invalid board: {}", path.display()))?;
    Ok(state)
}

/// Search the position, optionally also without pruning
fn analyze(state: &ClobberState, config: &SearchConfig, compare_unpruned: bool) -> Vec<Analysis> {
    let mut analyses = vec![timed_search("alpha-beta", state, config.clone())];

    if compare_unpruned {
        let unpruned = timed_search("minimax", state, config.clone().with_pruning(false));
        if unpruned.result.score() != analyses[0].result.score() {
            tracing::warn!(
                "Pruned score {} differs from unpruned score {}",
                analyses[0].result.score(),
                unpruned.result.score()
            );
        }
        analyses.push(unpruned);
    }

    analyses
}

/// Report analysis results
fn report_results(state: &ClobberState, analyses: &[Analysis], json: bool) -> Result<()> {
    if json {
        print_json_results(state, analyses)
    } else {
        print_text_results(state, analyses);
        Ok(())
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn timed_search(label: &'static str, state: &ClobberState, config: SearchConfig) -> Analysis {
    let mut player = AlphaBetaPlayer::clobber(config);
    let start = Instant::now();
    let result = player.search(state);
    Analysis {
        label,
        result,
        elapsed: start.elapsed(),
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn move_text(result: &SearchResult<ClobberMove>) -> String {
    result
        .best_move()
        .map_or_else(|| "none".to_string(), |mv| mv.to_string())
}

/// Print results as JSON
fn print_json_results(state: &ClobberState, analyses: &[Analysis]) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonSearch {
        search: &'static str,
        best_move: Option<ClobberMove>,
        score: String,
        full_depth: bool,
        nodes: u64,
        evaluations: u64,
        cutoffs: u64,
        millis: f64,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        board: Vec<String>,
        to_move: Side,
        status: clobber_core::Status,
        searches: Vec<JsonSearch>,
    }

    let output = JsonOutput {
        board: state.to_string().lines().map(String::from).collect(),
        to_move: state.who(),
        status: state.status(),
        searches: analyses
            .iter()
            .map(|a| JsonSearch {
                search: a.label,
                best_move: a.result.best_move(),
                // Infinite scores are not representable as JSON numbers
                score: a.result.score().to_string(),
                full_depth: a.result.full_depth,
                nodes: a.result.stats.nodes,
                evaluations: a.result.stats.evaluations,
                cutoffs: a.result.stats.cutoffs,
                millis: a.elapsed.as_secs_f64() * 1000.0,
            })
            .collect(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Print results as text
fn print_text_results(state: &ClobberState, analyses: &[Analysis]) {
    println!("{}", state);
    println!("\nTo move: {}  Status: {:?}", state.who(), state.status());

    for a in analyses {
        println!("\n=== {} ===", a.label);
        println!("Best move:   {}", move_text(&a.result));
        println!("Score:       {}", a.result.score());
        println!("Full depth:  {}", a.result.full_depth);
        println!(
            "Nodes:       {} ({} evaluations, {} cutoffs)",
            a.result.stats.nodes, a.result.stats.evaluations, a.result.stats.cutoffs
        );
        println!("Time:        {:.2?}", a.elapsed);
    }
}

// ============================================================================
// TESTS
// ============================================================================
