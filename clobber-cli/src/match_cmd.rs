//! Play command - run a match between two players
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: search_config(), build players, run_match(), report_results()
//! - Level 3: clobber_player(), connect4_player(), game records
//! - Level 4: formatting utilities

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};

use clobber_core::{
    play_match, AlphaBetaPlayer, ClobberState, Connect4State, GameOutcome, GameState,
    GreedyPlayer, MatchSummary, Player, RandomPlayer, SearchConfig, Side, SystematicPlayer,
};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum GameKind {
    Clobber,
    Connect4,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PlayerKind {
    /// Alpha-beta search
    AlphaBeta,
    /// Uniformly random legal move
    Random,
    /// First capture scanning backwards (Clobber only)
    Systematic,
    /// Moves the most threatened stone (Clobber only)
    Greedy,
}

#[derive(Args)]
pub struct PlayArgs {
    /// Game to play
    #[arg(long, value_enum, default_value = "clobber")]
    pub game: GameKind,

    /// First player (HOME in odd-numbered games)
    #[arg(long, value_enum, default_value = "alpha-beta")]
    pub home: PlayerKind,

    /// Second player
    #[arg(long, value_enum, default_value = "random")]
    pub away: PlayerKind,

    /// Number of games to play (will alternate colours)
    #[arg(long, default_value = "10")]
    pub games: u32,

    /// Search config JSON file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override the search depth limit
    #[arg(long)]
    pub depth: Option<usize>,

    /// Override the number of search threads
    #[arg(long)]
    pub threads: Option<usize>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// One finished game, seen from the first player
#[derive(Clone, Debug)]
struct GameRecord {
    game_number: u32,
    first_was_home: bool,
    outcome: GameOutcome,
}

/// Aggregated match results
#[derive(Clone, Debug)]
struct MatchReport {
    first: String,
    second: String,
    summary: MatchSummary,
    games: Vec<GameRecord>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// 1. Build the search config from file and flags
/// 2. Create both players for the chosen game
/// 3. Play the match
/// 4. Report results
pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let config = search_config(args.config.as_deref(), args.depth, args.threads, seed)?;

    tracing::info!(
        "Starting match: {:?} vs {:?} ({:?}, {} games, depth={})",
        args.home,
        args.away,
        args.game,
        args.games,
        config.depth_limit
    );

    let second_seed = seed.map(|s| s.wrapping_add(1));
    let report = match args.game {
        GameKind::Clobber => {
            let mut first = clobber_player(args.home, &config, seed);
            let mut second = clobber_player(args.away, &config, second_seed);
            run_match(ClobberState::new(), first.as_mut(), second.as_mut(), &args)?
        }
        GameKind::Connect4 => {
            let mut first = connect4_player(args.home, &config, seed)?;
            let mut second = connect4_player(args.away, &config, second_seed)?;
            run_match(Connect4State::new(), first.as_mut(), second.as_mut(), &args)?
        }
    };

    report_results(&report, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Config file (or defaults) with command line overrides applied
pub fn search_config(
    path: Option<&Path>,
    depth: Option<usize>,
    threads: Option<usize>,
    seed: Option<u64>,
) -> Result<SearchConfig> {
    let mut config = match path {
        Some(path) => SearchConfig::load(path)?,
        None => SearchConfig::default(),
    };

    if let Some(depth) = depth {
        if depth == 0 {
            bail!("Search depth must be at least 1");
        }
        config.depth_limit = depth;
    }
    if let Some(threads) = threads {
        config = config.with_threads(threads);
    }
    if config.seed.is_none() {
        config.seed = seed;
    }

    Ok(config)
}

/// Play all games with a progress bar
fn run_match<G: GameState>(
    initial: G,
    first: &mut dyn Player<G>,
    second: &mut dyn Player<G>,
    args: &PlayArgs,
) -> Result<MatchReport> {
    let progress = if args.json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(args.games as u64)
    };
    progress.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} games ({elapsed})")?.progress_chars("=> "),
    );

    let (first_name, second_name) = (first.name().to_string(), second.name().to_string());
    let mut games = Vec::with_capacity(args.games as usize);

    let summary = play_match(&initial, first, second, args.games, |game, outcome| {
        let record = GameRecord {
            game_number: game + 1,
            first_was_home: game % 2 == 0,
            outcome: outcome.clone(),
        };
        if let Some(side) = outcome.forfeit {
            tracing::warn!("Game {}: {} forfeited", record.game_number, side);
        }
        tracing::info!(
            "Game {}: {:?} ({} moves)",
            record.game_number,
            outcome.status,
            outcome.num_moves()
        );
        games.push(record);
        progress.inc(1);
    });
    progress.finish_and_clear();

    Ok(MatchReport {
        first: first_name,
        second: second_name,
        summary,
        games,
    })
}

/// Report match results
fn report_results(report: &MatchReport, json: bool) -> Result<()> {
    if json {
        print_json_results(report)
    } else {
        print_text_results(report);
        Ok(())
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn clobber_player(
    kind: PlayerKind,
    config: &SearchConfig,
    seed: Option<u64>,
) -> Box<dyn Player<ClobberState>> {
    match kind {
        PlayerKind::AlphaBeta => Box::new(AlphaBetaPlayer::clobber(seeded(config, seed))),
        PlayerKind::Random => Box::new(RandomPlayer::new(seed)),
        PlayerKind::Systematic => Box::new(SystematicPlayer),
        PlayerKind::Greedy => Box::new(GreedyPlayer::new(seed)),
    }
}

fn connect4_player(
    kind: PlayerKind,
    config: &SearchConfig,
    seed: Option<u64>,
) -> Result<Box<dyn Player<Connect4State>>> {
    match kind {
        PlayerKind::AlphaBeta => Ok(Box::new(AlphaBetaPlayer::connect4(seeded(config, seed)))),
        PlayerKind::Random => Ok(Box::new(RandomPlayer::new(seed))),
        PlayerKind::Systematic | PlayerKind::Greedy => {
            bail!("{:?} player only plays Clobber", kind)
        }
    }
}

/// Give each search player its own seed so the two sides shuffle differently
fn seeded(config: &SearchConfig, seed: Option<u64>) -> SearchConfig {
    let mut config = config.clone();
    if let Some(seed) = seed {
        config.seed = Some(seed);
    }
    config
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn percent(count: u32, total: u32) -> f64 {
    if total > 0 {
        count as f64 / total as f64 * 100.0
    } else {
        0.0
    }
}

/// Result of a game from the first player's point of view
fn first_player_result(record: &GameRecord) -> &'static str {
    match record.outcome.winner() {
        None => "draw",
        Some(side) if (side == Side::Home) == record.first_was_home => "win",
        Some(_) => "loss",
    }
}

/// Print results as JSON
fn print_json_results(report: &MatchReport) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonGame<'a> {
        game_number: u32,
        first_was_home: bool,
        result: &'static str,
        outcome: &'a GameOutcome,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        first: &'a str,
        second: &'a str,
        summary: &'a MatchSummary,
        first_win_rate: f64,
        games: Vec<JsonGame<'a>>,
    }

    let output = JsonOutput {
        first: &report.first,
        second: &report.second,
        summary: &report.summary,
        first_win_rate: report.summary.first_win_rate(),
        games: report
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                first_was_home: g.first_was_home,
                result: first_player_result(g),
                outcome: &g.outcome,
            })
            .collect(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Print results as text
fn print_text_results(report: &MatchReport) {
    let s = &report.summary;

    println!("\n=== Match Results ===");
    println!("{} vs {}", report.first, report.second);
    println!("Total games: {}", s.games);
    for (name, wins) in [(&report.first, s.first_wins), (&report.second, s.second_wins)] {
        println!("{:<12} {} ({:.1}%)", format!("{} wins:", name), wins, percent(wins, s.games));
    }
    println!("Draws:       {} ({:.1}%)", s.draws, percent(s.draws, s.games));
    println!("Forfeits:    {}", s.forfeits);
    println!("Avg moves:   {:.1}", s.average_length());

    println!("\nGame details:");
    for game in &report.games {
        let colour = if game.first_was_home { "HOME" } else { "AWAY" };
        println!(
            "  Game {}: {} as {} -> {} in {} moves",
            game.game_number,
            report.first,
            colour,
            first_player_result(game),
            game.outcome.num_moves()
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================
