//! Clobber CLI - Command-line interface
//!
//! Commands:
//! - play: Play a match between two players
//! - analyze: Search a single Clobber position
//! - benchmark: Compare pruned and unpruned search

mod analyze_cmd;
mod benchmark;
mod match_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "clobber")]
#[command(about = "Alpha-beta search for Clobber and Connect-4")]
struct Cli {
    /// Random seed for reproducible runs
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a match between two players
    Play(match_cmd::PlayArgs),
    /// Search a single Clobber position
    Analyze(analyze_cmd::AnalyzeArgs),
    /// Compare pruned and unpruned search at increasing depths
    Benchmark(benchmark::BenchmarkArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so JSON output stays clean; RUST_LOG sets the level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => match_cmd::run(args, cli.seed),
        Commands::Analyze(args) => analyze_cmd::run(args, cli.seed),
        Commands::Benchmark(args) => benchmark::run(args, cli.seed),
    }
}
