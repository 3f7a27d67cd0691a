//! Quadmerge CLI - play and simulate 4×4 merge puzzles from the command line.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

/// Quadmerge - a deterministic 4×4 tile-merging puzzle engine
#[derive(Parser, Debug)]
#[command(name = "quadmerge")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log filter, e.g. "info", "debug", "quadmerge=trace"
    #[arg(long, global = true, default_value = "warn")]
    log: String,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a single game with an autoplay strategy
    Run {
        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Direction picker
        #[arg(long, default_value = "greedy")]
        strategy: cli::StrategyArg,

        /// Stop after this many moves (default: 100000)
        #[arg(short, long, default_value = "100000")]
        max_moves: u32,

        /// Probability that a spawned tile is a 4
        #[arg(long, default_value = "0.1")]
        four_probability: f64,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Run many games in parallel and aggregate statistics
    Simulate {
        /// Number of games to run (default: 1000)
        #[arg(short, long, default_value = "1000")]
        games: u64,

        /// Starting seed (increments for each game)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Direction picker
        #[arg(long, default_value = "random")]
        strategy: cli::StrategyArg,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Stop each game after this many moves (default: 100000)
        #[arg(short, long, default_value = "100000")]
        max_moves: u32,

        /// Probability that a spawned tile is a 4
        #[arg(long, default_value = "0.1")]
        four_probability: f64,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::SimulateFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = cli::init_logging(&args.log) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    let result = match args.command {
        Commands::Run {
            seed,
            strategy,
            max_moves,
            four_probability,
            format,
        } => cli::simulation_config(strategy, max_moves, four_probability)
            .and_then(|config| cli::run::execute(seed, &config, format)),

        Commands::Simulate {
            games,
            seed,
            strategy,
            threads,
            max_moves,
            four_probability,
            format,
            progress,
        } => cli::simulation_config(strategy, max_moves, four_probability).and_then(|config| {
            cli::simulate::execute(games, seed, threads, &config, format, progress)
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
