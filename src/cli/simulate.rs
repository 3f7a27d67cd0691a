//! Simulate command implementation.

use super::output::{format_batch_csv, format_batch_text, BatchStats, JsonBatchResult};
use super::{clock_seed, CliError, SimulateFormat};
use indicatif::{ProgressBar, ProgressStyle};
use quadmerge::{run_game, SimulationConfig};
use rayon::prelude::*;
use std::time::Instant;
use tracing::info;

/// Execute the simulate command.
///
/// # Errors
///
/// Returns an error if the thread pool or output fails.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn execute(
    games: u64,
    seed: Option<u64>,
    threads: Option<usize>,
    config: &SimulationConfig,
    format: SimulateFormat,
    progress: bool,
) -> Result<(), CliError> {
    // Set thread pool size if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| CliError::new(format!("Failed to build thread pool: {e}")))?;
    }

    let base_seed = seed.unwrap_or_else(clock_seed);
    info!(games, base_seed, strategy = ?config.strategy, "starting simulation");

    let pb = if progress {
        let pb = ProgressBar::new(games);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} games ({per_sec})")
            .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
            .progress_chars("=>-");
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();

    // Each worker folds into its own stats, merged at the end
    let stats = (0..games)
        .into_par_iter()
        .fold(BatchStats::default, |mut local_stats, i| {
            let summary = run_game(base_seed.wrapping_add(i), config);
            local_stats.add_result(&summary);
            if let Some(pb) = &pb {
                pb.inc(1);
            }
            local_stats
        })
        .reduce(BatchStats::default, |mut a, b| {
            a.merge(&b);
            a
        });

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    let games_per_sec = if duration.as_secs_f64() > 0.0 {
        stats.games_played as f64 / duration.as_secs_f64()
    } else {
        0.0
    };
    info!(elapsed_ms = duration.as_millis(), games_per_sec, "simulation finished");

    match format {
        SimulateFormat::Text => {
            println!();
            print!("{}", format_batch_text(&stats, config.strategy));
            println!();
            println!("Duration: {:.2}s ({games_per_sec:.0} games/sec)", duration.as_secs_f64());
        }
        SimulateFormat::Json => {
            let json_result = JsonBatchResult::from_stats(&stats, config.strategy);
            let json = serde_json::to_string_pretty(&json_result)
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
        SimulateFormat::Csv => {
            print!("{}", format_batch_csv(&stats));
        }
    }

    Ok(())
}
