//! Run command implementation.

use super::output::{format_text, JsonGameResult};
use super::{clock_seed, CliError, OutputFormat};
use quadmerge::simulate::play;
use quadmerge::{GameSummary, SimulationConfig};

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the result cannot be serialized.
pub(crate) fn execute(
    seed: Option<u64>,
    config: &SimulationConfig,
    format: OutputFormat,
) -> Result<(), CliError> {
    let seed = seed.unwrap_or_else(clock_seed);

    let engine = play(seed, config);
    let summary = GameSummary::from_engine(seed, config.strategy, &engine);

    match format {
        OutputFormat::Text => {
            print!("{}", format_text(&summary, &engine));
        }
        OutputFormat::Json => {
            let json_result = JsonGameResult::from_engine(&summary, &engine);
            let json = serde_json::to_string_pretty(&json_result)
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
    }

    Ok(())
}
