//! Output formatting utilities for CLI.

// Stats are reported as floats on purpose
#![allow(clippy::cast_precision_loss)]

use quadmerge::game::SIZE;
use quadmerge::{Engine, GameSummary, Strategy};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// JSON-serializable game result.
#[derive(Debug, Serialize)]
pub(super) struct JsonGameResult {
    /// Random seed used.
    seed: u64,
    /// Strategy that played.
    strategy: Strategy,
    /// Final score.
    score: u64,
    /// Board-changing moves.
    moves: u32,
    /// Largest tile.
    max_tile: u32,
    /// Whether 2048 was reached.
    won: bool,
    /// Whether the game ended with no legal move.
    game_over: bool,
    /// Final board, rows top to bottom, 0 for empty.
    board: [[u32; SIZE]; SIZE],
}

impl JsonGameResult {
    /// Create from a finished engine.
    pub(super) fn from_engine(summary: &GameSummary, engine: &Engine) -> Self {
        Self {
            seed: summary.seed,
            strategy: summary.strategy,
            score: summary.score,
            moves: summary.moves,
            max_tile: summary.max_tile,
            won: summary.won,
            game_over: summary.game_over,
            board: engine.board().rows(),
        }
    }
}

/// Format a single game as human-readable text.
pub(super) fn format_text(summary: &GameSummary, engine: &Engine) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Game Result (seed: {})", summary.seed);
    let _ = writeln!(output, "{}\n", engine.board());
    let _ = writeln!(output, "  Strategy: {:?}", summary.strategy);
    let _ = writeln!(output, "  Score:    {}", summary.score);
    let _ = writeln!(output, "  Moves:    {}", summary.moves);
    let _ = writeln!(output, "  Max tile: {}", summary.max_tile);
    let status = match (summary.won, summary.game_over) {
        (true, true) => "won, then no moves left",
        (true, false) => "won, stopped at move limit",
        (false, true) => "no moves left",
        (false, false) => "stopped at move limit",
    };
    let _ = writeln!(output, "  Result:   {status}");

    output
}

/// Aggregated statistics over a batch of games.
#[derive(Debug, Default, Clone)]
pub(super) struct BatchStats {
    /// Total games played.
    pub(super) games_played: u64,
    /// Games that reached the winning tile.
    wins: u64,
    /// Sum of final scores.
    total_score: f64,
    /// Score sum of squares for std dev calculation.
    score_sq_sum: f64,
    /// Best final score.
    best_score: u64,
    /// Total moves across all games.
    total_moves: u64,
    /// Games per max tile reached.
    max_tiles: BTreeMap<u32, u64>,
}

impl BatchStats {
    /// Add a game result to the stats.
    pub(super) fn add_result(&mut self, summary: &GameSummary) {
        let score = summary.score as f64;
        self.games_played += 1;
        self.total_score += score;
        self.score_sq_sum += score * score;
        self.best_score = self.best_score.max(summary.score);
        self.total_moves += u64::from(summary.moves);
        if summary.won {
            self.wins += 1;
        }
        *self.max_tiles.entry(summary.max_tile).or_insert(0) += 1;
    }

    /// Merge stats from another worker.
    pub(super) fn merge(&mut self, other: &BatchStats) {
        self.games_played += other.games_played;
        self.wins += other.wins;
        self.total_score += other.total_score;
        self.score_sq_sum += other.score_sq_sum;
        self.best_score = self.best_score.max(other.best_score);
        self.total_moves += other.total_moves;
        for (&tile, &count) in &other.max_tiles {
            *self.max_tiles.entry(tile).or_insert(0) += count;
        }
    }

    /// Fraction of games that reached the winning tile (0.0-1.0).
    pub(super) fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.wins as f64 / self.games_played as f64
    }

    /// Average final score.
    pub(super) fn avg_score(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_score / self.games_played as f64
    }

    /// Final score standard deviation.
    pub(super) fn score_std_dev(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        let n = self.games_played as f64;
        let mean = self.avg_score();
        let variance = (self.score_sq_sum / n) - (mean * mean);
        if variance < 0.0 { 0.0 } else { variance.sqrt() }
    }

    /// Average moves per game.
    pub(super) fn avg_moves(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_moves as f64 / self.games_played as f64
    }
}

/// JSON-serializable batch result.
#[derive(Debug, Serialize)]
pub(super) struct JsonBatchResult {
    /// Total games played.
    games_played: u64,
    /// Strategy that played.
    strategy: Strategy,
    /// Average final score.
    avg_score: f64,
    /// Score standard deviation.
    score_std_dev: f64,
    /// Best final score.
    best_score: u64,
    /// Win rate (0.0-1.0).
    win_rate: f64,
    /// Average moves per game.
    avg_moves: f64,
    /// Games per max tile reached.
    max_tiles: BTreeMap<u32, u64>,
}

impl JsonBatchResult {
    /// Create from stats.
    pub(super) fn from_stats(stats: &BatchStats, strategy: Strategy) -> Self {
        Self {
            games_played: stats.games_played,
            strategy,
            avg_score: stats.avg_score(),
            score_std_dev: stats.score_std_dev(),
            best_score: stats.best_score,
            win_rate: stats.win_rate(),
            avg_moves: stats.avg_moves(),
            max_tiles: stats.max_tiles.clone(),
        }
    }
}

/// Format batch stats as human-readable text.
pub(super) fn format_batch_text(stats: &BatchStats, strategy: Strategy) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Simulation Results ({} games, {strategy:?})", stats.games_played);
    output.push_str("========================================\n\n");

    let _ = writeln!(
        output,
        "Score: {:.1} (+/- {:.1}), best {}",
        stats.avg_score(),
        stats.score_std_dev(),
        stats.best_score
    );
    let _ = writeln!(output, "Win rate: {:.2}% ({} games)", stats.win_rate() * 100.0, stats.wins);
    let _ = writeln!(output, "Average moves: {:.0}\n", stats.avg_moves());

    output.push_str("Max tile reached:\n");
    for (tile, count) in &stats.max_tiles {
        let share = *count as f64 / stats.games_played.max(1) as f64 * 100.0;
        let _ = writeln!(output, "  {tile:>6}: {count:>8} ({share:.1}%)");
    }

    output
}

/// Format batch stats as CSV, one row per max tile.
pub(super) fn format_batch_csv(stats: &BatchStats) -> String {
    let mut output = String::new();

    // Header
    output.push_str("max_tile,games,share\n");

    // Data rows
    for (tile, count) in &stats.max_tiles {
        let share = *count as f64 / stats.games_played.max(1) as f64;
        let _ = writeln!(output, "{tile},{count},{share:.4}");
    }

    output
}
