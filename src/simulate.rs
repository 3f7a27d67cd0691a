//! Autoplay harness for whole games.
//!
//! Provides a pure function interface: `(seed, config) -> GameSummary`
//!
//! The harness plays the engine the way a host would: pick a direction,
//! move, read state, repeat until game over. Batches run in parallel with
//! rayon, one engine per game.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::game::{Direction, Engine, SpawnConfig};

/// Mixed into the game seed so direction picks do not mirror spawns.
const POLICY_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// How the harness picks a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Uniform among directions that change the board.
    #[default]
    Random,
    /// First changing direction in the order left, up, right, down.
    Corner,
    /// Highest immediate score, then most empty cells.
    Greedy,
}

const CORNER_ORDER: [Direction; 4] = [
    Direction::Left,
    Direction::Up,
    Direction::Right,
    Direction::Down,
];

impl Strategy {
    /// Pick a direction that changes the board, or `None` at game over.
    pub fn choose<R: Rng>(self, engine: &Engine, rng: &mut R) -> Option<Direction> {
        match self {
            Strategy::Random => {
                let legal: Vec<Direction> = Direction::ALL
                    .into_iter()
                    .filter(|&d| engine.preview(d).1.changed)
                    .collect();
                legal.choose(rng).copied()
            }
            Strategy::Corner => CORNER_ORDER
                .into_iter()
                .find(|&d| engine.preview(d).1.changed),
            Strategy::Greedy => {
                let mut best: Option<(Direction, (u64, usize))> = None;
                for direction in Direction::ALL {
                    let (board, outcome) = engine.preview(direction);
                    if !outcome.changed {
                        continue;
                    }
                    let key = (outcome.score_gained, board.empty_count());
                    if best.is_none_or(|(_, best_key)| key > best_key) {
                        best = Some((direction, key));
                    }
                }
                best.map(|(direction, _)| direction)
            }
        }
    }
}

/// Configuration for simulated games.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    /// Direction picker.
    pub strategy: Strategy,
    /// Stop after this many board-changing moves.
    pub max_moves: u32,
    /// Spawn policy for every engine.
    pub spawn: SpawnConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Random,
            max_moves: 100_000,
            spawn: SpawnConfig::default(),
        }
    }
}

/// Final state of one simulated game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    /// Seed the engine was created with.
    pub seed: u64,
    /// Strategy that played.
    pub strategy: Strategy,
    /// Final score.
    pub score: u64,
    /// Board-changing moves made.
    pub moves: u32,
    /// Largest tile reached.
    pub max_tile: u32,
    /// Whether the winning tile was reached.
    pub won: bool,
    /// Whether the game ended with no legal move (false if `max_moves` hit).
    pub game_over: bool,
}

/// Play one game to completion.
#[must_use]
pub fn run_game(seed: u64, config: &SimulationConfig) -> GameSummary {
    let engine = play(seed, config);
    GameSummary::from_engine(seed, config.strategy, &engine)
}

/// Play one game and hand back the final engine.
#[must_use]
pub fn play(seed: u64, config: &SimulationConfig) -> Engine {
    let mut engine = Engine::with_config(seed, config.spawn);
    let mut picks = SmallRng::seed_from_u64(seed ^ POLICY_SEED_SALT);

    while !engine.is_game_over() && engine.moves() < config.max_moves {
        let Some(direction) = config.strategy.choose(&engine, &mut picks) else {
            break;
        };
        engine.make_move(direction);
    }

    debug!(
        seed,
        strategy = ?config.strategy,
        score = engine.score(),
        moves = engine.moves(),
        "simulated game finished"
    );
    engine
}

impl GameSummary {
    /// Summarize a finished engine.
    #[must_use]
    pub fn from_engine(seed: u64, strategy: Strategy, engine: &Engine) -> Self {
        Self {
            seed,
            strategy,
            score: engine.score(),
            moves: engine.moves(),
            max_tile: engine.max_tile(),
            won: engine.has_won(),
            game_over: engine.is_game_over(),
        }
    }
}

/// Play `games` games in parallel. Game `i` uses seed `base_seed + i`.
///
/// Results are returned in seed order.
#[must_use]
pub fn run_batch(base_seed: u64, games: u64, config: &SimulationConfig) -> Vec<GameSummary> {
    (0..games)
        .into_par_iter()
        .map(|i| run_game(base_seed.wrapping_add(i), config))
        .collect()
}
