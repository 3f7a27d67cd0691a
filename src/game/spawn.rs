//! Tile spawn policy.

use rand::Rng;

use crate::error::{EngineError, EngineResult};
use crate::game::Board;

/// Spawn configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnConfig {
    /// Probability that a spawned tile is a 4 rather than a 2.
    pub four_probability: f64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            four_probability: 0.1,
        }
    }
}

impl SpawnConfig {
    /// Create a config with the given probability of spawning a 4.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidProbability`] unless `0 <= p <= 1`.
    pub fn new(four_probability: f64) -> EngineResult<Self> {
        if !(0.0..=1.0).contains(&four_probability) {
            return Err(EngineError::InvalidProbability(four_probability));
        }
        Ok(Self { four_probability })
    }
}

/// Place one tile on a uniformly chosen empty cell.
///
/// Returns the `(row, col, value)` placed, or `None` on a full board.
pub fn spawn_tile<R: Rng>(
    board: &mut Board,
    rng: &mut R,
    config: &SpawnConfig,
) -> Option<(usize, usize, u32)> {
    let empty = board.empty_count();
    if empty == 0 {
        return None;
    }
    let (row, col) = board.empty_cells().nth(rng.gen_range(0..empty))?;
    // total for any probability, including NaN
    let value = if rng.r#gen::<f64>() < config.four_probability { 4 } else { 2 };
    board.set(row, col, value);
    Some((row, col, value))
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn test_rejects_bad_probability() {
        assert!(SpawnConfig::new(1.5).is_err());
        assert!(SpawnConfig::new(-0.1).is_err());
        assert!(SpawnConfig::new(f64::NAN).is_err());
        assert!(SpawnConfig::new(0.0).is_ok());
        assert!(SpawnConfig::new(1.0).is_ok());
    }

    #[test]
    fn test_spawn_fills_empty_cell() {
        let mut board = Board::empty();
        let mut rng = SmallRng::seed_from_u64(3);
        let (row, col, value) = spawn_tile(&mut board, &mut rng, &SpawnConfig::default()).unwrap();
        assert_eq!(board.get(row, col), value);
        assert!(value == 2 || value == 4);
        assert_eq!(board.tile_count(), 1);
    }

    #[test]
    fn test_spawn_full_board_is_noop() {
        let mut board = Board::from_cells([2; 16]).unwrap();
        let before = board;
        let mut rng = SmallRng::seed_from_u64(3);
        assert_eq!(spawn_tile(&mut board, &mut rng, &SpawnConfig::default()), None);
        assert_eq!(board, before);
    }

    #[test]
    fn test_spawn_value_follows_probability() {
        let mut rng = SmallRng::seed_from_u64(99);
        let always_four = SpawnConfig::new(1.0).unwrap();
        let never_four = SpawnConfig::new(0.0).unwrap();
        for _ in 0..50 {
            let mut board = Board::empty();
            let (_, _, value) = spawn_tile(&mut board, &mut rng, &always_four).unwrap();
            assert_eq!(value, 4);
            let mut board = Board::empty();
            let (_, _, value) = spawn_tile(&mut board, &mut rng, &never_four).unwrap();
            assert_eq!(value, 2);
        }
    }

    #[test]
    fn test_spawn_distribution_roughly_ninety_ten() {
        let mut rng = SmallRng::seed_from_u64(12345);
        let config = SpawnConfig::default();
        let mut fours = 0;
        for _ in 0..10_000 {
            let mut board = Board::empty();
            if let Some((_, _, 4)) = spawn_tile(&mut board, &mut rng, &config) {
                fours += 1;
            }
        }
        assert!((700..1300).contains(&fours), "fours = {fours}");
    }

    #[test]
    fn test_spawn_reaches_every_cell() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut seen = [false; 16];
        for _ in 0..2000 {
            let mut board = Board::empty();
            let (row, col, _) = spawn_tile(&mut board, &mut rng, &SpawnConfig::default()).unwrap();
            seen[row * 4 + col] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
