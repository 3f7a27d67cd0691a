//! Engine invariants - sanity checks that detect bugs.
//!
//! These should never trigger for any engine reachable through the public
//! API. If they do, the move or spawn logic is broken.

use crate::game::{is_tile_value, Engine};

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all engine invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(engine: &Engine) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let board = engine.board();

    for (index, value) in board.cells().into_iter().enumerate() {
        if !is_tile_value(value) {
            violations.push(InvariantViolation {
                message: format!("cell {index} holds {value}, not a power of two >= 2"),
            });
        }
    }

    let terminal = board.is_terminal();
    if engine.is_game_over() != terminal {
        violations.push(InvariantViolation {
            message: format!(
                "game-over flag is {} but a fresh scan says {terminal}",
                engine.is_game_over()
            ),
        });
    }

    violations
}

/// Assert all engine invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(engine: &Engine) {
    let violations = check_invariants(engine);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Engine invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_engine: &Engine) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Board, Direction, MAX_SEED_TILE};

    #[test]
    fn test_fresh_engine_passes() {
        let engine = Engine::new(11);
        assert!(check_invariants(&engine).is_empty());
    }

    #[test]
    fn test_long_game_passes() {
        let mut engine = Engine::new(2024);
        let mut i = 0usize;
        while !engine.is_game_over() && i < 10_000 {
            engine.make_move(Direction::ALL[i % 4]);
            assert!(check_invariants(&engine).is_empty());
            i += 1;
        }
    }

    #[test]
    fn test_seeded_terminal_board_passes() {
        let board = Board::from_rows([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]).unwrap();
        let engine = Engine::from_board(board, 100, 0);
        assert!(engine.is_game_over());
        assert!(check_invariants(&engine).is_empty());
    }

    #[test]
    fn test_merge_past_seed_cap_passes() {
        let board = Board::from_rows([[MAX_SEED_TILE, MAX_SEED_TILE, 0, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
        let mut engine = Engine::from_board(board, 0, 5);
        assert!(engine.make_move(Direction::Left));
        assert_eq!(engine.max_tile(), MAX_SEED_TILE * 2);
        assert!(check_invariants(&engine).is_empty());
    }
}
