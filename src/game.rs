//! Game layer for Quadmerge.
//!
//! Implements the puzzle rules:
//! - 4×4 board with power-of-two tiles
//! - Slide and single-merge per move
//! - Seeded tile spawns (2 or 4)
//! - Terminal-state detection

mod board;
mod direction;
mod engine;
mod invariants;
mod spawn;

pub use board::{
    is_tile_value, is_valid_cell, slide_line, Board, MoveOutcome, CELLS, MAX_SEED_TILE, SIZE,
    WIN_TILE,
};
pub use direction::Direction;
pub use engine::{Engine, INITIAL_TILES};
pub use invariants::{assert_invariants, check_invariants, InvariantViolation};
pub use spawn::{spawn_tile, SpawnConfig};
