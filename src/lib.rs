// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Quadmerge: a deterministic 4×4 tile-merging puzzle engine.
//!
//! One [`Engine`] owns a grid, a score and a derived game-over flag. Hosts
//! drive it through a narrow contract: create, move, query, destroy.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Simulation harness (rayon)        │
//! ├─────────────────────────────────────┤
//! │   Handle registry (host contract)   │
//! ├─────────────────────────────────────┤
//! │   Engine: board, spawn, game over   │
//! └─────────────────────────────────────┘
//! ```
//!
//! ```
//! use quadmerge::{Direction, Engine};
//!
//! let mut engine = Engine::new(42);
//! if engine.make_move(Direction::Left) {
//!     // a changed move always spawns a tile
//!     assert!(engine.board().tile_count() >= 2);
//! }
//! assert!(!engine.is_game_over());
//! ```

pub mod error;
pub mod game;
pub mod registry;
pub mod simulate;

pub use error::{EngineError, EngineResult};

// Re-export key game types at crate root for convenience
pub use game::{Board, Direction, Engine, MoveOutcome, SpawnConfig};
pub use registry::{EngineRegistry, Handle};
pub use simulate::{run_batch, run_game, GameSummary, SimulationConfig, Strategy};
