//! Handle-addressed engine instances.
//!
//! The registry is the create/move/query/destroy contract a host sees:
//! - `create` returns an opaque [`Handle`]
//! - every other call takes the handle and fails fast if it is stale
//! - `destroy` releases the instance; skipping it keeps the engine alive
//!   until the registry itself is dropped
//!
//! Handles carry a generation so a slot reused after `destroy` never
//! answers to an old handle.

use std::fmt;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::game::{Board, Direction, Engine, SpawnConfig, CELLS};

/// Opaque reference to an engine inside an [`EngineRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    index: u32,
    generation: u32,
}

impl Handle {
    /// Pack into a single integer for host boundaries.
    #[must_use]
    pub const fn to_raw(self) -> u64 {
        ((self.generation as u64) << 32) | self.index as u64
    }

    /// Unpack a value produced by [`Handle::to_raw`].
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_raw(raw: u64) -> Self {
        Self {
            index: raw as u32,
            generation: (raw >> 32) as u32,
        }
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    engine: Option<Engine>,
}

/// Arena of independent engines.
///
/// Not synchronised: a host calling from several threads must wrap the
/// registry (or each engine) in its own lock.
#[derive(Debug)]
pub struct EngineRegistry {
    slots: Vec<Slot>,
    free: Vec<u32>,
    seeds: SmallRng,
    spawn: SpawnConfig,
    live: usize,
}

impl EngineRegistry {
    /// Create an empty registry. Engine seeds are drawn from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, SpawnConfig::default())
    }

    /// Create an empty registry whose engines use `spawn`.
    #[must_use]
    pub fn with_config(seed: u64, spawn: SpawnConfig) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            seeds: SmallRng::seed_from_u64(seed),
            spawn,
            live: 0,
        }
    }

    /// Create a fresh engine and return its handle.
    pub fn create(&mut self) -> Handle {
        let engine = Engine::with_config(self.seeds.r#gen(), self.spawn);
        self.insert(engine)
    }

    /// Register an engine on an existing position, spawning with this registry's config.
    pub fn create_from_board(&mut self, board: Board, score: u64) -> Handle {
        let engine = Engine::from_board_with_config(board, score, self.seeds.r#gen(), self.spawn);
        self.insert(engine)
    }

    /// Take ownership of an existing engine and return its handle.
    ///
    /// The engine keeps its own spawn config.
    pub fn insert(&mut self, engine: Engine) -> Handle {
        let handle = if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.engine = Some(engine);
            Handle {
                index,
                generation: slot.generation,
            }
        } else {
            #[allow(clippy::cast_possible_truncation)]
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                engine: Some(engine),
            });
            Handle {
                index,
                generation: 0,
            }
        };
        self.live += 1;
        debug!(%handle, live = self.live, "engine registered");
        handle
    }

    /// Release an engine.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidHandle`] if the handle is not live,
    /// including a second destroy of the same handle.
    pub fn destroy(&mut self, handle: Handle) -> EngineResult<Engine> {
        let slot = self
            .slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation && slot.engine.is_some())
            .ok_or_else(|| reject(handle))?;
        let engine = slot.engine.take().ok_or_else(|| reject(handle))?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.live -= 1;
        debug!(%handle, live = self.live, "engine destroyed");
        Ok(engine)
    }

    /// Borrow a live engine.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidHandle`] if the handle is not live.
    pub fn get(&self, handle: Handle) -> EngineResult<&Engine> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.engine.as_ref())
            .ok_or_else(|| reject(handle))
    }

    fn get_mut(&mut self, handle: Handle) -> EngineResult<&mut Engine> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.engine.as_mut())
            .ok_or_else(|| reject(handle))
    }

    /// Apply a move. Returns whether the board changed.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidHandle`] if the handle is not live.
    pub fn make_move(&mut self, handle: Handle, direction: Direction) -> EngineResult<bool> {
        Ok(self.get_mut(handle)?.make_move(direction))
    }

    /// Apply a move given as a boundary integer (`0..=3`).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidHandle`] for a stale handle and
    /// [`EngineError::InvalidDirection`] for an unknown code. Neither
    /// changes any state.
    pub fn make_move_code(&mut self, handle: Handle, code: i32) -> EngineResult<bool> {
        let engine = self.get_mut(handle)?;
        let direction = Direction::from_code(code)?;
        Ok(engine.make_move(direction))
    }

    /// Row-major cells, 0 for empty.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidHandle`] if the handle is not live.
    pub fn cells(&self, handle: Handle) -> EngineResult<[u32; CELLS]> {
        Ok(self.get(handle)?.cells())
    }

    /// Current score.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidHandle`] if the handle is not live.
    pub fn score(&self, handle: Handle) -> EngineResult<u64> {
        Ok(self.get(handle)?.score())
    }

    /// Current game-over flag.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidHandle`] if the handle is not live.
    pub fn is_game_over(&self, handle: Handle) -> EngineResult<bool> {
        Ok(self.get(handle)?.is_game_over())
    }

    /// Number of live engines.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.live
    }

    /// Whether no engine is live.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.live == 0
    }
}

fn reject(handle: Handle) -> EngineError {
    debug!(%handle, "rejected handle");
    EngineError::InvalidHandle(handle)
}
