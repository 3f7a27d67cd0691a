//! Error types for the engine boundary.

use std::fmt;

use crate::registry::Handle;

/// Rejections raised at the engine boundary.
///
/// Moves and queries on a live engine are total; these only arise from
/// malformed input coming across the host interface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineError {
    /// Handle does not name a live engine (destroyed, stale or foreign).
    InvalidHandle(Handle),
    /// Direction code outside the four-way encoding.
    InvalidDirection(i32),
    /// Spawn probability outside `[0, 1]` or not finite.
    InvalidProbability(f64),
    /// Seeded board holds a value that is neither empty nor a power of two.
    InvalidBoard {
        /// Row-major cell index.
        index: usize,
        /// The offending value.
        value: u32,
    },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidHandle(handle) => write!(f, "invalid engine handle: {handle}"),
            EngineError::InvalidDirection(code) => {
                write!(f, "invalid direction code: {code} (expected 0..=3)")
            }
            EngineError::InvalidProbability(p) => {
                write!(f, "spawn probability {p} is outside [0, 1]")
            }
            EngineError::InvalidBoard { index, value } => {
                write!(f, "cell {index} holds {value}, expected 0 or a power of two >= 2")
            }
        }
    }
}

impl std::error::Error for EngineError {}

/// Result type for boundary operations.
pub type EngineResult<T> = Result<T, EngineError>;
