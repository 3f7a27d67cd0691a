//! Move directions and their boundary encodings.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{EngineError, EngineResult};

/// The four directions a move can push tiles toward.
///
/// Integer codes exist only for host boundaries: `0 = Up`, `1 = Down`,
/// `2 = Left`, `3 = Right`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Tiles travel toward row 0.
    Up,
    /// Tiles travel toward row 3.
    Down,
    /// Tiles travel toward column 0.
    Left,
    /// Tiles travel toward column 3.
    Right,
}

impl Direction {
    /// All directions in code order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Decode a boundary integer.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidDirection`] for codes outside `0..=3`.
    pub fn from_code(code: i32) -> EngineResult<Self> {
        match code {
            0 => Ok(Direction::Up),
            1 => Ok(Direction::Down),
            2 => Ok(Direction::Left),
            3 => Ok(Direction::Right),
            _ => Err(EngineError::InvalidDirection(code)),
        }
    }

    /// Boundary integer for this direction.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }

    /// Lower-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl TryFrom<i32> for Direction {
    type Error = EngineError;

    fn try_from(code: i32) -> EngineResult<Self> {
        Self::from_code(code)
    }
}

impl FromStr for Direction {
    type Err = EngineError;

    /// Parses `up`, `down`, `left` or `right` in any case.
    ///
    /// Unknown names are rejected as [`EngineError::InvalidDirection`]
    /// with code `-1`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s.trim()))
            .ok_or(EngineError::InvalidDirection(-1))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for dir in Direction::ALL {
            assert_eq!(Direction::from_code(dir.code()), Ok(dir));
        }
    }

    #[test]
    fn test_invalid_code_rejected() {
        assert_eq!(Direction::from_code(4), Err(EngineError::InvalidDirection(4)));
        assert_eq!(Direction::try_from(-3), Err(EngineError::InvalidDirection(-3)));
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("UP".parse::<Direction>(), Ok(Direction::Up));
        assert_eq!("Left".parse::<Direction>(), Ok(Direction::Left));
        assert_eq!(" right ".parse::<Direction>(), Ok(Direction::Right));
        assert!("diagonal".parse::<Direction>().is_err());
    }
}
