//! The 4×4 grid and the slide/merge algorithm.

use std::fmt;

use crate::error::{EngineError, EngineResult};
use crate::game::Direction;

/// Side length of the grid.
pub const SIZE: usize = 4;

/// Number of cells on the grid.
pub const CELLS: usize = SIZE * SIZE;

/// Tile value that counts as a win. Reaching it changes nothing in the engine.
pub const WIN_TILE: u32 = 2048;

/// Largest tile accepted on a seeded board.
///
/// Sixteen tiles of this size cannot merge past `u32::MAX`.
pub const MAX_SEED_TILE: u32 = 1 << 20;

/// Result of sliding a line or a whole board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveOutcome {
    /// At least one cell holds a different value than before.
    pub changed: bool,
    /// Sum of merged tile values.
    pub score_gained: u64,
    /// Number of merge events.
    pub merges: u32,
}

impl MoveOutcome {
    fn absorb(&mut self, other: MoveOutcome) {
        self.changed |= other.changed;
        self.score_gained += other.score_gained;
        self.merges += other.merges;
    }
}

/// Slide one line toward index 0 and merge equal neighbours once.
///
/// Index 0 is the leading edge. A tile produced by a merge is never merged
/// again in the same call, so `[2, 2, 2, 2]` becomes `[4, 4, 0, 0]`.
#[must_use]
pub fn slide_line(line: [u32; SIZE]) -> ([u32; SIZE], MoveOutcome) {
    let mut out = [0u32; SIZE];
    let mut len = 0;
    let mut outcome = MoveOutcome::default();
    // last written tile came straight from the input, not from a merge
    let mut mergeable = false;

    for value in line.into_iter().filter(|&v| v != 0) {
        if mergeable && out[len - 1] == value {
            let merged = value * 2;
            out[len - 1] = merged;
            outcome.score_gained += u64::from(merged);
            outcome.merges += 1;
            mergeable = false;
        } else {
            out[len] = value;
            len += 1;
            mergeable = true;
        }
    }

    outcome.changed = out != line;
    (out, outcome)
}

/// Whether `value` can appear during play: empty, or a power of two >= 2.
///
/// Merges may grow a seeded tile past [`MAX_SEED_TILE`], so this has no cap.
#[must_use]
pub const fn is_tile_value(value: u32) -> bool {
    value == 0 || (value >= 2 && value.is_power_of_two())
}

/// Whether `value` may be seeded into a cell: a tile value no larger than `MAX_SEED_TILE`.
#[must_use]
pub const fn is_valid_cell(value: u32) -> bool {
    is_tile_value(value) && value <= MAX_SEED_TILE
}

/// A 4×4 grid. `0` marks an empty cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board {
    grid: [[u32; SIZE]; SIZE],
}

impl Board {
    /// An all-empty board.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            grid: [[0; SIZE]; SIZE],
        }
    }

    /// Build a board from rows, validating every cell.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidBoard`] for the first cell that is not
    /// 0 or a power of two in `2..=MAX_SEED_TILE`.
    pub fn from_rows(rows: [[u32; SIZE]; SIZE]) -> EngineResult<Self> {
        for (index, &value) in rows.iter().flatten().enumerate() {
            if !is_valid_cell(value) {
                return Err(EngineError::InvalidBoard { index, value });
            }
        }
        Ok(Self { grid: rows })
    }

    /// Build a board from 16 row-major cells.
    ///
    /// # Errors
    ///
    /// Same as [`Board::from_rows`].
    pub fn from_cells(cells: [u32; CELLS]) -> EngineResult<Self> {
        let mut rows = [[0; SIZE]; SIZE];
        for (i, value) in cells.into_iter().enumerate() {
            rows[i / SIZE][i % SIZE] = value;
        }
        Self::from_rows(rows)
    }

    /// The grid as rows.
    #[must_use]
    pub const fn rows(&self) -> [[u32; SIZE]; SIZE] {
        self.grid
    }

    /// The 16 cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> [u32; CELLS] {
        let mut cells = [0; CELLS];
        for (slot, &value) in cells.iter_mut().zip(self.grid.iter().flatten()) {
            *slot = value;
        }
        cells
    }

    /// Value at `(row, col)`. Out-of-range coordinates read as empty.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.grid
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(0)
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, value: u32) {
        self.grid[row][col] = value;
    }

    /// Coordinates of empty cells in row-major order.
    pub fn empty_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..SIZE)
            .flat_map(|row| (0..SIZE).map(move |col| (row, col)))
            .filter(|&(row, col)| self.grid[row][col] == 0)
    }

    /// Number of empty cells.
    #[must_use]
    pub fn empty_count(&self) -> usize {
        self.grid.iter().flatten().filter(|&&v| v == 0).count()
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn tile_count(&self) -> usize {
        CELLS - self.empty_count()
    }

    /// Largest tile on the board, 0 when empty.
    #[must_use]
    pub fn max_tile(&self) -> u32 {
        self.grid.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Whether some tile has reached [`WIN_TILE`].
    #[must_use]
    pub fn has_won(&self) -> bool {
        self.max_tile() >= WIN_TILE
    }

    /// Whether any direction can change the board.
    ///
    /// A board with an empty cell always has a move; a full board has one
    /// exactly when two orthogonal neighbours are equal.
    #[must_use]
    pub fn has_moves(&self) -> bool {
        for row in 0..SIZE {
            for col in 0..SIZE {
                let value = self.grid[row][col];
                if value == 0 {
                    return true;
                }
                if col + 1 < SIZE && self.grid[row][col + 1] == value {
                    return true;
                }
                if row + 1 < SIZE && self.grid[row + 1][col] == value {
                    return true;
                }
            }
        }
        false
    }

    /// Whether no move exists (terminal state).
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !self.has_moves()
    }

    /// Slide and merge every line toward `direction` without spawning.
    ///
    /// Pure: the same board and direction always give the same result.
    #[must_use]
    pub fn shifted(&self, direction: Direction) -> (Board, MoveOutcome) {
        let mut next = *self;
        let mut outcome = MoveOutcome::default();
        for lane in 0..SIZE {
            let (line, lane_outcome) = slide_line(self.line(direction, lane));
            next.set_line(direction, lane, line);
            outcome.absorb(lane_outcome);
        }
        (next, outcome)
    }

    /// Grid coordinate of the `k`-th cell of `lane`, counted from the leading edge.
    const fn coord(direction: Direction, lane: usize, k: usize) -> (usize, usize) {
        match direction {
            Direction::Left => (lane, k),
            Direction::Right => (lane, SIZE - 1 - k),
            Direction::Up => (k, lane),
            Direction::Down => (SIZE - 1 - k, lane),
        }
    }

    fn line(&self, direction: Direction, lane: usize) -> [u32; SIZE] {
        let mut line = [0; SIZE];
        for (k, slot) in line.iter_mut().enumerate() {
            let (row, col) = Self::coord(direction, lane, k);
            *slot = self.grid[row][col];
        }
        line
    }

    fn set_line(&mut self, direction: Direction, lane: usize, line: [u32; SIZE]) {
        for (k, value) in line.into_iter().enumerate() {
            let (row, col) = Self::coord(direction, lane, k);
            self.grid[row][col] = value;
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.grid.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for &value in row {
                if value == 0 {
                    write!(f, "{:>6}", ".")?;
                } else {
                    write!(f, "{value:>6}")?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(rows: [[u32; SIZE]; SIZE]) -> Board {
        Board::from_rows(rows).unwrap()
    }

    #[test]
    fn test_slide_line_compacts() {
        let (line, outcome) = slide_line([0, 2, 0, 4]);
        assert_eq!(line, [2, 4, 0, 0]);
        assert!(outcome.changed);
        assert_eq!(outcome.merges, 0);
        assert_eq!(outcome.score_gained, 0);
    }

    #[test]
    fn test_slide_line_no_chain_merge() {
        let (line, outcome) = slide_line([2, 2, 2, 2]);
        assert_eq!(line, [4, 4, 0, 0]);
        assert_eq!(outcome.merges, 2);
        assert_eq!(outcome.score_gained, 8);
    }

    #[test]
    fn test_slide_line_merge_from_leading_edge() {
        let (line, _) = slide_line([2, 2, 2, 0]);
        assert_eq!(line, [4, 2, 0, 0]);

        let (line, outcome) = slide_line([4, 4, 8, 0]);
        assert_eq!(line, [8, 8, 0, 0]);
        assert_eq!(outcome.merges, 1);
    }

    #[test]
    fn test_slide_line_unchanged() {
        let (line, outcome) = slide_line([2, 4, 8, 16]);
        assert_eq!(line, [2, 4, 8, 16]);
        assert!(!outcome.changed);
    }

    #[test]
    fn test_shift_left() {
        let start = board([[2, 2, 0, 0], [2, 0, 2, 0], [4, 4, 4, 4], [0, 0, 0, 2]]);
        let (next, outcome) = start.shifted(Direction::Left);
        assert_eq!(
            next.rows(),
            [[4, 0, 0, 0], [4, 0, 0, 0], [8, 8, 0, 0], [2, 0, 0, 0]]
        );
        assert_eq!(outcome.score_gained, 24);
        assert_eq!(outcome.merges, 4);
    }

    #[test]
    fn test_shift_right() {
        let start = board([[2, 2, 0, 0], [2, 0, 2, 0], [4, 4, 4, 4], [0, 0, 0, 2]]);
        let (next, _) = start.shifted(Direction::Right);
        assert_eq!(
            next.rows(),
            [[0, 0, 0, 4], [0, 0, 0, 4], [0, 0, 8, 8], [0, 0, 0, 2]]
        );
    }

    #[test]
    fn test_shift_vertical() {
        let start = board([[2, 0, 0, 0], [2, 0, 0, 0], [4, 0, 0, 0], [0, 0, 0, 8]]);
        let (up, _) = start.shifted(Direction::Up);
        assert_eq!(up.rows()[0], [4, 0, 0, 8]);
        assert_eq!(up.rows()[1], [4, 0, 0, 0]);

        let (down, _) = start.shifted(Direction::Down);
        assert_eq!(down.rows()[3], [4, 0, 0, 8]);
        assert_eq!(down.rows()[2], [4, 0, 0, 0]);
    }

    #[test]
    fn test_terminal_detection() {
        let full = board([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        assert!(full.is_terminal());

        let pair = board([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 4]]);
        assert!(!pair.is_terminal());

        let vertical = board([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [2, 8, 16, 32]]);
        assert!(!vertical.is_terminal());

        assert!(!Board::empty().is_terminal());
    }

    #[test]
    fn test_cells_row_major() {
        let b = board([[2, 0, 0, 0], [0, 4, 0, 0], [0, 0, 8, 0], [0, 0, 0, 16]]);
        let cells = b.cells();
        assert_eq!(cells[0], 2);
        assert_eq!(cells[5], 4);
        assert_eq!(cells[10], 8);
        assert_eq!(cells[15], 16);
        assert_eq!(Board::from_cells(cells).unwrap(), b);
    }

    #[test]
    fn test_rejects_invalid_cells() {
        let mut cells = [0; CELLS];
        cells[6] = 3;
        assert_eq!(
            Board::from_cells(cells),
            Err(EngineError::InvalidBoard { index: 6, value: 3 })
        );

        cells[6] = 1;
        assert!(Board::from_cells(cells).is_err());

        cells[6] = MAX_SEED_TILE * 2;
        assert!(Board::from_cells(cells).is_err());
    }

    #[test]
    fn test_tile_value_has_no_seed_cap() {
        assert!(is_tile_value(MAX_SEED_TILE * 2));
        assert!(!is_valid_cell(MAX_SEED_TILE * 2));
        assert!(is_tile_value(0));
        assert!(!is_tile_value(1));
        assert!(!is_tile_value(6));
    }

    #[test]
    fn test_counts_and_win() {
        let b = board([[2048, 0, 0, 0], [0, 4, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
        assert_eq!(b.tile_count(), 2);
        assert_eq!(b.empty_count(), 14);
        assert_eq!(b.max_tile(), 2048);
        assert!(b.has_won());
        assert_eq!(b.empty_cells().next(), Some((0, 1)));
    }

    #[test]
    fn test_display() {
        let b = board([[2, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 1024]]);
        let text = b.to_string();
        assert_eq!(text.lines().count(), 4);
        assert!(text.starts_with("     2"));
        assert!(text.ends_with("  1024"));
    }
}
