//! The board engine: one grid, one score, one derived game-over flag.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, trace};

use crate::game::{assert_invariants, spawn_tile, Board, Direction, MoveOutcome, SpawnConfig, CELLS};

/// Number of tiles placed on a fresh board.
pub const INITIAL_TILES: usize = 2;

/// A single 4×4 puzzle instance.
///
/// Mutated only through [`Engine::make_move`]. Dropping the engine releases it.
#[derive(Debug, Clone, PartialEq)]
pub struct Engine {
    board: Board,
    score: u64,
    game_over: bool,
    moves: u32,
    rng: SmallRng,
    spawn: SpawnConfig,
}

impl Engine {
    /// Create an engine with the default spawn policy.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, SpawnConfig::default())
    }

    /// Create an engine: empty grid, score 0, then two spawned tiles.
    #[must_use]
    pub fn with_config(seed: u64, spawn: SpawnConfig) -> Self {
        let mut engine = Self {
            board: Board::empty(),
            score: 0,
            game_over: false,
            moves: 0,
            rng: SmallRng::seed_from_u64(seed),
            spawn,
        };
        for _ in 0..INITIAL_TILES {
            spawn_tile(&mut engine.board, &mut engine.rng, &engine.spawn);
        }
        engine.refresh_game_over();
        debug!(seed, cells = ?engine.board.cells(), "engine created");
        engine
    }

    /// Create an engine on an existing position. No tiles are spawned.
    #[must_use]
    pub fn from_board(board: Board, score: u64, seed: u64) -> Self {
        Self::from_board_with_config(board, score, seed, SpawnConfig::default())
    }

    /// Like [`Engine::from_board`], with later spawns following `spawn`.
    #[must_use]
    pub fn from_board_with_config(board: Board, score: u64, seed: u64, spawn: SpawnConfig) -> Self {
        let mut engine = Self {
            board,
            score,
            game_over: false,
            moves: 0,
            rng: SmallRng::seed_from_u64(seed),
            spawn,
        };
        engine.refresh_game_over();
        engine
    }

    /// Apply a move. Returns whether the board changed.
    ///
    /// An unchanged board leaves score and RNG untouched and spawns nothing.
    /// A changed board adds the merge score, spawns one tile and recomputes
    /// the game-over flag.
    pub fn make_move(&mut self, direction: Direction) -> bool {
        self.apply(direction).changed
    }

    /// Spawn policy for tiles placed after each move.
    #[must_use]
    pub const fn spawn_config(&self) -> SpawnConfig {
        self.spawn
    }

    /// Same as [`Engine::make_move`] but reports the full outcome.
    pub fn apply(&mut self, direction: Direction) -> MoveOutcome {
        let (next, outcome) = self.board.shifted(direction);
        if !outcome.changed {
            trace!(%direction, "no-op move");
            return outcome;
        }

        self.board = next;
        self.score += outcome.score_gained;
        self.moves += 1;
        spawn_tile(&mut self.board, &mut self.rng, &self.spawn);
        self.refresh_game_over();

        trace!(
            %direction,
            gained = outcome.score_gained,
            merges = outcome.merges,
            score = self.score,
            "move applied"
        );
        if self.game_over {
            debug!(score = self.score, moves = self.moves, max_tile = self.board.max_tile(), "game over");
        }
        assert_invariants(self);
        outcome
    }

    /// Preview a move without mutating the engine or drawing from the RNG.
    #[must_use]
    pub fn preview(&self, direction: Direction) -> (Board, MoveOutcome) {
        self.board.shifted(direction)
    }

    fn refresh_game_over(&mut self) {
        self.game_over = self.board.is_terminal();
    }

    /// The current grid.
    #[must_use]
    pub const fn board(&self) -> Board {
        self.board
    }

    /// The 16 cells in row-major order, 0 for empty.
    #[must_use]
    pub fn cells(&self) -> [u32; CELLS] {
        self.board.cells()
    }

    /// Accumulated merge score.
    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Whether no move can change the board.
    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Number of moves that changed the board.
    #[must_use]
    pub const fn moves(&self) -> u32 {
        self.moves
    }

    /// Largest tile on the board.
    #[must_use]
    pub fn max_tile(&self) -> u32 {
        self.board.max_tile()
    }

    /// Whether a winning tile is on the board. Play continues regardless.
    #[must_use]
    pub fn has_won(&self) -> bool {
        self.board.has_won()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{check_invariants, MAX_SEED_TILE};

    fn seeded(rows: [[u32; 4]; 4]) -> Engine {
        Engine::from_board(Board::from_rows(rows).unwrap(), 0, 1)
    }

    #[test]
    fn test_new_engine() {
        let engine = Engine::new(42);
        let cells = engine.cells();
        let tiles: Vec<_> = cells.iter().filter(|&&v| v != 0).collect();
        assert_eq!(tiles.len(), 2);
        assert!(tiles.iter().all(|&&v| v == 2 || v == 4));
        assert_eq!(engine.score(), 0);
        assert!(!engine.is_game_over());
        assert_eq!(engine.moves(), 0);
    }

    #[test]
    fn test_same_seed_same_game() {
        let mut a = Engine::new(7);
        let mut b = Engine::new(7);
        for dir in [Direction::Left, Direction::Up, Direction::Right, Direction::Down].repeat(10) {
            assert_eq!(a.make_move(dir), b.make_move(dir));
        }
        assert_eq!(a, b);
    }

    #[test]
    fn test_merge_scores_and_spawns() {
        let mut engine = seeded([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        assert!(engine.make_move(Direction::Left));
        assert_eq!(engine.board().get(0, 0), 4);
        assert_eq!(engine.score(), 4);
        assert_eq!(engine.board().tile_count(), 2);
        assert_eq!(engine.moves(), 1);
    }

    #[test]
    fn test_noop_move_changes_nothing() {
        let mut engine = seeded([[2, 4, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let before = engine.clone();
        assert!(!engine.make_move(Direction::Left));
        assert!(!engine.make_move(Direction::Up));
        assert_eq!(engine, before);
    }

    #[test]
    fn test_game_over_on_seeded_board() {
        let engine = seeded([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        assert!(engine.is_game_over());

        let engine = seeded([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 4]]);
        assert!(!engine.is_game_over());
    }

    #[test]
    fn test_moves_rejected_after_game_over() {
        let mut engine = seeded([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        for dir in Direction::ALL {
            assert!(!engine.make_move(dir));
        }
        assert_eq!(engine.score(), 0);
    }

    #[test]
    fn test_full_board_merge_then_spawn() {
        let mut engine = seeded([[2, 2, 4, 8], [4, 8, 16, 32], [8, 16, 32, 64], [16, 32, 64, 128]]);
        assert!(engine.make_move(Direction::Left));
        // one merge freed one cell, the spawn refilled it
        assert_eq!(engine.board().tile_count(), 16);
        assert_eq!(engine.board().rows()[0][..3], [4, 4, 8]);
        assert_eq!(engine.score(), 4);
    }

    #[test]
    fn test_win_does_not_stop_play() {
        let mut engine = seeded([[1024, 1024, 0, 0], [0; 4], [0; 4], [0; 4]]);
        assert!(!engine.has_won());
        assert!(engine.make_move(Direction::Left));
        assert!(engine.has_won());
        assert_eq!(engine.max_tile(), 2048);
        assert!(engine.make_move(Direction::Right));
    }

    #[test]
    fn test_merge_past_seed_cap() {
        let mut engine = seeded([[MAX_SEED_TILE, MAX_SEED_TILE, 0, 0], [0; 4], [0; 4], [0; 4]]);
        assert!(engine.make_move(Direction::Left));
        assert_eq!(engine.board().get(0, 0), MAX_SEED_TILE * 2);
        assert_eq!(engine.score(), u64::from(MAX_SEED_TILE) * 2);
        assert!(check_invariants(&engine).is_empty());
        // the merged tile keeps sliding
        assert!(engine.make_move(Direction::Right));
        assert!(engine.cells().contains(&(MAX_SEED_TILE * 2)));
    }

    #[test]
    fn test_seeded_board_keeps_spawn_config() {
        let board = Board::from_rows([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
        let always_four = SpawnConfig::new(1.0).unwrap();
        let mut engine = Engine::from_board_with_config(board, 0, 9, always_four);
        assert_eq!(engine.spawn_config(), always_four);
        assert!(engine.make_move(Direction::Right));
        assert!(engine.cells().contains(&4));
    }

    #[test]
    fn test_preview_is_pure() {
        let engine = seeded([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let (board, outcome) = engine.preview(Direction::Right);
        assert_eq!(board.get(0, 3), 4);
        assert_eq!(outcome.score_gained, 4);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.board().get(0, 0), 2);
    }
}
