#![no_main]

//! Move sequence fuzzer.
//!
//! Seeds an arbitrary board, then applies an arbitrary move sequence:
//! 1. Decode raw direction codes (invalid codes must be rejected, not applied)
//! 2. Apply the move and compare against the pure shift
//! 3. Check score, tile count and game-over laws after every step
//! 4. Run the invariant checker

use arbitrary::Arbitrary;
use quadmerge::game::{check_invariants, Board, Direction, Engine, CELLS};
use libfuzzer_sys::fuzz_target;

/// Structured input for move fuzzing.
#[derive(Arbitrary, Debug)]
struct MovesInput {
    /// Tile exponents per cell; 0 is empty, otherwise the tile is 2^e.
    exponents: [u8; CELLS],
    /// RNG seed for spawns.
    seed: u64,
    /// Raw direction codes.
    codes: Vec<i8>,
}

fuzz_target!(|input: MovesInput| {
    let mut cells = [0u32; CELLS];
    for (cell, exp) in cells.iter_mut().zip(input.exponents) {
        // keep seeded tiles between 2 and 2048
        let exp = exp % 12;
        *cell = if exp == 0 { 0 } else { 1 << exp };
    }
    let Ok(board) = Board::from_cells(cells) else {
        panic!("generated board rejected: {cells:?}");
    };

    let mut engine = Engine::from_board(board, 0, input.seed);

    for code in input.codes.into_iter().take(500) {
        let Ok(direction) = Direction::from_code(i32::from(code)) else {
            assert!(!(0..4).contains(&code), "valid code {code} rejected");
            continue;
        };

        let before = engine.clone();
        let (shifted, expected) = before.board().shifted(direction);
        let outcome = engine.apply(direction);
        assert_eq!(outcome, expected);

        if outcome.changed {
            assert_eq!(engine.score(), before.score() + outcome.score_gained);
            assert_eq!(engine.board().tile_count(), shifted.tile_count() + 1);
        } else {
            assert_eq!(engine, before);
        }

        let violations = check_invariants(&engine);
        assert!(violations.is_empty(), "{violations:?}");
    }
});
