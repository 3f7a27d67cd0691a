#![no_main]

//! Handle registry fuzzer.
//!
//! Interleaves create, move, query and destroy calls with arbitrary raw
//! handles. Stale and foreign handles must be rejected without panicking,
//! and live counts must track create/destroy exactly.

use arbitrary::Arbitrary;
use quadmerge::{EngineRegistry, Handle};
use libfuzzer_sys::fuzz_target;

/// A fuzzer-generated registry call.
#[derive(Arbitrary, Debug, Clone)]
enum Call {
    /// Create a new engine.
    Create,
    /// Move on a previously issued handle.
    Move { pick: u8, code: i32 },
    /// Query a previously issued handle.
    Query { pick: u8 },
    /// Destroy a previously issued handle.
    Destroy { pick: u8 },
    /// Use a made-up raw handle.
    Forged { raw: u64, code: i32 },
}

#[derive(Arbitrary, Debug)]
struct RegistryInput {
    seed: u64,
    calls: Vec<Call>,
}

fuzz_target!(|input: RegistryInput| {
    let mut registry = EngineRegistry::new(input.seed);
    let mut issued: Vec<(Handle, bool)> = Vec::new();

    for call in input.calls.into_iter().take(200) {
        match call {
            Call::Create => {
                issued.push((registry.create(), true));
            }
            Call::Move { pick, code } => {
                if let Some(&(handle, live)) = issued.get(pick as usize % issued.len().max(1)) {
                    let result = registry.make_move_code(handle, code);
                    assert_eq!(result.is_ok(), live && (0..4).contains(&code));
                }
            }
            Call::Query { pick } => {
                if let Some(&(handle, live)) = issued.get(pick as usize % issued.len().max(1)) {
                    assert_eq!(registry.cells(handle).is_ok(), live);
                    assert_eq!(registry.score(handle).is_ok(), live);
                    assert_eq!(registry.is_game_over(handle).is_ok(), live);
                }
            }
            Call::Destroy { pick } => {
                let idx = pick as usize % issued.len().max(1);
                if let Some(entry) = issued.get_mut(idx) {
                    assert_eq!(registry.destroy(entry.0).is_ok(), entry.1);
                    entry.1 = false;
                }
            }
            Call::Forged { raw, code } => {
                let handle = Handle::from_raw(raw);
                let live = issued.iter().any(|&(h, live)| live && h == handle);
                assert_eq!(registry.make_move_code(handle, code).is_ok(), live && (0..4).contains(&code));
            }
        }

        let live = issued.iter().filter(|(_, live)| *live).count();
        assert_eq!(registry.len(), live);
    }
});
