//! Monotonic board invariant: squares never change once set.

use super::{BoardTransition, Invariant};
use crate::types::Cell;

/// Invariant: an occupied square keeps its symbol.
///
/// Within one session a stone is never removed or recoloured, so every
/// square occupied before the step must read the same afterwards.
pub struct MonotonicBoardInvariant;

impl Invariant<BoardTransition<'_>> for MonotonicBoardInvariant {
    fn holds(t: &BoardTransition<'_>) -> bool {
        Cell::all()
            .filter(|cell| !t.before.is_empty(*cell))
            .all(|cell| t.before.get(cell) == t.after.get(cell))
    }

    fn description() -> &'static str {
        "Board squares are monotonic (never cleared or overwritten)"
    }
}
