//! Ownership invariants for the stones a step adds.

use super::{BoardTransition, Invariant};
use crate::types::Square;

/// Invariant: the required placement is present with the right symbol.
pub struct PlacedStoneInvariant;

impl Invariant<BoardTransition<'_>> for PlacedStoneInvariant {
    fn holds(t: &BoardTransition<'_>) -> bool {
        match t.placed {
            None => true,
            Some((cell, symbol)) => t.after.get(cell) == Square::Occupied(symbol),
        }
    }

    fn description() -> &'static str {
        "The submitted cell holds the mover's symbol"
    }
}

/// Invariant: every other added stone belongs to the expected symbol.
pub struct AddedByInvariant;

impl Invariant<BoardTransition<'_>> for AddedByInvariant {
    fn holds(t: &BoardTransition<'_>) -> bool {
        match t.added_by {
            None => true,
            Some(symbol) => t
                .other_added()
                .all(|cell| t.after.get(cell) == Square::Occupied(symbol)),
        }
    }

    fn description() -> &'static str {
        "Reply stones belong to the opponent"
    }
}
