//! Stone count invariant: a step adds a bounded number of stones.

use super::{BoardTransition, Invariant};

/// Invariant: the number of newly occupied squares is within the step's range.
pub struct StoneCountInvariant;

impl Invariant<BoardTransition<'_>> for StoneCountInvariant {
    fn holds(t: &BoardTransition<'_>) -> bool {
        t.after.occupied() >= t.before.occupied()
            && t.added.contains(&t.before.added_in(t.after).len())
    }

    fn description() -> &'static str {
        "Each step adds the expected number of stones"
    }
}
