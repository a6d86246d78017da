//! Invariants checked when a server-reported board replaces the local one.
//!
//! The server is authoritative, but a response that rewrites history
//! (clears a stone, flips its owner, adds too many stones) means the two
//! views have diverged. These checks run before a response is applied so a
//! bad payload is refused rather than half-applied.

mod monotonic_board;
mod placed_stone;
mod stone_count;

pub use monotonic_board::MonotonicBoardInvariant;
pub use placed_stone::{AddedByInvariant, PlacedStoneInvariant};
pub use stone_count::StoneCountInvariant;

use crate::types::{Board, Cell, Symbol};
use std::ops::RangeInclusive;

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("{description}")]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

macro_rules! impl_invariant_set {
    ($($inv:ident),+) => {
        impl<S, $($inv),+> InvariantSet<S> for ($($inv,)+)
        where
            $($inv: Invariant<S>),+
        {
            fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
                let mut violations = Vec::new();
                $(
                    if !$inv::holds(state) {
                        violations.push(InvariantViolation::new($inv::description()));
                    }
                )+
                if violations.is_empty() {
                    Ok(())
                } else {
                    Err(violations)
                }
            }
        }
    };
}

impl_invariant_set!(I1, I2);
impl_invariant_set!(I1, I2, I3);
impl_invariant_set!(I1, I2, I3, I4);

/// A proposed replacement of one board by a newer server board.
#[derive(Debug, Clone)]
pub struct BoardTransition<'a> {
    /// Board the client currently mirrors.
    pub before: &'a Board,
    /// Board the server just reported.
    pub after: &'a Board,
    /// How many stones the step may add.
    pub added: RangeInclusive<usize>,
    /// A stone the step must have placed.
    pub placed: Option<(Cell, Symbol)>,
    /// When set, every added stone other than `placed` belongs to this symbol.
    pub added_by: Option<Symbol>,
}

impl<'a> BoardTransition<'a> {
    /// A human move at `cell`, optionally followed by a folded AI reply.
    pub fn human_move(before: &'a Board, after: &'a Board, cell: Cell, human: Symbol) -> Self {
        Self {
            before,
            after,
            added: 1..=2,
            placed: Some((cell, human)),
            added_by: Some(human.opponent()),
        }
    }

    /// A single AI move on the AI's turn.
    pub fn ai_move(before: &'a Board, after: &'a Board, ai: Symbol) -> Self {
        Self {
            before,
            after,
            added: 1..=1,
            placed: None,
            added_by: Some(ai),
        }
    }

    /// A resync of the same game: anything may have been added, nothing removed.
    pub fn resync(before: &'a Board, after: &'a Board) -> Self {
        Self {
            before,
            after,
            added: 0..=Board::CELLS,
            placed: None,
            added_by: None,
        }
    }

    /// Cells added by this step, excluding the required placement.
    pub(crate) fn other_added(&self) -> impl Iterator<Item = Cell> + '_ {
        let placed = self.placed.map(|(cell, _)| cell);
        self.before
            .added_in(self.after)
            .into_iter()
            .filter(move |cell| Some(*cell) != placed)
    }
}

/// Every check applied to a server board before it replaces the local one.
pub type ReconcileInvariants = (
    MonotonicBoardInvariant,
    StoneCountInvariant,
    PlacedStoneInvariant,
    AddedByInvariant,
);

/// Checks a transition against [`ReconcileInvariants`].
pub fn check_transition(transition: &BoardTransition<'_>) -> Result<(), Vec<InvariantViolation>> {
    ReconcileInvariants::check_all(transition)
}
