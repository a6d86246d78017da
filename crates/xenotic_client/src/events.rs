//! Session transition events.
//!
//! Rendering, sound, and score keeping subscribe here instead of being
//! called from the state machine. Emission never blocks and never fails the
//! operation that caused it.

use crate::session::{Phase, Session};
use tokio::sync::broadcast;
use tracing::trace;
use xenotic_board::{Board, Cell, Outcome, Symbol, Winner};

/// Something observable happened to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A new session replaced the previous one.
    SessionStarted(Session),
    /// The mirrored board changed.
    BoardUpdated(Board),
    /// The side to move changed.
    TurnChanged {
        /// Symbol to move.
        player: Symbol,
        /// Resulting phase.
        phase: Phase,
    },
    /// The server declared a result.
    GameEnded {
        /// Result from the human's point of view.
        outcome: Outcome,
        /// Result as reported.
        winner: Winner,
    },
    /// A hint arrived.
    HintReady(Cell),
    /// An operation failed; the session is unchanged.
    Error {
        /// Name of the failed operation.
        operation: &'static str,
        /// What went wrong.
        message: String,
    },
}

/// Fan-out of [`SessionEvent`]s to any number of observers.
#[derive(Debug, Clone)]
pub(crate) struct EventBus {
    tx: broadcast::Sender<SessionEvent>,
}

impl EventBus {
    pub(crate) fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }

    /// Sends to current subscribers; having none is fine.
    pub(crate) fn emit(&self, event: SessionEvent) {
        if self.tx.send(event).is_err() {
            trace!("No event subscribers");
        }
    }
}
