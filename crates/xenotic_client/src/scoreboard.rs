//! Win/loss/draw tally kept by observing session events.

use crate::events::SessionEvent;
use derive_getters::Getters;
use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};
use xenotic_board::Outcome;

/// Results of finished games, from the human's point of view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Getters)]
pub struct Scoreboard {
    /// Human wins.
    wins: u32,
    /// AI wins.
    losses: u32,
    /// Draws.
    draws: u32,
}

impl Scoreboard {
    /// Creates an empty scoreboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one finished game.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::HumanWin => self.wins += 1,
            Outcome::AiWin => self.losses += 1,
            Outcome::Draw => self.draws += 1,
        }
    }

    /// Updates the tally from an event; ignores everything but `GameEnded`.
    pub fn observe(&mut self, event: &SessionEvent) {
        if let SessionEvent::GameEnded { outcome, .. } = event {
            self.record(*outcome);
        }
    }

    /// Finished games.
    pub fn games(&self) -> u32 {
        self.wins + self.losses + self.draws
    }

    /// Share of finished games the human won, as a percentage.
    pub fn win_rate(&self) -> f64 {
        match self.games() {
            0 => 0.0,
            games => f64::from(self.wins) * 100.0 / f64::from(games),
        }
    }
}

impl std::fmt::Display for Scoreboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "W {} / L {} / D {} ({:.1}% wins)",
            self.wins,
            self.losses,
            self.draws,
            self.win_rate()
        )
    }
}

/// Shared scoreboard updated by a background observer.
#[derive(Debug, Clone, Default)]
pub struct SharedScoreboard {
    inner: Arc<Mutex<Scoreboard>>,
}

impl SharedScoreboard {
    /// Current tally.
    pub fn snapshot(&self) -> Scoreboard {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn observe(&self, event: &SessionEvent) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .observe(event);
    }

    /// Spawns a task that folds every event from `events` into the tally.
    ///
    /// The task ends when the client (every sender) is dropped. A lagging
    /// observer skips the events it missed and keeps going.
    #[instrument(skip_all)]
    pub fn track(&self, mut events: broadcast::Receiver<SessionEvent>) -> JoinHandle<()> {
        let board = self.clone();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => board.observe(&event),
                    Err(RecvError::Lagged(missed)) => {
                        warn!(missed, "Scoreboard fell behind; some events were dropped");
                    }
                    Err(RecvError::Closed) => {
                        debug!("Event channel closed; scoreboard stopping");
                        break;
                    }
                }
            }
        })
    }
}
