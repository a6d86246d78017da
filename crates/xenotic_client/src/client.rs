//! The game session client.
//!
//! One client drives one server-side game at a time. Session-mutating
//! operations are strictly serialized: a call made while another request is
//! outstanding fails with [`ClientErrorKind::Busy`] before anything is sent.
//! Responses are validated, then swapped in whole; a failure at any step
//! leaves the previous session and phase in place.

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientErrorKind};
use crate::events::{EventBus, SessionEvent};
use crate::http::HttpTransport;
use crate::session::{Fallback, Phase, Session};
use crate::transport::{GameTransport, ServerStats};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};
use xenotic_board::{Cell, Difficulty, Outcome, Symbol};

/// Default capacity of the event channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Result of an accepted human move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResult {
    /// Session after the move and any folded AI reply.
    pub session: Session,
    /// Where the AI answered, if it did in the same response.
    pub ai_move: Option<Cell>,
    /// Result, when this move ended the game.
    pub outcome: Option<Outcome>,
}

#[derive(Debug)]
struct ClientState {
    session: Option<Session>,
    phase: Phase,
}

struct Inner<T> {
    transport: T,
    state: Mutex<ClientState>,
    processing: AtomicBool,
    events: EventBus,
}

/// Marks a request as outstanding until dropped.
///
/// Dropping also resets the phase to that of the installed session, including
/// when the request future is cancelled mid-flight.
struct InFlight<'a> {
    flag: &'a AtomicBool,
    state: &'a Mutex<ClientState>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.phase = state.session.as_ref().map_or(Phase::Idle, Session::phase);
        }
        self.flag.store(false, Ordering::Release);
    }
}

/// Handle to a game session client.
///
/// Cloning is cheap and every clone drives the same session, so the handle
/// can be given to the input layer and to observers alike.
pub struct GameSessionClient<T: GameTransport> {
    inner: Arc<Inner<T>>,
}

impl<T: GameTransport> Clone for GameSessionClient<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: GameTransport> std::fmt::Debug for GameSessionClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("GameSessionClient")
            .field("phase", &state.phase)
            .field("session", &state.session)
            .field("busy", &self.is_busy())
            .finish()
    }
}

impl GameSessionClient<HttpTransport> {
    /// Creates a client talking HTTP to the configured server.
    #[instrument(skip(config), fields(server_url = %config.server_url()))]
    pub fn connect(config: &ClientConfig) -> Result<Self, ClientError> {
        let transport = HttpTransport::from_config(config)?;
        Ok(Self::with_capacity(transport, *config.event_capacity()))
    }
}

impl<T: GameTransport> GameSessionClient<T> {
    /// Creates a client over the given transport.
    pub fn new(transport: T) -> Self {
        Self::with_capacity(transport, DEFAULT_EVENT_CAPACITY)
    }

    /// Creates a client whose event channel buffers `capacity` events per observer.
    pub fn with_capacity(transport: T, capacity: usize) -> Self {
        info!(capacity, "Creating game session client");
        Self {
            inner: Arc::new(Inner {
                transport,
                state: Mutex::new(ClientState {
                    session: None,
                    phase: Phase::Idle,
                }),
                processing: AtomicBool::new(false),
                events: EventBus::new(capacity),
            }),
        }
    }

    /// Subscribes to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    /// The transport this client drives.
    pub fn transport(&self) -> &T {
        &self.inner.transport
    }

    /// Snapshot of the current session, if any.
    pub fn session(&self) -> Option<Session> {
        self.state().session.clone()
    }

    /// Current phase of the turn protocol.
    pub fn phase(&self) -> Phase {
        self.state().phase
    }

    /// Whether a session-mutating request is outstanding.
    pub fn is_busy(&self) -> bool {
        self.inner.processing.load(Ordering::Acquire)
    }

    /// Starts a new game, replacing any current session.
    ///
    /// When the AI plays first, this also performs the AI's opening move
    /// before returning. If that second round trip fails the new session
    /// stays installed in [`Phase::AwaitingFirstAiMove`]; retry with
    /// [`Self::request_ai_first_move`].
    #[instrument(skip(self))]
    pub async fn start_new_game(&self, difficulty: Difficulty, human_symbol: Symbol) -> Result<Session, ClientError> {
        let result = self.start_new_game_inner(difficulty, human_symbol).await;
        self.surface("start_new_game", result)
    }

    /// Retries the AI's opening move after it failed.
    #[instrument(skip(self))]
    pub async fn request_ai_first_move(&self) -> Result<Session, ClientError> {
        let result = self.request_ai_first_move_inner().await;
        self.surface("request_ai_first_move", result)
    }

    /// Submits the human's move at (`row`, `col`).
    #[instrument(skip(self))]
    pub async fn submit_move(&self, row: u8, col: u8) -> Result<MoveResult, ClientError> {
        let result = self.submit_move_inner(row, col).await;
        self.surface("submit_move", result)
    }

    /// Changes difficulty; the server answers with a fresh board.
    #[instrument(skip(self))]
    pub async fn change_difficulty(&self, difficulty: Difficulty) -> Result<Session, ClientError> {
        let result = self.change_difficulty_inner(difficulty).await;
        self.surface("change_difficulty", result)
    }

    /// Clears the board, keeping symbols and difficulty.
    #[instrument(skip(self))]
    pub async fn reset(&self) -> Result<Session, ClientError> {
        let result = self.reset_inner().await;
        self.surface("reset", result)
    }

    /// Asks the server for a recommended cell. Never changes the session.
    ///
    /// Hints do not claim the in-flight slot, but are refused while a
    /// session-mutating request is outstanding.
    #[instrument(skip(self))]
    pub async fn request_hint(&self) -> Result<Cell, ClientError> {
        let result = self.request_hint_inner().await;
        self.surface("request_hint", result)
    }

    /// Re-reads the server's view of the current game.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<Session, ClientError> {
        let result = self.refresh_inner().await;
        self.surface("refresh", result)
    }

    /// Fetches aggregate statistics from the server.
    #[instrument(skip(self))]
    pub async fn server_stats(&self) -> Result<ServerStats, ClientError> {
        let result = self.inner.transport.stats().await;
        self.surface("server_stats", result)
    }

    async fn request_ai_first_move_inner(&self) -> Result<Session, ClientError> {
        let _guard = self.begin()?;
        if self.phase() != Phase::AwaitingFirstAiMove {
            return Err(ClientError::new(ClientErrorKind::NotAwaitingFirstMove));
        }
        self.ai_first_move().await
    }

    async fn change_difficulty_inner(&self, difficulty: Difficulty) -> Result<Session, ClientError> {
        let _guard = self.begin()?;
        let previous = self.require_session()?;
        info!(from = %previous.difficulty(), to = %difficulty, "Changing difficulty");

        let snapshot = self.inner.transport.change_difficulty(difficulty).await?;
        let fallback = Fallback {
            difficulty: Some(difficulty),
            ..Fallback::from_session(Some(&previous))
        };
        let session = Session::from_snapshot(snapshot, fallback)?;
        self.open(session).await
    }

    async fn reset_inner(&self) -> Result<Session, ClientError> {
        let _guard = self.begin()?;
        let previous = self.require_session()?;
        info!("Resetting game");

        let snapshot = self.inner.transport.reset().await?;
        let session = Session::from_snapshot(snapshot, Fallback::from_session(Some(&previous)))?;
        self.open(session).await
    }

    async fn request_hint_inner(&self) -> Result<Cell, ClientError> {
        if self.is_busy() {
            return Err(ClientError::new(ClientErrorKind::Busy));
        }
        let session = self.require_open_session()?;
        if !session.is_humans_turn() {
            return Err(ClientError::new(ClientErrorKind::NotHumansTurn));
        }

        let cell = self.inner.transport.hint().await?;
        if !session.board().empty_cells().contains(&cell) {
            return Err(ClientError::protocol(format!("Hint {cell} points at an occupied cell")));
        }
        debug!(cell = %cell, "Hint received");
        self.inner.events.emit(SessionEvent::HintReady(cell));
        Ok(cell)
    }

    async fn refresh_inner(&self) -> Result<Session, ClientError> {
        let _guard = self.begin()?;
        let previous = self.require_session()?;

        let snapshot = self.inner.transport.game_state().await?;
        let same_game = previous.same_game_as(snapshot.game_id.as_deref());
        let session = previous.resync(snapshot)?;
        if same_game {
            self.commit(&previous, session.clone());
        } else {
            self.install(session.clone());
        }
        Ok(session)
    }

    async fn start_new_game_inner(&self, difficulty: Difficulty, human_symbol: Symbol) -> Result<Session, ClientError> {
        let _guard = self.begin()?;
        info!(%difficulty, %human_symbol, "Starting new game");

        let reply = self.inner.transport.new_game(difficulty, human_symbol).await?;
        let fallback = Fallback {
            human_symbol: Some(human_symbol),
            difficulty: Some(difficulty),
        };
        let session = Session::from_snapshot(reply.snapshot, fallback)?;
        if reply.ai_goes_first && session.phase() != Phase::AwaitingFirstAiMove {
            return Err(ClientError::protocol(format!(
                "Server says the AI goes first but the session is in {}",
                session.phase()
            )));
        }
        self.open(session).await
    }

    async fn submit_move_inner(&self, row: u8, col: u8) -> Result<MoveResult, ClientError> {
        let cell = Cell::new(row, col).map_err(|_| ClientError::new(ClientErrorKind::OutOfBounds { row, col }))?;
        let _guard = self.begin()?;

        let before = {
            let mut state = self.state();
            let session = state
                .session
                .clone()
                .ok_or_else(|| ClientError::new(ClientErrorKind::NoSession))?;
            if *session.game_over() {
                return Err(ClientError::new(ClientErrorKind::GameOver));
            }
            if state.phase != Phase::AwaitingHumanMove {
                return Err(ClientError::new(ClientErrorKind::NotHumansTurn));
            }
            if !session.board().is_empty(cell) {
                return Err(ClientError::new(ClientErrorKind::CellOccupied(cell)));
            }
            state.phase = Phase::AwaitingAiReply;
            session
        };

        info!(cell = %cell, "Submitting move");
        let reply = self.inner.transport.make_move(cell).await?;
        let next = before.after_human_move(cell, reply)?;

        let ai_move = if next.last_ai_move() != before.last_ai_move() {
            *next.last_ai_move()
        } else {
            None
        };
        let outcome = next.outcome();
        self.commit(&before, next.clone());

        Ok(MoveResult {
            session: next,
            ai_move,
            outcome,
        })
    }

    /// Installs a fresh session and plays the AI's opening move if it owes one.
    async fn open(&self, session: Session) -> Result<Session, ClientError> {
        let ai_first = session.phase() == Phase::AwaitingFirstAiMove;
        self.install(session.clone());
        if ai_first {
            info!("AI plays first");
            return self.ai_first_move().await;
        }
        Ok(session)
    }

    /// The AI-first-move round trip. Caller holds the in-flight guard.
    async fn ai_first_move(&self) -> Result<Session, ClientError> {
        let before = self.require_session()?;
        let reply = self.inner.transport.ai_first_move().await?;
        let next = before.after_ai_move(reply)?;
        self.commit(&before, next.clone());
        Ok(next)
    }

    /// Replaces the session wholesale.
    ///
    /// Emits no `GameEnded`; a snapshot that arrives already finished is not a
    /// result this client saw happen.
    fn install(&self, session: Session) {
        let phase = session.phase();
        {
            let mut state = self.state();
            state.session = Some(session.clone());
            state.phase = phase;
        }
        info!(%phase, game_id = ?session.game_id(), "Session installed");

        let events = &self.inner.events;
        events.emit(SessionEvent::SessionStarted(session.clone()));
        events.emit(SessionEvent::BoardUpdated(session.board().clone()));
        events.emit(SessionEvent::TurnChanged {
            player: *session.current_player(),
            phase,
        });
    }

    /// Replaces `before` with its successor `next` within the same game.
    fn commit(&self, before: &Session, next: Session) {
        let phase = next.phase();
        {
            let mut state = self.state();
            state.session = Some(next.clone());
            state.phase = phase;
        }
        debug!(%phase, occupied = next.board().occupied(), "Session advanced");

        let events = &self.inner.events;
        if next.board() != before.board() {
            events.emit(SessionEvent::BoardUpdated(next.board().clone()));
        }
        if next.current_player() != before.current_player() || next.phase() != before.phase() {
            events.emit(SessionEvent::TurnChanged {
                player: *next.current_player(),
                phase,
            });
        }
        if !*before.game_over() {
            if let (Some(outcome), Some(winner)) = (next.outcome(), *next.winner()) {
                info!(%outcome, "Game over");
                events.emit(SessionEvent::GameEnded { outcome, winner });
            }
        }
    }

    /// Claims the in-flight slot or reports [`ClientErrorKind::Busy`].
    fn begin(&self) -> Result<InFlight<'_>, ClientError> {
        self.inner
            .processing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ClientError::new(ClientErrorKind::Busy))?;
        Ok(InFlight {
            flag: &self.inner.processing,
            state: &self.inner.state,
        })
    }

    fn require_session(&self) -> Result<Session, ClientError> {
        self.session()
            .ok_or_else(|| ClientError::new(ClientErrorKind::NoSession))
    }

    fn require_open_session(&self) -> Result<Session, ClientError> {
        let session = self.require_session()?;
        if *session.game_over() {
            return Err(ClientError::new(ClientErrorKind::GameOver));
        }
        Ok(session)
    }

    fn state(&self) -> MutexGuard<'_, ClientState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Logs and broadcasts a failure; passes the result through unchanged.
    fn surface<R>(&self, operation: &'static str, result: Result<R, ClientError>) -> Result<R, ClientError> {
        if let Err(err) = &result {
            if err.kind.is_local() {
                debug!(operation, error = %err, "Operation refused locally");
            } else {
                warn!(operation, error = %err, "Operation failed");
            }
            self.inner.events.emit(SessionEvent::Error {
                operation,
                message: err.kind.to_string(),
            });
        }
        result
    }
}
