//! Transport seam between the session client and the game server.
//!
//! The client only needs the logical fields of each exchange. Encoding lives
//! behind [`GameTransport`]: production uses the HTTP binding in
//! [`crate::HttpTransport`], tests use scripted in-memory transports.

use crate::error::ClientError;
use async_trait::async_trait;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use xenotic_board::{Board, Cell, Difficulty, Symbol, Winner};

/// Full session snapshot as returned by new-game, reset, difficulty change, and game-state.
///
/// Fields the server may omit are optional; the client fills them from the
/// request or the session being replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Server-assigned game id.
    pub game_id: Option<String>,
    /// Current board.
    pub board: Board,
    /// Symbol to move next.
    pub current_player: Symbol,
    /// Human's symbol.
    pub human_symbol: Option<Symbol>,
    /// AI's symbol.
    pub ai_symbol: Option<Symbol>,
    /// Difficulty in force.
    pub difficulty: Option<Difficulty>,
    /// Whether the game has a result.
    pub game_over: bool,
    /// Result, when `game_over` is set.
    pub winner: Option<Winner>,
    /// Human-readable status line.
    pub message: Option<String>,
}

/// Reply to "start new game".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGameReply {
    /// The fresh session.
    pub snapshot: SessionSnapshot,
    /// Whether the AI owes the opening move.
    pub ai_goes_first: bool,
}

/// Reply to a move-class request (human move or AI first move).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveReply {
    /// Board after the move (and any folded AI reply).
    pub board: Board,
    /// Symbol to move next; servers omit it once the game is over.
    pub current_player: Option<Symbol>,
    /// Whether the game has a result.
    pub game_over: bool,
    /// Result, when `game_over` is set.
    pub winner: Option<Winner>,
    /// Where the AI played, when reported.
    pub ai_move: Option<Cell>,
    /// Human-readable status line.
    pub message: Option<String>,
}

/// Aggregate counters kept by the server across all sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct ServerStats {
    /// Finished games.
    total_games: u64,
    /// Games the human won.
    human_wins: u64,
    /// Games the AI won.
    ai_wins: u64,
    /// Drawn games.
    draws: u64,
    /// Human win percentage.
    human_win_rate: f64,
    /// AI win percentage.
    ai_win_rate: f64,
    /// Draw percentage.
    draw_rate: f64,
    /// Mean stones placed per finished game.
    average_moves_per_game: f64,
    /// Sessions currently held by the server.
    active_games: u64,
}

/// Request/response contract the session client drives.
///
/// Each method is one round trip. A `success: false` answer must come back as
/// [`crate::ClientErrorKind::Rejected`]; a response that cannot be decoded as
/// [`crate::ClientErrorKind::Protocol`]; anything that kept the exchange from
/// completing as [`crate::ClientErrorKind::Transport`].
#[async_trait]
pub trait GameTransport: Send + Sync + 'static {
    /// Starts a fresh session.
    async fn new_game(&self, difficulty: Difficulty, human_symbol: Symbol) -> Result<NewGameReply, ClientError>;

    /// Asks the AI to make the opening move.
    async fn ai_first_move(&self) -> Result<MoveReply, ClientError>;

    /// Submits the human's move.
    async fn make_move(&self, cell: Cell) -> Result<MoveReply, ClientError>;

    /// Changes difficulty; the server starts a fresh board.
    async fn change_difficulty(&self, difficulty: Difficulty) -> Result<SessionSnapshot, ClientError>;

    /// Asks for a recommended cell.
    async fn hint(&self) -> Result<Cell, ClientError>;

    /// Clears the board, keeping symbols and difficulty.
    async fn reset(&self) -> Result<SessionSnapshot, ClientError>;

    /// Fetches the server's current snapshot.
    async fn game_state(&self) -> Result<SessionSnapshot, ClientError>;

    /// Fetches aggregate server statistics.
    async fn stats(&self) -> Result<ServerStats, ClientError>;
}
