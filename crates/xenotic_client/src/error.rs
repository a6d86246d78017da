//! Client error types.

use derive_more::{Display, Error};
use tracing::instrument;
use xenotic_board::{BoardError, Cell};

/// Why a client operation did not happen.
///
/// Every kind leaves the mirrored session exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ClientErrorKind {
    /// The request never reached the server, or its response never arrived.
    #[display("Transport failure: {_0}")]
    Transport(String),

    /// The server answered `success: false`.
    #[display("Server rejected request: {_0}")]
    Rejected(String),

    /// A successful response broke the protocol (missing field, rewritten board).
    #[display("Protocol violation: {_0}")]
    Protocol(String),

    /// Another request is still outstanding.
    #[display("A request is already in flight")]
    Busy,

    /// No game has been started yet.
    #[display("No active game session")]
    NoSession,

    /// The session already has a result.
    #[display("Game is already over")]
    GameOver,

    /// It is the AI's move, not the human's.
    #[display("It is not your turn")]
    NotHumansTurn,

    /// The target cell already holds a stone.
    #[display("Cell {_0} is already occupied")]
    CellOccupied(Cell),

    /// Coordinates outside the 3x3 board.
    #[display("Cell ({row}, {col}) is off the board")]
    OutOfBounds {
        /// Requested row.
        row: u8,
        /// Requested column.
        col: u8,
    },

    /// The AI's opening move is not pending.
    #[display("Not waiting for the AI's first move")]
    NotAwaitingFirstMove,
}

impl ClientErrorKind {
    /// Whether the error was raised locally, before any request was sent.
    pub fn is_local(&self) -> bool {
        !matches!(
            self,
            ClientErrorKind::Transport(_) | ClientErrorKind::Rejected(_) | ClientErrorKind::Protocol(_)
        )
    }
}

/// Client error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("{} at {}:{}", kind, file, line)]
pub struct ClientError {
    /// Error kind.
    pub kind: ClientErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ClientError {
    /// Creates a new client error with caller location tracking.
    #[track_caller]
    #[instrument(skip(kind))]
    pub fn new(kind: ClientErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Transport failure.
    #[track_caller]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::Transport(message.into()))
    }

    /// Server-side rejection.
    #[track_caller]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::Rejected(message.into()))
    }

    /// Protocol violation.
    #[track_caller]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::Protocol(message.into()))
    }
}

impl From<BoardError> for ClientError {
    #[track_caller]
    fn from(err: BoardError) -> Self {
        Self::protocol(err.kind.to_string())
    }
}

impl From<reqwest::Error> for ClientError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        Self::transport(err.to_string())
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
