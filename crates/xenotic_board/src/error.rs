//! Board error types.

use derive_more::{Display, Error};
use tracing::instrument;

/// What went wrong while building or reading a board.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum BoardErrorKind {
    /// A coordinate lies outside the 3x3 grid.
    #[display("Cell ({row}, {col}) is off the board")]
    OutOfBounds {
        /// Requested row.
        row: u8,
        /// Requested column.
        col: u8,
    },
    /// The grid does not have three rows of three cells.
    #[display("Expected a 3x3 board, got {rows} rows with {cols} columns")]
    Shape {
        /// Row count received.
        rows: usize,
        /// Column count of the offending row.
        cols: usize,
    },
    /// A cell value is neither empty nor a known symbol.
    #[display("Unrecognized cell value {_0:?}")]
    UnknownSymbol(String),
}

/// Board error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Board error: {} at {}:{}", kind, file, line)]
pub struct BoardError {
    /// Error kind.
    pub kind: BoardErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl BoardError {
    /// Creates a new board error with caller location tracking.
    #[track_caller]
    #[instrument(skip(kind))]
    pub fn new(kind: BoardErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
