//! XenoTic board types.
//!
//! Pure data for mirroring a server-authoritative tic-tac-toe game: symbols,
//! squares, cells, the 3x3 board, difficulty levels, results, and the
//! invariants a server board must satisfy before it replaces the local one.
//!
//! Nothing here plays the game. Win detection and move search live on the
//! server.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod difficulty;
mod error;
pub mod invariants;
mod outcome;
mod types;

pub use difficulty::Difficulty;
pub use error::{BoardError, BoardErrorKind};
pub use invariants::{BoardTransition, InvariantViolation, check_transition};
pub use outcome::{Outcome, Winner};
pub use types::{Board, Cell, Square, Symbol};
