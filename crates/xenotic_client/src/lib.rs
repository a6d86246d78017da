//! XenoTic session client.
//!
//! Drives a tic-tac-toe game whose engine runs on a server. The client
//! mirrors the server's session, sends one request at a time, validates each
//! response before swapping it in, and broadcasts transitions to observers.
//!
//! # Architecture
//!
//! - **Client**: [`GameSessionClient`], the per-session state machine
//! - **Transport**: [`GameTransport`] seam; [`HttpTransport`] speaks the server's JSON API
//! - **Session**: [`Session`] record and [`Phase`] of the turn protocol
//! - **Events**: [`SessionEvent`] fan-out; [`SharedScoreboard`] is one observer
//!
//! # Example
//!
//! ```no_run
//! use xenotic_client::{ClientConfig, Difficulty, GameSessionClient, Symbol};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GameSessionClient::connect(&ClientConfig::default())?;
//! let session = client.start_new_game(Difficulty::Hard, Symbol::O).await?;
//! assert_eq!(session.board().occupied(), 1);
//!
//! let result = client.submit_move(1, 1).await?;
//! println!("{}", result.session.board().display());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod config;
mod error;
mod events;
mod http;
mod scoreboard;
mod session;
mod transport;
mod wire;

// Crate-level exports - Client
pub use client::{DEFAULT_EVENT_CAPACITY, GameSessionClient, MoveResult};

// Crate-level exports - Configuration
pub use config::{ClientConfig, SERVER_URL_ENV};

// Crate-level exports - Errors
pub use error::{ClientError, ClientErrorKind, ConfigError};

// Crate-level exports - Events and observers
pub use events::SessionEvent;
pub use scoreboard::{Scoreboard, SharedScoreboard};

// Crate-level exports - Session state
pub use session::{Phase, Session};

// Crate-level exports - Transport
pub use http::HttpTransport;
pub use transport::{GameTransport, MoveReply, NewGameReply, ServerStats, SessionSnapshot};

// Crate-level exports - Board types
pub use xenotic_board::{Board, Cell, Difficulty, Outcome, Square, Symbol, Winner};
