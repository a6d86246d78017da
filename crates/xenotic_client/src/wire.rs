//! JSON encoding used by the XenoTic HTTP server.
//!
//! Every body carries `success`. Snapshots arrive either nested under
//! `game_state` or inline; boards are three rows of three strings where `""`,
//! `" "` and `null` mean empty.

use crate::error::ClientError;
use crate::transport::{MoveReply, NewGameReply, ServerStats, SessionSnapshot};
use derive_new::new;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use xenotic_board::{Board, Cell, Difficulty, Square, Symbol, Winner};

/// Body of `POST /api/new-game`.
#[derive(Debug, Clone, Serialize, new)]
pub(crate) struct NewGameRequest {
    pub difficulty: Difficulty,
    pub human_symbol: Symbol,
}

/// Body of `POST /api/make-move`.
#[derive(Debug, Clone, Serialize, new)]
pub(crate) struct MoveRequest {
    pub row: u8,
    pub col: u8,
}

/// Body of `POST /api/change-difficulty`.
#[derive(Debug, Clone, Serialize, new)]
pub(crate) struct DifficultyRequest {
    pub difficulty: Difficulty,
}

type WireBoard = Vec<Vec<Option<String>>>;

#[derive(Debug, Clone, Copy, Deserialize)]
struct WireCell {
    row: u8,
    col: u8,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct WireGameState {
    game_id: Option<String>,
    board: Option<WireBoard>,
    current_player: Option<String>,
    human_symbol: Option<String>,
    ai_symbol: Option<String>,
    difficulty: Option<String>,
    game_over: bool,
    winner: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SnapshotResponse {
    #[serde(default)]
    game_state: Option<WireGameState>,
    #[serde(flatten)]
    inline: WireGameState,
    #[serde(default)]
    ai_goes_first: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MoveResponse {
    board: WireBoard,
    #[serde(default)]
    current_player: Option<String>,
    #[serde(default)]
    game_over: bool,
    #[serde(default)]
    winner: Option<String>,
    #[serde(default)]
    ai_move: Option<WireCell>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct HintResponse {
    hint: WireCell,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StatsResponse {
    stats: ServerStats,
}

/// Checks the `success` flag and decodes the payload.
///
/// A body with `success: false` becomes a rejection carrying the server's
/// `error` message, whatever the HTTP status. A body that is not JSON, or a
/// non-2xx status without a `success` flag, is a transport failure.
#[instrument(skip(body), fields(body_len = body.len()))]
pub(crate) fn decode<R: DeserializeOwned>(status: u16, body: &str) -> Result<R, ClientError> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| {
        warn!(status, error = %e, "Response body is not JSON");
        ClientError::transport(format!("HTTP {status}: unreadable body ({e})"))
    })?;

    match value.get("success").and_then(serde_json::Value::as_bool) {
        Some(true) => {}
        Some(false) => {
            let message = value
                .get("error")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("Unknown error")
                .to_string();
            warn!(status, error = %message, "Server reported failure");
            return Err(ClientError::rejected(message));
        }
        None if !(200..300).contains(&status) => {
            return Err(ClientError::transport(format!("HTTP {status}")));
        }
        None => return Err(ClientError::protocol("Response has no success flag")),
    }

    debug!(status, "Decoding successful response");
    serde_json::from_value(value).map_err(|e| ClientError::protocol(format!("Malformed response: {e}")))
}

fn board(rows: WireBoard) -> Result<Board, ClientError> {
    let rows = rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|cell| cell.as_deref().unwrap_or("").parse::<Square>())
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Board::from_rows(rows)?)
}

fn symbol(field: &str, value: Option<String>) -> Result<Option<Symbol>, ClientError> {
    value
        .map(|v| {
            v.trim()
                .parse::<Symbol>()
                .map_err(|_| ClientError::protocol(format!("{field} has unknown symbol {v:?}")))
        })
        .transpose()
}

fn winner(game_over: bool, value: Option<String>) -> Result<Option<Winner>, ClientError> {
    if !game_over {
        return Ok(None);
    }
    match Winner::from_wire(value.as_deref()) {
        Some(winner) => Ok(Some(winner)),
        None => Err(ClientError::protocol(format!("Unknown winner {value:?}"))),
    }
}

fn cell(wire: WireCell) -> Result<Cell, ClientError> {
    Ok(Cell::new(wire.row, wire.col)?)
}

impl SnapshotResponse {
    /// Converts into a domain snapshot, preferring the nested `game_state`.
    pub(crate) fn into_snapshot(self) -> Result<SessionSnapshot, ClientError> {
        let outer_message = self.inline.message.clone();
        let state = match self.game_state {
            Some(nested) => WireGameState {
                message: outer_message.or(nested.message.clone()),
                ..nested
            },
            None => self.inline,
        };

        let board = board(
            state
                .board
                .ok_or_else(|| ClientError::protocol("Snapshot has no board"))?,
        )?;
        let current_player = symbol("current_player", state.current_player)?
            .ok_or_else(|| ClientError::protocol("Snapshot has no current_player"))?;
        let difficulty = state
            .difficulty
            .map(|d| {
                d.parse::<Difficulty>()
                    .map_err(|_| ClientError::protocol(format!("Unknown difficulty {d:?}")))
            })
            .transpose()?;

        Ok(SessionSnapshot {
            game_id: state.game_id,
            board,
            current_player,
            human_symbol: symbol("human_symbol", state.human_symbol)?,
            ai_symbol: symbol("ai_symbol", state.ai_symbol)?,
            difficulty,
            game_over: state.game_over,
            winner: winner(state.game_over, state.winner)?,
            message: state.message,
        })
    }

    /// Converts into a new-game reply.
    pub(crate) fn into_new_game(self) -> Result<NewGameReply, ClientError> {
        let ai_goes_first = self.ai_goes_first;
        Ok(NewGameReply {
            snapshot: self.into_snapshot()?,
            ai_goes_first,
        })
    }
}

impl MoveResponse {
    /// Converts into a domain move reply.
    pub(crate) fn into_reply(self) -> Result<MoveReply, ClientError> {
        Ok(MoveReply {
            board: board(self.board)?,
            current_player: symbol("current_player", self.current_player)?,
            game_over: self.game_over,
            winner: winner(self.game_over, self.winner)?,
            ai_move: self.ai_move.map(cell).transpose()?,
            message: self.message,
        })
    }
}

impl HintResponse {
    /// The recommended cell.
    pub(crate) fn into_cell(self) -> Result<Cell, ClientError> {
        cell(self.hint)
    }
}

impl StatsResponse {
    /// The server counters.
    pub(crate) fn into_stats(self) -> ServerStats {
        self.stats
    }
}
