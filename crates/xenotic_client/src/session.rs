//! Client-side mirror of one server-authoritative game.
//!
//! A [`Session`] is never edited in place. Every accepted response produces a
//! new value that replaces the old one, so a response that fails validation
//! leaves the previous session untouched.

use crate::error::ClientError;
use crate::transport::{MoveReply, SessionSnapshot};
use derive_getters::Getters;
use serde::Serialize;
use tracing::{debug, instrument, warn};
use xenotic_board::{
    Board, BoardTransition, Cell, Difficulty, InvariantViolation, Outcome, Symbol, Winner, check_transition,
};

/// Where a session stands in the turn protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    /// No game has started yet.
    Idle,
    /// The AI owes the opening move.
    AwaitingFirstAiMove,
    /// The human may move.
    AwaitingHumanMove,
    /// A human move is in flight, or the server has not yet played the AI's reply.
    AwaitingAiReply,
    /// The game has a result.
    GameOver,
}

impl Phase {
    /// Phase implied by a settled session.
    pub fn of(session: &Session) -> Self {
        if session.game_over {
            Phase::GameOver
        } else if session.current_player == session.human_symbol {
            Phase::AwaitingHumanMove
        } else if session.board.occupied() == 0 {
            Phase::AwaitingFirstAiMove
        } else {
            Phase::AwaitingAiReply
        }
    }
}

/// The mirrored record of one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct Session {
    /// Server-assigned game id, when reported.
    game_id: Option<String>,
    /// Current board.
    board: Board,
    /// Human's symbol.
    human_symbol: Symbol,
    /// AI's symbol.
    ai_symbol: Symbol,
    /// Symbol to move next.
    current_player: Symbol,
    /// Difficulty in force for this game.
    difficulty: Difficulty,
    /// Whether the game has a result.
    game_over: bool,
    /// Result, set exactly when `game_over` is.
    winner: Option<Winner>,
    /// Latest status line from the server.
    message: Option<String>,
    /// Where the AI last played.
    last_ai_move: Option<Cell>,
}

/// Values a snapshot may omit, taken from the request or the replaced session.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Fallback {
    pub human_symbol: Option<Symbol>,
    pub difficulty: Option<Difficulty>,
}

impl Fallback {
    /// Fallback drawn from the session being replaced.
    pub(crate) fn from_session(session: Option<&Session>) -> Self {
        Self {
            human_symbol: session.map(|s| s.human_symbol),
            difficulty: session.map(|s| s.difficulty),
        }
    }
}

fn violations(list: Vec<InvariantViolation>) -> ClientError {
    let descriptions = list
        .iter()
        .map(|v| v.description.as_str())
        .collect::<Vec<_>>()
        .join("; ");
    warn!(violations = %descriptions, "Server board failed reconciliation");
    ClientError::protocol(format!("Server board rejected: {descriptions}"))
}

impl Session {
    /// Builds a session wholesale from a server snapshot.
    #[instrument(skip(snapshot), fields(game_id = ?snapshot.game_id))]
    pub(crate) fn from_snapshot(snapshot: SessionSnapshot, fallback: Fallback) -> Result<Self, ClientError> {
        let human_symbol = snapshot
            .human_symbol
            .or(fallback.human_symbol)
            .ok_or_else(|| ClientError::protocol("Snapshot does not name the human's symbol"))?;
        let ai_symbol = snapshot.ai_symbol.unwrap_or(human_symbol.opponent());
        if ai_symbol == human_symbol {
            return Err(ClientError::protocol(format!(
                "Human and AI both play {human_symbol}"
            )));
        }

        if snapshot.board.occupied() == 0 && !snapshot.current_player.moves_first() {
            return Err(ClientError::protocol(format!(
                "{} cannot open the game",
                snapshot.current_player
            )));
        }

        let winner = if snapshot.game_over {
            Some(snapshot.winner.unwrap_or(Winner::Draw))
        } else {
            None
        };

        let session = Self {
            game_id: snapshot.game_id,
            board: snapshot.board,
            human_symbol,
            ai_symbol,
            current_player: snapshot.current_player,
            difficulty: snapshot
                .difficulty
                .or(fallback.difficulty)
                .unwrap_or_default(),
            game_over: snapshot.game_over,
            winner,
            message: snapshot.message,
            last_ai_move: None,
        };
        debug!(phase = %Phase::of(&session), "Session built from snapshot");
        Ok(session)
    }

    /// Whether a snapshot carrying `game_id` describes this session's game.
    ///
    /// Ids only tell games apart when both sides report one; a missing id on
    /// either side counts as the same game.
    pub(crate) fn same_game_as(&self, game_id: Option<&str>) -> bool {
        match (self.game_id.as_deref(), game_id) {
            (Some(ours), Some(theirs)) => ours == theirs,
            _ => true,
        }
    }

    /// Reconciles a resync snapshot against this session.
    ///
    /// The same game may only have advanced. A snapshot with a different id
    /// replaces the session wholesale.
    #[instrument(skip(self, snapshot))]
    pub(crate) fn resync(&self, snapshot: SessionSnapshot) -> Result<Self, ClientError> {
        let same_game = self.same_game_as(snapshot.game_id.as_deref());
        let next = Self::from_snapshot(snapshot, Fallback::from_session(Some(self)))?;
        if !same_game {
            debug!("Snapshot is a different game; replacing wholesale");
            return Ok(next);
        }

        check_transition(&BoardTransition::resync(&self.board, &next.board)).map_err(violations)?;
        if self.game_over && !next.game_over {
            return Err(ClientError::protocol("Finished game reported as in progress"));
        }
        if next.human_symbol != self.human_symbol {
            return Err(ClientError::protocol("Symbols changed mid-game"));
        }
        Ok(Self {
            game_id: next.game_id.clone().or_else(|| self.game_id.clone()),
            last_ai_move: self.last_ai_move,
            ..next
        })
    }

    /// Applies the response to a human move at `cell`.
    #[instrument(skip(self, reply), fields(cell = %cell))]
    pub(crate) fn after_human_move(&self, cell: Cell, reply: MoveReply) -> Result<Self, ClientError> {
        check_transition(&BoardTransition::human_move(
            &self.board,
            &reply.board,
            cell,
            self.human_symbol,
        ))
        .map_err(violations)?;

        let added = self.board.added_in(&reply.board);
        let ai_reply = added
            .iter()
            .copied()
            .find(|c| reply.board.get(*c).symbol() == Some(self.ai_symbol));
        let last_mover = if ai_reply.is_some() {
            self.ai_symbol
        } else {
            self.human_symbol
        };

        self.advance(reply, last_mover, ai_reply)
    }

    /// Applies the response to the AI's opening move.
    #[instrument(skip(self, reply))]
    pub(crate) fn after_ai_move(&self, reply: MoveReply) -> Result<Self, ClientError> {
        check_transition(&BoardTransition::ai_move(&self.board, &reply.board, self.ai_symbol))
            .map_err(violations)?;

        let ai_cell = self.board.added_in(&reply.board).first().copied();
        self.advance(reply, self.ai_symbol, ai_cell)
    }

    /// Shared tail of move reconciliation: turn order and result.
    fn advance(&self, reply: MoveReply, last_mover: Symbol, ai_cell: Option<Cell>) -> Result<Self, ClientError> {
        let expected_next = last_mover.opponent();
        let current_player = match (reply.current_player, reply.game_over) {
            (Some(next), false) if next != expected_next => {
                return Err(ClientError::protocol(format!(
                    "{last_mover} moved last but server says {next} is to move"
                )));
            }
            (Some(next), _) => next,
            (None, true) => expected_next,
            (None, false) => {
                return Err(ClientError::protocol("Move response has no current_player"));
            }
        };

        let winner = if reply.game_over {
            Some(reply.winner.unwrap_or(Winner::Draw))
        } else {
            None
        };

        Ok(Self {
            board: reply.board,
            current_player,
            game_over: reply.game_over,
            winner,
            message: reply.message.or_else(|| self.message.clone()),
            last_ai_move: reply.ai_move.or(ai_cell).or(self.last_ai_move),
            ..self.clone()
        })
    }

    /// Whether the human may move now.
    pub fn is_humans_turn(&self) -> bool {
        !self.game_over && self.current_player == self.human_symbol
    }

    /// Result from the human's point of view, once the game is over.
    pub fn outcome(&self) -> Option<Outcome> {
        self.winner.map(|w| Outcome::for_human(w, self.human_symbol))
    }

    /// Current phase of the turn protocol.
    pub fn phase(&self) -> Phase {
        Phase::of(self)
    }
}
