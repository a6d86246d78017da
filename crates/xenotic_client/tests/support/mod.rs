//! Scripted in-memory transport shared by the client tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::oneshot;
use xenotic_client::{
    Board, Cell, ClientError, Difficulty, GameTransport, MoveReply, NewGameReply, ServerStats, SessionSnapshot, Square,
    Symbol, Winner,
};

/// One request observed by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    NewGame(Difficulty, Symbol),
    AiFirstMove,
    MakeMove(Cell),
    ChangeDifficulty(Difficulty),
    Hint,
    Reset,
    GameState,
    Stats,
}

/// Canned answer for the next request.
#[derive(Debug)]
pub enum Reply {
    NewGame(Result<NewGameReply, ClientError>),
    Move(Result<MoveReply, ClientError>),
    Snapshot(Result<SessionSnapshot, ClientError>),
    Hint(Result<Cell, ClientError>),
    Stats(Result<ServerStats, ClientError>),
}

/// Transport that answers from a queue and records every call.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    calls: Mutex<Vec<Call>>,
    replies: Mutex<VecDeque<Reply>>,
    move_gate: Mutex<Option<oneshot::Receiver<()>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the answer to the next request.
    pub fn push(&self, reply: Reply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    /// Holds the next `make_move` until the returned sender fires or drops.
    pub fn gate_next_move(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.move_gate.lock().unwrap() = Some(rx);
        tx
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == call).count()
    }

    fn record(&self, call: Call) -> Option<Reply> {
        self.calls.lock().unwrap().push(call);
        self.replies.lock().unwrap().pop_front()
    }
}

fn unscripted(call: &str) -> ClientError {
    ClientError::transport(format!("no scripted reply for {call}"))
}

#[async_trait]
impl GameTransport for ScriptedTransport {
    async fn new_game(&self, difficulty: Difficulty, human_symbol: Symbol) -> Result<NewGameReply, ClientError> {
        match self.record(Call::NewGame(difficulty, human_symbol)) {
            Some(Reply::NewGame(reply)) => reply,
            _ => Err(unscripted("new_game")),
        }
    }

    async fn ai_first_move(&self) -> Result<MoveReply, ClientError> {
        match self.record(Call::AiFirstMove) {
            Some(Reply::Move(reply)) => reply,
            _ => Err(unscripted("ai_first_move")),
        }
    }

    async fn make_move(&self, cell: Cell) -> Result<MoveReply, ClientError> {
        let reply = self.record(Call::MakeMove(cell));
        let gate = self.move_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        match reply {
            Some(Reply::Move(reply)) => reply,
            _ => Err(unscripted("make_move")),
        }
    }

    async fn change_difficulty(&self, difficulty: Difficulty) -> Result<SessionSnapshot, ClientError> {
        match self.record(Call::ChangeDifficulty(difficulty)) {
            Some(Reply::Snapshot(reply)) => reply,
            _ => Err(unscripted("change_difficulty")),
        }
    }

    async fn hint(&self) -> Result<Cell, ClientError> {
        match self.record(Call::Hint) {
            Some(Reply::Hint(reply)) => reply,
            _ => Err(unscripted("hint")),
        }
    }

    async fn reset(&self) -> Result<SessionSnapshot, ClientError> {
        match self.record(Call::Reset) {
            Some(Reply::Snapshot(reply)) => reply,
            _ => Err(unscripted("reset")),
        }
    }

    async fn game_state(&self) -> Result<SessionSnapshot, ClientError> {
        match self.record(Call::GameState) {
            Some(Reply::Snapshot(reply)) => reply,
            _ => Err(unscripted("game_state")),
        }
    }

    async fn stats(&self) -> Result<ServerStats, ClientError> {
        match self.record(Call::Stats) {
            Some(Reply::Stats(reply)) => reply,
            _ => Err(unscripted("stats")),
        }
    }
}

pub fn cell(row: u8, col: u8) -> Cell {
    Cell::new(row, col).expect("cell on board")
}

/// Board from three rows such as `"X.O"`, where `.` is empty.
pub fn board(rows: [&str; 3]) -> Board {
    let rows = rows
        .iter()
        .map(|row| {
            row.chars()
                .map(|c| match c {
                    'X' => Square::Occupied(Symbol::X),
                    'O' => Square::Occupied(Symbol::O),
                    _ => Square::Empty,
                })
                .collect()
        })
        .collect();
    Board::from_rows(rows).expect("3x3 board")
}

pub fn snapshot(board: Board, current: Symbol, human: Symbol) -> SessionSnapshot {
    SessionSnapshot {
        game_id: Some("game-1".to_string()),
        board,
        current_player: current,
        human_symbol: Some(human),
        ai_symbol: Some(human.opponent()),
        difficulty: Some(Difficulty::Hard),
        game_over: false,
        winner: None,
        message: None,
    }
}

pub fn new_game(human: Symbol) -> Reply {
    Reply::NewGame(Ok(NewGameReply {
        snapshot: snapshot(Board::new(), Symbol::X, human),
        ai_goes_first: human == Symbol::O,
    }))
}

pub fn moved(board: Board, current: Symbol) -> Reply {
    Reply::Move(Ok(MoveReply {
        board,
        current_player: Some(current),
        game_over: false,
        winner: None,
        ai_move: None,
        message: None,
    }))
}

pub fn finished(board: Board, winner: Winner) -> Reply {
    Reply::Move(Ok(MoveReply {
        board,
        current_player: None,
        game_over: true,
        winner: Some(winner),
        ai_move: None,
        message: None,
    }))
}
