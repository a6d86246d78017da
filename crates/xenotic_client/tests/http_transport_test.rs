//! HTTP binding tests against a stub server speaking the XenoTic JSON API.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use xenotic_client::{
    Cell, ClientErrorKind, Difficulty, GameSessionClient, GameTransport, HttpTransport, Phase, Symbol,
};

const COOKIE: &str = "session=stub-1";

#[derive(Debug, Default)]
struct Stub {
    board: Vec<Vec<String>>,
    human: String,
    ai: String,
    difficulty: String,
}

type Shared = Arc<Mutex<Stub>>;

impl Stub {
    fn state(&self) -> Value {
        json!({
            "game_id": "stub-1",
            "board": self.board,
            "current_player": self.human,
            "human_symbol": self.human,
            "ai_symbol": self.ai,
            "difficulty": self.difficulty,
            "game_over": false,
            "winner": null,
        })
    }

    fn clear(&mut self) {
        self.board = vec![vec![String::new(); 3]; 3];
    }
}

fn has_session(headers: &HeaderMap) -> bool {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains(COOKIE))
}

fn failure(status: StatusCode, error: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "success": false, "error": error })))
}

async fn new_game(State(stub): State<Shared>, Json(body): Json<Value>) -> impl IntoResponse {
    let mut stub = stub.lock().unwrap();
    stub.human = body["human_symbol"].as_str().unwrap_or("X").to_string();
    stub.ai = if stub.human == "X" { "O" } else { "X" }.to_string();
    stub.difficulty = body["difficulty"].as_str().unwrap_or("impossible").to_string();
    stub.clear();

    let ai_first = stub.human == "O";
    let message = if ai_first { "AI goes first!" } else { "Your turn!" };
    let mut state = stub.state();
    state["current_player"] = json!("X");
    (
        [(header::SET_COOKIE, format!("{COOKIE}; Path=/"))],
        Json(json!({
            "success": true,
            "game_id": "stub-1",
            "game_state": state,
            "ai_goes_first": ai_first,
            "message": message,
        })),
    )
}

async fn ai_first_move(State(stub): State<Shared>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !has_session(&headers) {
        return failure(StatusCode::BAD_REQUEST, "No active game");
    }
    let mut stub = stub.lock().unwrap();
    stub.board[1][1] = stub.ai.clone();
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "board": stub.board,
            "current_player": stub.human,
            "game_over": false,
            "winner": null,
            "ai_move": { "row": 1, "col": 1 },
        })),
    )
}

async fn make_move(State(stub): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if !has_session(&headers) {
        return failure(StatusCode::BAD_REQUEST, "No active game");
    }
    let row = body["row"].as_u64().unwrap_or(9) as usize;
    let col = body["col"].as_u64().unwrap_or(9) as usize;
    let mut stub = stub.lock().unwrap();
    if row > 2 || col > 2 || !stub.board[row][col].is_empty() {
        return failure(StatusCode::BAD_REQUEST, "Invalid move");
    }
    stub.board[row][col] = stub.human.clone();

    let reply = (0..9)
        .map(|i| (i / 3, i % 3))
        .find(|&(r, c)| stub.board[r][c].is_empty());
    let ai_move = reply.map(|(r, c)| {
        stub.board[r][c] = stub.ai.clone();
        json!({ "row": r, "col": c })
    });
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "board": stub.board,
            "current_player": stub.human,
            "game_over": false,
            "winner": null,
            "ai_move": ai_move,
        })),
    )
}

async fn hint() -> Json<Value> {
    Json(json!({ "success": true, "hint": { "row": 2, "col": 2 } }))
}

async fn reset_game(State(stub): State<Shared>) -> Json<Value> {
    let mut stub = stub.lock().unwrap();
    stub.clear();
    Json(json!({
        "success": true,
        "board": stub.board,
        "current_player": "X",
        "human_symbol": stub.human,
        "ai_symbol": stub.ai,
        "game_over": false,
        "message": "Game reset",
    }))
}

async fn game_state(State(stub): State<Shared>) -> Json<Value> {
    let stub = stub.lock().unwrap();
    Json(json!({ "success": true, "game_state": stub.state() }))
}

async fn change_difficulty() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "<html><body>Internal Server Error</body></html>")
}

async fn stats() -> Json<Value> {
    Json(json!({
        "success": true,
        "stats": {
            "total_games": 4,
            "human_wins": 1,
            "ai_wins": 2,
            "draws": 1,
            "human_win_rate": 25.0,
            "ai_win_rate": 50.0,
            "draw_rate": 25.0,
            "average_moves_per_game": 7.5,
            "active_games": 1
        }
    }))
}

/// Starts the stub on an ephemeral port and returns its base URL.
async fn serve() -> String {
    let app = Router::new()
        .route("/api/new-game", post(new_game))
        .route("/api/ai-first-move", post(ai_first_move))
        .route("/api/make-move", post(make_move))
        .route("/api/hint", get(hint))
        .route("/api/reset-game", post(reset_game))
        .route("/api/game-state", get(game_state))
        .route("/api/change-difficulty", post(change_difficulty))
        .route("/api/stats", get(stats))
        .with_state(Shared::default());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Stub server failed");
    });
    format!("http://{addr}/")
}

fn cell(row: u8, col: u8) -> Cell {
    Cell::new(row, col).expect("cell on board")
}

#[tokio::test]
async fn test_full_game_flow_over_http() {
    let url = serve().await;
    let transport = HttpTransport::new(url, Some(Duration::from_secs(5))).expect("Failed to build transport");
    assert!(!transport.base_url().ends_with('/'));
    let client = GameSessionClient::new(transport);

    let session = client
        .start_new_game(Difficulty::Hard, Symbol::O)
        .await
        .expect("Start failed");
    assert_eq!(session.board().occupied(), 1);
    assert_eq!(*session.last_ai_move(), Some(cell(1, 1)));
    assert_eq!(*session.difficulty(), Difficulty::Hard);
    assert_eq!(client.phase(), Phase::AwaitingHumanMove);

    let result = client.submit_move(0, 0).await.expect("Move failed");
    assert_eq!(result.ai_move, Some(cell(0, 1)));
    assert_eq!(result.session.board().occupied(), 3);

    let err = client.submit_move(0, 1).await.unwrap_err();
    assert_eq!(err.kind, ClientErrorKind::CellOccupied(cell(0, 1)));

    assert_eq!(client.request_hint().await.expect("Hint failed"), cell(2, 2));

    let refreshed = client.refresh().await.expect("Refresh failed");
    assert_eq!(refreshed.board(), result.session.board());

    let reset = client.reset().await.expect("Reset failed");
    assert_eq!(reset.board().occupied(), 1);
    assert_eq!(reset.message().as_deref(), Some("Game reset"));
    assert_eq!(client.phase(), Phase::AwaitingHumanMove);
}

#[tokio::test]
async fn test_missing_session_cookie_is_rejection() {
    let url = serve().await;
    let transport = HttpTransport::new(url, None).expect("Failed to build transport");

    let err = transport.make_move(cell(0, 0)).await.unwrap_err();
    assert_eq!(err.kind, ClientErrorKind::Rejected("No active game".to_string()));
}

#[tokio::test]
async fn test_html_error_page_is_transport_failure() {
    let url = serve().await;
    let transport = HttpTransport::new(url, None).expect("Failed to build transport");

    let err = transport.change_difficulty(Difficulty::Easy).await.unwrap_err();
    assert!(matches!(err.kind, ClientErrorKind::Transport(_)));
}

#[tokio::test]
async fn test_stats_decode() {
    let url = serve().await;
    let client = GameSessionClient::new(HttpTransport::new(url, None).expect("Failed to build transport"));

    let stats = client.server_stats().await.expect("Stats failed");
    assert_eq!(*stats.total_games(), 4);
    assert_eq!(*stats.ai_wins(), 2);
    assert!((stats.average_moves_per_game() - 7.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_unreachable_server_is_transport_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let addr = listener.local_addr().expect("No local address");
    drop(listener);

    let transport = HttpTransport::new(format!("http://{addr}"), Some(Duration::from_secs(2)))
        .expect("Failed to build transport");
    let err = transport.hint().await.unwrap_err();
    assert!(matches!(err.kind, ClientErrorKind::Transport(_)));
}
