//! HTTP transport for the XenoTic server.

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::transport::{GameTransport, MoveReply, NewGameReply, ServerStats, SessionSnapshot};
use crate::wire::{
    self, DifficultyRequest, HintResponse, MoveRequest, MoveResponse, NewGameRequest, SnapshotResponse,
    StatsResponse,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use xenotic_board::{Cell, Difficulty, Symbol};

/// Game transport speaking the server's JSON API.
///
/// The server keys the active game to a session cookie, so the underlying
/// client keeps a cookie store for its whole lifetime.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTransport {
    /// Creates a transport for the server at `base_url`.
    #[instrument(skip_all)]
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder().cookie_store(true);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        info!(base_url = %base_url, ?timeout, "HTTP transport ready");
        Ok(Self { base_url, client })
    }

    /// Creates a transport from client configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::new(
            config.server_url().clone(),
            config.request_timeout_secs().map(Duration::from_secs),
        )
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<R: DeserializeOwned>(&self, request: reqwest::RequestBuilder, path: &str) -> Result<R, ClientError> {
        let response = request.send().await.map_err(|e| {
            error!(error = %e, path, "Request failed");
            ClientError::transport(format!("{path}: {e}"))
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!(error = %e, path, "Failed to read response body");
            ClientError::transport(format!("{path}: {e}"))
        })?;
        debug!(status = %status, path, body = %body, "Got response");

        wire::decode(status.as_u16(), &body)
    }

    async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ClientError> {
        self.send(self.client.get(self.url(path)), path).await
    }

    async fn post<B: serde::Serialize + Sync, R: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<R, ClientError> {
        let mut request = self.client.post(self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        self.send(request, path).await
    }
}

#[async_trait]
impl GameTransport for HttpTransport {
    #[instrument(skip(self))]
    async fn new_game(&self, difficulty: Difficulty, human_symbol: Symbol) -> Result<NewGameReply, ClientError> {
        let body = NewGameRequest::new(difficulty, human_symbol);
        self.post::<_, SnapshotResponse>("/api/new-game", Some(&body))
            .await?
            .into_new_game()
    }

    #[instrument(skip(self))]
    async fn ai_first_move(&self) -> Result<MoveReply, ClientError> {
        self.post::<(), MoveResponse>("/api/ai-first-move", None)
            .await?
            .into_reply()
    }

    #[instrument(skip(self), fields(cell = %cell))]
    async fn make_move(&self, cell: Cell) -> Result<MoveReply, ClientError> {
        let body = MoveRequest::new(cell.row(), cell.col());
        self.post::<_, MoveResponse>("/api/make-move", Some(&body))
            .await?
            .into_reply()
    }

    #[instrument(skip(self))]
    async fn change_difficulty(&self, difficulty: Difficulty) -> Result<SessionSnapshot, ClientError> {
        let body = DifficultyRequest::new(difficulty);
        self.post::<_, SnapshotResponse>("/api/change-difficulty", Some(&body))
            .await?
            .into_snapshot()
    }

    #[instrument(skip(self))]
    async fn hint(&self) -> Result<Cell, ClientError> {
        self.get::<HintResponse>("/api/hint").await?.into_cell()
    }

    #[instrument(skip(self))]
    async fn reset(&self) -> Result<SessionSnapshot, ClientError> {
        self.post::<(), SnapshotResponse>("/api/reset-game", None)
            .await?
            .into_snapshot()
    }

    #[instrument(skip(self))]
    async fn game_state(&self) -> Result<SessionSnapshot, ClientError> {
        self.get::<SnapshotResponse>("/api/game-state")
            .await?
            .into_snapshot()
    }

    #[instrument(skip(self))]
    async fn stats(&self) -> Result<ServerStats, ClientError> {
        Ok(self.get::<StatsResponse>("/api/stats").await?.into_stats())
    }
}
