//! Client configuration.

use crate::client::DEFAULT_EVENT_CAPACITY;
use crate::error::ConfigError;
use derive_getters::Getters;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};
use xenotic_board::{Difficulty, Symbol};

/// Environment variable that overrides the configured server URL.
pub const SERVER_URL_ENV: &str = "XENOTIC_SERVER_URL";

/// Settings for connecting to a XenoTic server and opening games.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct ClientConfig {
    /// Base URL of the game server.
    #[serde(default = "default_server_url")]
    server_url: String,

    /// Difficulty for new games.
    #[serde(default)]
    difficulty: Difficulty,

    /// Symbol the human plays in new games.
    #[serde(default = "default_human_symbol")]
    human_symbol: Symbol,

    /// Per-request timeout. Unset means wait for the server indefinitely.
    #[serde(default)]
    request_timeout_secs: Option<u64>,

    /// Events buffered per observer before slow observers start missing some.
    #[serde(default = "default_event_capacity")]
    event_capacity: usize,
}

#[instrument]
fn default_server_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

#[instrument]
fn default_human_symbol() -> Symbol {
    Symbol::X
}

#[instrument]
fn default_event_capacity() -> usize {
    DEFAULT_EVENT_CAPACITY
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            difficulty: Difficulty::default(),
            human_symbol: default_human_symbol(),
            request_timeout_secs: None,
            event_capacity: default_event_capacity(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self =
            toml::from_str(&content).map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        if config.server_url.trim().is_empty() {
            return Err(ConfigError::new("server_url must not be empty"));
        }

        info!(server_url = %config.server_url, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` when it exists, defaults otherwise.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            debug!("No config file; using defaults");
            Ok(Self::default())
        }
    }

    /// Applies `XENOTIC_SERVER_URL` if it is set.
    #[instrument(skip(self))]
    pub fn apply_env(self) -> Self {
        match std::env::var(SERVER_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => {
                debug!(server_url = %url, "Server URL taken from environment");
                self.with_server_url(url)
            }
            _ => self,
        }
    }
}
