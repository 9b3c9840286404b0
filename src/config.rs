//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.
//!
//! The Chatwork credentials are kept as raw strings and only validated when a
//! request needs them, so a missing `API_TOKEN` or `ROOM_ID` surfaces as a
//! per-request error instead of a startup failure.

use crate::chatwork::RoomId;
use crate::error::AppError;
use std::env;
use std::fmt;
use std::time::Duration;

/// Default Chatwork REST API base URL
pub const CHATWORK_API_BASE_URL: &str = "https://api.chatwork.com/v2";

const API_TOKEN_VAR: &str = "API_TOKEN";
const ROOM_ID_VAR: &str = "ROOM_ID";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Chatwork configuration
    pub chatwork: ChatworkConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// Chatwork configuration
#[derive(Clone)]
pub struct ChatworkConfig {
    /// API token sent as `X-ChatWorkToken`
    pub api_token: Option<String>,
    /// Destination room, unparsed
    pub room_id: Option<String>,
    /// REST API base URL
    pub base_url: String,
    /// Transport timeout for upstream calls; `None` keeps the client default
    pub timeout_secs: Option<u64>,
}

impl fmt::Debug for ChatworkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatworkConfig")
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("room_id", &self.room_id)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for ChatworkConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            room_id: None,
            base_url: CHATWORK_API_BASE_URL.to_string(),
            timeout_secs: None,
        }
    }
}

impl ChatworkConfig {
    /// Resolve the API token
    ///
    /// # Errors
    /// * `AppError::Config` if the token is unset or empty
    pub fn api_token(&self) -> Result<&str, AppError> {
        match self.api_token.as_deref() {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(AppError::missing_env(API_TOKEN_VAR)),
        }
    }

    /// Resolve the destination room identifier
    ///
    /// # Errors
    /// * `AppError::Config` if the room id is unset, empty, or not an integer
    pub fn room_id(&self) -> Result<RoomId, AppError> {
        let raw = match self.room_id.as_deref() {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Err(AppError::missing_env(ROOM_ID_VAR)),
        };

        raw.trim().parse::<RoomId>().map_err(|_| {
            AppError::Config(format!(
                "{} must be an integer, got '{}'",
                ROOM_ID_VAR, raw
            ))
        })
    }

    /// Transport timeout as a `Duration`, if configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8000),
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            },
            chatwork: ChatworkConfig {
                api_token: env::var(API_TOKEN_VAR).ok(),
                room_id: env::var(ROOM_ID_VAR).ok(),
                base_url: env::var("CHATWORK_API_BASE_URL")
                    .unwrap_or_else(|_| CHATWORK_API_BASE_URL.to_string()),
                timeout_secs: env::var("CHATWORK_TIMEOUT_SECS")
                    .ok()
                    .and_then(|t| t.parse().ok()),
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
