//! Shared application state
//!
//! Immutable for the lifetime of the process: the configuration loaded at
//! startup and one pooled HTTP client reused by every upstream call.

use crate::chatwork::ChatworkClient;
use crate::config::Config;
use crate::error::AppError;
use anyhow::anyhow;
use std::sync::Arc;

/// State handle passed to every handler
pub type RouterState = Arc<AppState>;

/// Application state
#[derive(Debug)]
pub struct AppState {
    /// Configuration loaded at startup
    pub config: Config,
    http: reqwest::Client,
}

impl AppState {
    /// Build the state, creating the shared HTTP client
    ///
    /// # Errors
    /// * `AppError::Internal` if the HTTP client cannot be constructed
    pub fn new(config: Config) -> Result<Self, AppError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.chatwork.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| AppError::Internal(anyhow!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, http })
    }

    /// Wrap the state for use with `Router::with_state`
    pub fn shared(self) -> RouterState {
        Arc::new(self)
    }

    /// Build a Chatwork client for the current request
    ///
    /// The token is resolved here rather than at startup, so a missing
    /// `API_TOKEN` fails the request instead of the process.
    ///
    /// # Errors
    /// * `AppError::Config` if the API token is not configured
    pub fn chatwork_client(&self) -> Result<ChatworkClient, AppError> {
        let token = self.config.chatwork.api_token()?;
        Ok(ChatworkClient::with_base_url(
            self.http.clone(),
            token,
            self.config.chatwork.base_url.as_str(),
        ))
    }
}
