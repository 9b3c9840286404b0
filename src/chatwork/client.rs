//! Chatwork REST client
//!
//! Every method issues exactly one authenticated request and hands the
//! upstream JSON back untouched. Inputs are not validated locally: room
//! existence, message length and assignee ids are Chatwork's business.

use crate::chatwork::RoomId;
use crate::config::CHATWORK_API_BASE_URL;
use crate::error::AppError;
use reqwest::{RequestBuilder, Response};
use serde_json::Value;
use std::fmt;

const TOKEN_HEADER: &str = "X-ChatWorkToken";

/// Client for the Chatwork v2 API
#[derive(Clone)]
pub struct ChatworkClient {
    http: reqwest::Client,
    api_token: String,
    base_url: String,
}

impl fmt::Debug for ChatworkClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatworkClient")
            .field("api_token", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ChatworkClient {
    /// Create a client against the public Chatwork API
    ///
    /// `http` is usually a shared client so connections are pooled across
    /// requests.
    pub fn new(http: reqwest::Client, api_token: impl Into<String>) -> Self {
        Self::with_base_url(http, api_token, CHATWORK_API_BASE_URL)
    }

    /// Create a client against a custom base URL (staging, tests)
    pub fn with_base_url(
        http: reqwest::Client,
        api_token: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            http,
            api_token: api_token.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Base URL requests are issued against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET /rooms - List the rooms the token's account belongs to
    ///
    /// # Errors
    /// * `AppError::Upstream` if Chatwork answers with status >= 400
    /// * `AppError::Transport` if the request fails or the body is not JSON
    pub async fn list_rooms(&self) -> Result<Value, AppError> {
        let url = format!("{}/rooms", self.base_url);
        tracing::debug!(url = %url, "Listing Chatwork rooms");

        self.execute(self.http.get(&url)).await
    }

    /// POST /rooms/{room_id}/messages - Post a message to a room
    ///
    /// # Errors
    /// * `AppError::Upstream` if Chatwork answers with status >= 400
    /// * `AppError::Transport` if the request fails or the body is not JSON
    pub async fn send_message(&self, room_id: RoomId, message: &str) -> Result<Value, AppError> {
        let url = format!("{}/rooms/{}/messages", self.base_url, room_id);
        tracing::debug!(
            url = %url,
            room_id = room_id,
            message_len = message.len(),
            "Sending Chatwork message"
        );

        self.execute(self.http.post(&url).form(&[("body", message)]))
            .await
    }

    /// POST /rooms/{room_id}/tasks - Create a task in a room
    ///
    /// `to_ids` is the comma-separated list of assignee account ids, passed
    /// through verbatim.
    ///
    /// # Errors
    /// * `AppError::Upstream` if Chatwork answers with status >= 400
    /// * `AppError::Transport` if the request fails or the body is not JSON
    pub async fn create_task(
        &self,
        room_id: RoomId,
        body: &str,
        to_ids: &str,
    ) -> Result<Value, AppError> {
        let url = format!("{}/rooms/{}/tasks", self.base_url, room_id);
        tracing::debug!(
            url = %url,
            room_id = room_id,
            to_ids = %to_ids,
            "Creating Chatwork task"
        );

        self.execute(
            self.http
                .post(&url)
                .form(&[("body", body), ("to_ids", to_ids)]),
        )
        .await
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Value, AppError> {
        let response = request
            .header(TOKEN_HEADER, &self.api_token)
            .send()
            .await
            .map_err(|e| {
                AppError::Transport(format!("Failed to send HTTP request to Chatwork: {}", e))
            })?;

        Self::parse_response(response).await
    }

    async fn parse_response(response: Response) -> Result<Value, AppError> {
        let status = response.status();
        if status.as_u16() >= 400 {
            let status_code = status.as_u16();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());

            tracing::error!(
                status_code = status_code,
                error_body = %error_body,
                "Chatwork API returned error status"
            );

            return Err(AppError::Upstream {
                status: status_code,
                body: error_body,
            });
        }

        let response_body = response.text().await.map_err(|e| {
            AppError::Transport(format!("Failed to read response body from Chatwork: {}", e))
        })?;

        serde_json::from_str(&response_body).map_err(|e| {
            AppError::Transport(format!(
                "Failed to parse JSON response from Chatwork: {} - Response body: {}",
                e, response_body
            ))
        })
    }
}
