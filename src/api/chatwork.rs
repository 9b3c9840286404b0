//! Chatwork proxy API handlers
//!
//! Each operation resolves what it needs from configuration, makes a single
//! upstream call and wraps the upstream JSON in a response envelope. Failures
//! are returned as `AppError` and mapped to a 500 `{detail}` body.

use crate::error::AppError;
use crate::state::{AppState, RouterState};
use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

/// Successful response wrapping the upstream JSON
#[derive(Debug, Serialize, PartialEq)]
pub struct SuccessEnvelope {
    /// Always `"success"`
    pub status: String,
    /// Upstream response, unmodified
    pub data: Value,
}

impl SuccessEnvelope {
    fn new(data: Value) -> Self {
        Self {
            status: "success".to_string(),
            data,
        }
    }
}

/// Room list response
#[derive(Debug, Serialize, PartialEq)]
pub struct RoomsResponse {
    /// Upstream room array, unmodified
    pub rooms: Value,
}

/// Send message request
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    /// Message body to post
    pub message: String,
}

/// Create task request
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    /// Task description
    pub body: String,
    /// Comma-separated assignee account ids
    pub to_ids: String,
}

/// Post a message to the configured room
///
/// # Errors
/// * `AppError::Config` if `ROOM_ID` or `API_TOKEN` is missing or malformed
/// * `AppError::Upstream` / `AppError::Transport` if the Chatwork call fails
pub async fn handle_send_message(
    state: &AppState,
    message: &str,
) -> Result<SuccessEnvelope, AppError> {
    let room_id = state.config.chatwork.room_id()?;
    let client = state.chatwork_client()?;

    let data = client.send_message(room_id, message).await?;
    info!(room_id = room_id, "Message sent to Chatwork");

    Ok(SuccessEnvelope::new(data))
}

/// Create a task in the configured room
///
/// # Errors
/// * `AppError::Config` if `ROOM_ID` or `API_TOKEN` is missing or malformed
/// * `AppError::Upstream` / `AppError::Transport` if the Chatwork call fails
pub async fn handle_create_task(
    state: &AppState,
    body: &str,
    to_ids: &str,
) -> Result<SuccessEnvelope, AppError> {
    let room_id = state.config.chatwork.room_id()?;
    let client = state.chatwork_client()?;

    let data = client.create_task(room_id, body, to_ids).await?;
    info!(room_id = room_id, to_ids = %to_ids, "Task created in Chatwork");

    Ok(SuccessEnvelope::new(data))
}

/// List the rooms visible to the configured token
///
/// # Errors
/// * `AppError::Config` if `API_TOKEN` is missing
/// * `AppError::Upstream` / `AppError::Transport` if the Chatwork call fails
pub async fn handle_list_rooms(state: &AppState) -> Result<RoomsResponse, AppError> {
    let client = state.chatwork_client()?;
    let rooms = client.list_rooms().await?;
    info!("Fetched Chatwork rooms");

    Ok(RoomsResponse { rooms })
}

/// POST /send_message - Send a message to the configured room
pub async fn send_message(
    State(state): State<RouterState>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<Json<SuccessEnvelope>, AppError> {
    let Json(request) = payload?;
    handle_send_message(&state, &request.message).await.map(Json)
}

/// POST /create_task - Create a task in the configured room
pub async fn create_task(
    State(state): State<RouterState>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<Json<SuccessEnvelope>, AppError> {
    let Json(request) = payload?;
    handle_create_task(&state, &request.body, &request.to_ids)
        .await
        .map(Json)
}

/// GET /get_rooms - List rooms
pub async fn get_rooms(
    State(state): State<RouterState>,
) -> Result<Json<RoomsResponse>, AppError> {
    handle_list_rooms(&state).await.map(Json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ChatworkConfig, Config, ServerConfig};
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn create_test_state(base_url: &str, room_id: Option<&str>) -> RouterState {
        let config = Config {
            server: ServerConfig {
                port: 0,
                host: "127.0.0.1".to_string(),
            },
            chatwork: ChatworkConfig {
                api_token: Some("test_api_token".to_string()),
                room_id: room_id.map(str::to_string),
                base_url: base_url.to_string(),
                timeout_secs: None,
            },
        };
        AppState::new(config).unwrap().shared()
    }

    #[tokio::test]
    async fn test_send_message() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/rooms/12345/messages")
            .match_header("x-chatworktoken", "test_api_token")
            .match_body(Matcher::UrlEncoded(
                "body".into(),
                "Hello, Chatwork!".into(),
            ))
            .with_status(200)
            .with_body(r#"{"message_id": "123"}"#)
            .expect(1)
            .create_async()
            .await;

        let state = create_test_state(&server.url(), Some("12345"));
        let request = SendMessageRequest {
            message: "Hello, Chatwork!".to_string(),
        };
        let result = send_message(State(state), Ok(Json(request))).await;

        mock.assert_async().await;
        let Json(envelope) = result.unwrap();
        assert_eq!(envelope.status, "success");
        assert_eq!(envelope.data, json!({ "message_id": "123" }));
    }

    #[tokio::test]
    async fn test_create_task() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/rooms/12345/tasks")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("body".into(), "Complete this task".into()),
                Matcher::UrlEncoded("to_ids".into(), "1,2,3".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"task_id": "456"}"#)
            .expect(1)
            .create_async()
            .await;

        let state = create_test_state(&server.url(), Some("12345"));
        let request = CreateTaskRequest {
            body: "Complete this task".to_string(),
            to_ids: "1,2,3".to_string(),
        };
        let result = create_task(State(state), Ok(Json(request))).await;

        mock.assert_async().await;
        let Json(envelope) = result.unwrap();
        assert_eq!(envelope, SuccessEnvelope::new(json!({ "task_id": "456" })));
    }

    #[tokio::test]
    async fn test_get_rooms() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/rooms")
            .with_status(200)
            .with_body(r#"[{"room_id": 1, "name": "General"}]"#)
            .expect(1)
            .create_async()
            .await;

        // Listing rooms does not need a room id
        let state = create_test_state(&server.url(), None);
        let Json(response) = get_rooms(State(state)).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.rooms, json!([{ "room_id": 1, "name": "General" }]));
    }

    #[tokio::test]
    async fn test_missing_room_id_makes_no_upstream_call() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let state = create_test_state(&server.url(), None);
        let err = handle_send_message(&state, "Hello").await.unwrap_err();

        mock.assert_async().await;
        assert!(err
            .to_string()
            .contains("ROOM_ID is not set in the environment variables"));
    }

    #[tokio::test]
    async fn test_non_integer_room_id() {
        let server = Server::new_async().await;
        let state = create_test_state(&server.url(), Some("not-a-room"));

        let err = handle_create_task(&state, "b", "1").await.unwrap_err();
        match err {
            AppError::Config(msg) => assert!(msg.contains("ROOM_ID must be an integer")),
            other => panic!("Expected Config error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_upstream_error_is_propagated() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/rooms/12345/tasks")
            .with_status(400)
            .with_body(r#"{"errors": ["Invalid to_ids"]}"#)
            .create_async()
            .await;

        let state = create_test_state(&server.url(), Some("12345"));
        let err = handle_create_task(&state, "b", "x").await.unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err, AppError::Upstream { status: 400, .. }));
        assert!(!err.to_string().is_empty());
    }
}
