//! Error types and error handling for the application
//!
//! Every failure a request can hit is represented by [`AppError`]. The
//! `IntoResponse` impl is the single place where error kinds become HTTP
//! statuses, so handlers only ever return `Result<_, AppError>`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// A required configuration value is missing or malformed
    #[error("{0}")]
    Config(String),

    /// Chatwork answered with a non-success HTTP status
    #[error("Chatwork API returned error status {status}: {body}")]
    Upstream {
        /// HTTP status code returned by Chatwork
        status: u16,
        /// Raw response body, or a placeholder when it could not be read
        body: String,
    },

    /// Chatwork could not be reached, or its response could not be read
    #[error("Failed to reach Chatwork API: {0}")]
    Transport(String),

    /// Request body could not be parsed
    #[error("{0}")]
    InvalidRequest(#[from] JsonRejection),

    /// Internal server error (catch-all for unexpected errors)
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Shorthand for a missing environment variable
    pub fn missing_env(name: &str) -> Self {
        AppError::Config(format!("{} is not set in the environment variables", name))
    }

    /// HTTP status this error maps to at the router boundary
    pub fn status_code(&self) -> StatusCode {
        // Configuration and upstream failures are not distinguished on the wire.
        match self {
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidRequest(rejection) => rejection.status(),
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = self.to_string();

        tracing::error!(
            status = status.as_u16(),
            detail = %detail,
            "Request failed"
        );

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
