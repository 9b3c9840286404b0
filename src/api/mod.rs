//! API module
//!
//! Contains HTTP request handlers and the route table for the proxy

pub mod chatwork;
pub mod health;

use crate::state::RouterState;
use axum::{
    routing::{get, post},
    Router,
};

/// Routes for the three proxied Chatwork operations
pub fn chatwork_routes() -> Router<RouterState> {
    Router::new()
        .route("/send_message", post(chatwork::send_message))
        .route("/create_task", post(chatwork::create_task))
        .route("/get_rooms", get(chatwork::get_rooms))
}
