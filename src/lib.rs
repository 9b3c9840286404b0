//! Chatwork Proxy Library
//!
//! A small HTTP service that forwards message, task and room-listing
//! requests to the Chatwork REST API.
//! The binary in `src/main.rs` only wires up logging, config and the listener.

pub mod api;
pub mod chatwork;
pub mod config;
pub mod error;
pub mod middleware;
/// Shared application state
pub mod state;

use axum::{routing::get, Router};
use state::RouterState;

/// Build the full application router
///
/// The proxy routes are served both at the root and under `/chatwork`.
pub fn build_router(state: RouterState) -> Router {
    let router = Router::new()
        .route("/health", get(api::health::health_check))
        .merge(api::chatwork_routes())
        .nest("/chatwork", api::chatwork_routes())
        .with_state(state);

    middleware::with_middleware(router)
}
