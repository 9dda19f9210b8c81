//! Route handlers.

pub mod chat;
pub mod health;
pub mod summary;

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;

use crate::request_id::propagate_request_id;
use crate::state::AppState;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Build the router with all routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/summary", post(summary::summary))
        .route("/chat", post(chat::chat))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(middleware::from_fn(propagate_request_id))
        .with_state(state)
}
