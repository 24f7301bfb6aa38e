//! API routes module

pub mod chat;
pub mod session;

use axum::Router;

use crate::api::state::SharedState;

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Completion gateway
        .nest("/chat", chat::router())
        // Current session
        .nest("/session", session::router())
}
