//! Router for the session API

use axum::{Json, Router, routing::get};

use super::public;
use crate::api::gate::CurrentSession;
use crate::api::state::SharedState;

/// Get the session for the token sent with the request
async fn session_handler(CurrentSession(claims): CurrentSession) -> Json<public::SessionResponse> {
    Json(public::SessionResponse::from(claims))
}

/// Create the session router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", get(session_handler))
}
