//! Router for the chat API

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};

use super::public;
use crate::ai::gateway::GatewayError;
use crate::api::state::SharedState;

/// Every failure kind is reported as a 500 so existing clients that
/// only check for success keep working.
fn status_for(_err: &GatewayError) -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let body = public::ChatErrorResponse::from(&self);
        (status_for(&self), Json(body)).into_response()
    }
}

/// Forward the transcript to the upstream completion API and respond
/// with the next assistant message
async fn chat_handler(
    State(state): State<SharedState>,
    payload: Result<Json<public::ChatRequest>, JsonRejection>,
) -> Result<Json<public::ChatResponse>, GatewayError> {
    // A body that can't be parsed is reported in the same shape as
    // any other failure instead of axum's plain text rejection
    let Json(payload) = payload.map_err(|rejection| {
        tracing::error!("Invalid chat request: {}", rejection.body_text());
        GatewayError::Internal(rejection.body_text())
    })?;

    let content = state.gateway.complete(&payload.messages).await?;

    Ok(Json(public::ChatResponse::new(&content)))
}

/// Create the chat router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", post(chat_handler))
}
