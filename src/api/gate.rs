//! Wiring the session gate into the request pipeline.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, StatusCode, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use serde_json::json;

use crate::api::state::SharedState;
use crate::auth::{GateDecision, SESSION_COOKIE, SessionClaims, check, verify};

/// Find the session token in the session cookie, falling back to a
/// bearer token for non-browser clients.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
}

/// Runs ahead of every route. Requests for the protected view without
/// a valid session are redirected to the login page, everything else
/// passes through unchanged.
pub async fn session_gate(
    State(state): State<SharedState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = session_token(request.headers());
    let decision = check(
        request.uri().path(),
        token.as_deref(),
        &state.config.session_secret,
        Utc::now(),
    );

    match decision {
        GateDecision::RedirectTo(path) => Redirect::temporary(&path).into_response(),
        GateDecision::Allow(session) => {
            if let Some(claims) = session {
                request.extensions_mut().insert(claims);
            }
            next.run(request).await
        }
    }
}

/// Extracts the verified session for the current request. Uses the
/// claims the gate already verified when there are some.
pub struct CurrentSession(pub SessionClaims);

impl FromRequestParts<SharedState> for CurrentSession {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(claims) = parts.extensions.get::<SessionClaims>() {
            return Ok(CurrentSession(claims.clone()));
        }

        let unauthorized = |msg: String| {
            (StatusCode::UNAUTHORIZED, Json(json!({ "error": msg }))).into_response()
        };

        let token =
            session_token(&parts.headers).ok_or_else(|| unauthorized("Not authenticated".into()))?;
        verify(&token, &state.config.session_secret, Utc::now())
            .map(CurrentSession)
            .map_err(|e| unauthorized(e.to_string()))
    }
}
