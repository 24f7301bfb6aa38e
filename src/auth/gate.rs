use chrono::{DateTime, Utc};

use super::session::{SessionClaims, verify};

pub const PROTECTED_PREFIX: &str = "/chat";
pub const LOGIN_PATH: &str = "/auth";

#[derive(Debug, PartialEq)]
pub enum GateDecision {
    /// Let the request through. Carries the verified session when the
    /// path was protected.
    Allow(Option<SessionClaims>),
    RedirectTo(String),
}

/// Matches the prefix itself and anything nested under it, but not
/// siblings that happen to share the prefix (`/chatter`).
pub fn is_protected(path: &str) -> bool {
    path == PROTECTED_PREFIX
        || path
            .strip_prefix(PROTECTED_PREFIX)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Decide whether a request may continue. Pure so it can be tested
/// without a server.
pub fn check(
    path: &str,
    token: Option<&str>,
    secret: &str,
    now: DateTime<Utc>,
) -> GateDecision {
    if !is_protected(path) {
        return GateDecision::Allow(None);
    }

    let Some(token) = token else {
        tracing::info!("No session token for {}, redirecting to login", path);
        return GateDecision::RedirectTo(LOGIN_PATH.to_string());
    };

    match verify(token, secret, now) {
        Ok(claims) => GateDecision::Allow(Some(claims)),
        Err(e) => {
            tracing::info!("Rejected session for {}: {}", path, e);
            GateDecision::RedirectTo(LOGIN_PATH.to_string())
        }
    }
}
