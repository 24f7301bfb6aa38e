//! Session tokens and the gate that guards the chat view.
//!
//! Tokens are issued by the identity provider integration (or the
//! `token` CLI command in development). Nothing here talks to the
//! provider, it only validates what it's given.
mod gate;
mod session;

pub use gate::{GateDecision, LOGIN_PATH, PROTECTED_PREFIX, check, is_protected};
pub use session::{
    DEFAULT_MAX_AGE_SECS, SESSION_COOKIE, SessionClaims, SessionError, sign, verify,
};
