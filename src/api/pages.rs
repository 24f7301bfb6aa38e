//! Server rendered pages: the login page and the protected chat
//! page. Handlebars escapes everything it interpolates which matters
//! here since names come from the identity provider.

use std::fmt;

use axum::{
    Router,
    extract::{Request, State},
    http::{HeaderValue, header},
    middleware::{self, Next},
    response::{Html, Response},
    routing::get,
};
use handlebars::Handlebars;
use serde_json::json;

use super::gate::CurrentSession;
use super::public::ApiError;
use super::state::SharedState;
use crate::core::AppConfig;

#[derive(Debug)]
pub enum Page {
    Auth,
    Chat,
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

const LAYOUT_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{{assistant_name}}</title>
<meta name="description" content="AI chat with GitHub sign in">
</head>
<body>
"#;

const AUTH_PAGE: &str = r#"{{> head}}
<main class="card">
  <h1>Register</h1>
  <p>Use your GitHub account to access the chat</p>
  <p>This application does not store any personal data. It only uses your GitHub account to authenticate you.</p>
  <p>The AI response may take some time as it uses a free model.</p>
  {{#if authorize_url}}
  <a class="button" href="{{authorize_url}}">Access with GitHub</a>
  {{else}}
  <p class="error">GitHub sign in is not configured.</p>
  {{/if}}
</main>
</body>
</html>
"#;

const CHAT_PAGE: &str = r#"{{> head}}
<main class="card">
  <h1>AI Chat - Home</h1>
  <p>Welcome, {{user_name}}! Ask me anything!</p>
  <p>Messages are sent to <code>POST /api/chat</code> and are not stored.</p>
</main>
</body>
</html>
"#;

pub fn templates() -> Handlebars<'static> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    registry
        .register_partial("head", LAYOUT_HEAD)
        .expect("Failed to register partial");
    registry
        .register_template_string(&Page::Auth.to_string(), AUTH_PAGE)
        .expect("Failed to register template");
    registry
        .register_template_string(&Page::Chat.to_string(), CHAT_PAGE)
        .expect("Failed to register template");
    registry
}

/// The identity provider's authorization URL, or `None` when no
/// client is configured.
pub fn github_authorize_url(config: &AppConfig) -> Option<String> {
    if config.github_client_id.is_empty() {
        return None;
    }
    let redirect_uri = format!(
        "{}/api/auth/callback/github",
        config.public_url.trim_end_matches('/')
    );
    Some(format!(
        "https://github.com/login/oauth/authorize?client_id={}&redirect_uri={}&scope={}",
        urlencoding::encode(&config.github_client_id),
        urlencoding::encode(&redirect_uri),
        urlencoding::encode("read:user user:email")
    ))
}

async fn auth_page(State(state): State<SharedState>) -> Result<Html<String>, ApiError> {
    let html = state.templates.render(
        &Page::Auth.to_string(),
        &json!({
            "assistant_name": state.config.assistant_name,
            "authorize_url": github_authorize_url(&state.config),
        }),
    )?;
    Ok(Html(html))
}

async fn chat_page(
    State(state): State<SharedState>,
    CurrentSession(claims): CurrentSession,
) -> Result<Html<String>, ApiError> {
    let html = state.templates.render(
        &Page::Chat.to_string(),
        &json!({
            "assistant_name": state.config.assistant_name,
            "user_name": claims.display_name(),
        }),
    )?;
    Ok(Html(html))
}

/// Pages depend on the session so they should never be cached
async fn set_no_cache(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    response
}

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/auth", get(auth_page))
        .route("/chat", get(chat_page))
        .layer(middleware::from_fn(set_no_cache))
}
