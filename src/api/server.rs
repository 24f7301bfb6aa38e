use std::sync::Arc;

use anyhow::Result;
use axum::{Router, http::StatusCode, middleware};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use super::{gate, pages, routes};
use crate::api::state::{AppState, SharedState};
use crate::core::AppConfig;

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

pub fn app(shared_state: SharedState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        // API routes
        .nest("/api", routes::router())
        // Login and chat pages
        .merge(pages::router())
        // Registered before the layers so unknown paths under the
        // protected prefix are still gated
        .fallback(not_found)
        // Every request passes through the session gate first
        .layer(middleware::from_fn_with_state(
            Arc::clone(&shared_state),
            gate::session_gate,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::clone(&shared_state))
}

pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // axum logs rejections from built-in extractors with the `axum::rejection`
                // target, at `TRACE` level. `axum::rejection=trace` enables showing those events
                format! {
                    "{}=debug,tower_http=debug,axum::rejection=trace",
                    env!("CARGO_CRATE_NAME")
                }
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

// Run the server
pub async fn serve(host: String, port: String, config: AppConfig) -> Result<()> {
    init_tracing();

    if config.gateway.api_key.is_none() {
        tracing::warn!("No upstream API key configured, chat requests will fail");
    }
    if !config.github_configured() {
        tracing::warn!("GitHub OAuth client is not configured");
    }

    let shared_state = Arc::new(AppState::new(config));
    let app = app(Arc::clone(&shared_state));

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;

    tracing::debug!("Server started. Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
