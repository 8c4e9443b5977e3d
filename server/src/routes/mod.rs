//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the command endpoint (plus its legacy alias) and a health check
//! under a single Axum router with open CORS and request tracing.

pub mod command;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{MethodRouter, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/ai-command", command_route())
        .route("/api/ai/command", command_route())
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn command_route() -> MethodRouter<AppState> {
    post(command::ai_command)
        .options(command::preflight)
        .fallback(command::method_not_allowed)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
