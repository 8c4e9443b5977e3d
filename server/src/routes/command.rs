//! `POST /api/ai-command` — natural-language canvas commands.
//!
//! Maps the command pipeline onto HTTP: 400 for malformed requests, 500/429
//! for configuration and provider failures, and 200 with `success:false` for
//! anything the model got wrong.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::Serialize;
use tracing::{error, warn};

use crate::actions::Action;
use crate::canvas::parse_command_request;
use crate::error::ErrorCode;
use crate::services::command::{CommandError, CommandOutcome, run_command};
use crate::state::AppState;

const NOT_CONFIGURED_MESSAGE: &str = "Server configuration error: AI service is not configured";
const RATE_LIMITED_MESSAGE: &str = "AI service is busy, please try again shortly";

/// JSON envelope returned by the command endpoint.
#[derive(Debug, Default, Serialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<Action>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
}

impl CommandResponse {
    fn failure(error: impl Into<String>, code: &'static str) -> Self {
        Self { error: Some(error.into()), code: Some(code), ..Self::default() }
    }
}

type Reply = (StatusCode, Json<CommandResponse>);

pub async fn ai_command(State(state): State<AppState>, body: Bytes) -> Reply {
    let Some(llm) = state.llm.clone() else {
        error!("ai-command: LLM not configured");
        return command_error(&CommandError::LlmNotConfigured);
    };

    let request = match parse_command_request(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!(field = %e.field, error = %e.message, "ai-command: invalid request");
            return (StatusCode::BAD_REQUEST, Json(CommandResponse::failure(e.to_string(), e.error_code())));
        }
    };

    match run_command(llm.as_ref(), state.config.ai_max_tokens, &request).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome_response(outcome))),
        Err(e) => command_error(&e),
    }
}

/// 405 for anything other than POST and OPTIONS.
pub async fn method_not_allowed() -> Reply {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(CommandResponse { error: Some("Method not allowed".into()), ..CommandResponse::default() }),
    )
}

pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

fn outcome_response(outcome: CommandOutcome) -> CommandResponse {
    match outcome {
        CommandOutcome::Applied { message, actions } => {
            CommandResponse { success: true, message: Some(message), actions: Some(actions), ..CommandResponse::default() }
        }
        CommandOutcome::NotACommand { explanation } => CommandResponse {
            message: Some(explanation),
            code: Some("E_NOT_A_COMMAND"),
            ..CommandResponse::default()
        },
        CommandOutcome::Rejected { explanation, error, code } => CommandResponse {
            message: Some(explanation).filter(|m| !m.is_empty()),
            ..CommandResponse::failure(error, code)
        },
    }
}

fn command_error(err: &CommandError) -> Reply {
    let (status, message) = match err {
        CommandError::LlmNotConfigured => (StatusCode::INTERNAL_SERVER_ERROR, NOT_CONFIGURED_MESSAGE.to_string()),
        CommandError::Llm(_) if err.is_rate_limited() => (StatusCode::TOO_MANY_REQUESTS, RATE_LIMITED_MESSAGE.to_string()),
        CommandError::Llm(_) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    };
    (status, Json(CommandResponse::failure(message, err.error_code())))
}

#[cfg(test)]
#[path = "command_test.rs"]
mod tests;
