//! Command service — prompt + canvas → model → normalized actions.
//!
//! DESIGN
//! ======
//! One forced tool call per request, no retries. Transport and provider
//! failures surface as [`CommandError`]; everything the model says, including
//! garbage, becomes a [`CommandOutcome`] so the route can answer with a soft
//! failure instead of a server error.

use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::prompt::{build_system_prompt, build_user_message};
use crate::actions::Action;
use crate::actions::normalize::{ModelReply, normalize_actions};
use crate::actions::schema::{COMMAND_TOOL_NAME, command_tool};
use crate::canvas::CommandRequest;
use crate::error::ErrorCode;
use crate::llm::LlmChat;
use crate::llm::types::{ChatRequest, LlmError, Message};

/// Error text returned when the model reply cannot be interpreted.
pub const INVALID_MODEL_OUTPUT: &str = "AI returned an invalid response";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("LLM not configured")]
    LlmNotConfigured,
    #[error("AI service error: {0}")]
    Llm(#[from] LlmError),
}

impl CommandError {
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::Llm(e) if e.is_rate_limited())
    }
}

impl ErrorCode for CommandError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::LlmNotConfigured => "E_LLM_NOT_CONFIGURED",
            Self::Llm(e) if e.is_rate_limited() => "E_RATE_LIMITED",
            Self::Llm(_) => "E_LLM_ERROR",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Llm(e) if e.retryable())
    }
}

/// What the model made of a command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// Actions ready for the client to apply.
    Applied { message: String, actions: Vec<Action> },
    /// The model declined, or produced no actions.
    NotACommand { explanation: String },
    /// The model's reply was unusable or failed normalization.
    Rejected { explanation: String, error: String, code: &'static str },
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Run one command through the model and normalize the result.
///
/// # Errors
///
/// Returns [`CommandError::Llm`] when the provider call itself fails.
pub async fn run_command(
    llm: &dyn LlmChat,
    max_tokens: u32,
    request: &CommandRequest,
) -> Result<CommandOutcome, CommandError> {
    let request_id = Uuid::new_v4();
    info!(
        %request_id,
        prompt_len = request.prompt.len(),
        shapes = request.canvas_state.shapes.len(),
        model = llm.model(),
        "command: received"
    );

    let system = build_system_prompt(&request.canvas_state);
    let messages = [Message::user(build_user_message(&request.prompt))];
    let tools = [command_tool()];

    let response = llm
        .chat(ChatRequest {
            max_tokens,
            system: &system,
            messages: &messages,
            tools: Some(&tools),
            tool_choice: Some(COMMAND_TOOL_NAME),
        })
        .await
        .inspect_err(|e| warn!(%request_id, error = %e, code = e.error_code(), "command: LLM call failed"))?;

    info!(
        %request_id,
        stop_reason = %response.stop_reason,
        input_tokens = response.input_tokens,
        output_tokens = response.output_tokens,
        "command: LLM response"
    );

    let Some(input) = response.tool_input(COMMAND_TOOL_NAME) else {
        warn!(%request_id, "command: no tool call in model reply");
        return Ok(invalid_output(response.text().unwrap_or_default()));
    };
    let reply = match ModelReply::deserialize(input) {
        Ok(reply) => reply,
        Err(e) => {
            warn!(%request_id, error = %e, "command: unparseable tool input");
            return Ok(invalid_output(String::new()));
        }
    };

    Ok(interpret_reply(request_id, reply))
}

fn invalid_output(explanation: String) -> CommandOutcome {
    CommandOutcome::Rejected {
        explanation,
        error: INVALID_MODEL_OUTPUT.to_string(),
        code: "E_INVALID_MODEL_OUTPUT",
    }
}

fn interpret_reply(request_id: Uuid, reply: ModelReply) -> CommandOutcome {
    if !reply.is_valid_command || reply.actions.is_empty() {
        info!(%request_id, valid = reply.is_valid_command, "command: not an actionable command");
        return CommandOutcome::NotACommand { explanation: reply.explanation };
    }

    match normalize_actions(&reply.actions) {
        Ok(actions) => {
            let kinds: Vec<&str> = actions.iter().map(Action::type_name).collect();
            info!(%request_id, actions = actions.len(), ?kinds, "command: actions normalized");
            CommandOutcome::Applied { message: reply.explanation, actions }
        }
        Err(e) => {
            warn!(%request_id, error = %e, "command: action rejected");
            CommandOutcome::Rejected { explanation: reply.explanation, error: e.to_string(), code: e.error_code() }
        }
    }
}

#[cfg(test)]
#[path = "command_test.rs"]
mod tests;
