use super::*;
use crate::actions::RectangleParams;
use crate::canvas::parse_command_request;
use crate::state::test_helpers::{MockLlm, text_response, valid_reply};
use serde_json::json;

fn request(prompt: &str) -> CommandRequest {
    let body = json!({ "prompt": prompt, "canvasState": { "shapes": [] } });
    parse_command_request(body.to_string().as_bytes()).unwrap()
}

// =============================================================================
// run_command — success
// =============================================================================

#[tokio::test]
async fn red_rectangle_is_normalized() {
    let llm = MockLlm::replying(valid_reply(
        "Creating a red rectangle",
        json!([{ "type": "createRectangle", "parameters": { "x": 100.4, "y": 99.6, "width": 200, "height": 100, "color": "red" } }]),
    ));
    let outcome = run_command(&llm, 4096, &request("create a red rectangle at 100,100"))
        .await
        .unwrap();
    assert_eq!(
        outcome,
        CommandOutcome::Applied {
            message: "Creating a red rectangle".into(),
            actions: vec![Action::CreateRectangle(RectangleParams {
                x: 100,
                y: 100,
                width: 200,
                height: 100,
                color: "#ef4444".into(),
            })],
        }
    );
}

#[tokio::test]
async fn request_forces_command_tool_and_wraps_prompt() {
    let llm = MockLlm::replying(valid_reply("ok", json!([])));
    run_command(&llm, 1234, &request("draw")).await.unwrap();

    let call = llm.recorded();
    assert_eq!(call.max_tokens, 1234);
    assert_eq!(call.user, "<user_input>draw</user_input>");
    assert_eq!(call.tool_names, vec![COMMAND_TOOL_NAME.to_string()]);
    assert_eq!(call.tool_choice.as_deref(), Some(COMMAND_TOOL_NAME));
    assert!(call.system.contains("the canvas is empty"));
}

// =============================================================================
// run_command — soft failures
// =============================================================================

#[tokio::test]
async fn invalid_command_returns_explanation() {
    let llm = MockLlm::replying(json!({
        "isValidCommand": false,
        "explanation": "That is not a drawing request",
        "actions": []
    }));
    let outcome = run_command(&llm, 4096, &request("what's the weather?"))
        .await
        .unwrap();
    assert_eq!(outcome, CommandOutcome::NotACommand { explanation: "That is not a drawing request".into() });
}

#[tokio::test]
async fn empty_action_list_is_not_a_command() {
    let llm = MockLlm::replying(valid_reply("Nothing to do", json!([])));
    let outcome = run_command(&llm, 4096, &request("hmm")).await.unwrap();
    assert!(matches!(outcome, CommandOutcome::NotACommand { .. }));
}

#[tokio::test]
async fn oversized_bulk_create_is_rejected() {
    let llm = MockLlm::replying(valid_reply(
        "Creating 1500 circles",
        json!([{ "type": "bulkCreate", "parameters": { "shapeType": "circle", "count": 1500 } }]),
    ));
    let outcome = run_command(&llm, 4096, &request("create 1500 circles"))
        .await
        .unwrap();
    let CommandOutcome::Rejected { explanation, error, code } = outcome else {
        panic!("expected rejection, got {outcome:?}");
    };
    assert_eq!(explanation, "Creating 1500 circles");
    assert!(error.contains("count must be between 1 and 1000"), "{error}");
    assert_eq!(code, "E_INVALID_ACTION");
}

#[tokio::test]
async fn unknown_action_type_is_rejected() {
    let llm = MockLlm::replying(valid_reply("Exploding", json!([{ "type": "explode", "parameters": {} }])));
    let outcome = run_command(&llm, 4096, &request("explode")).await.unwrap();
    assert!(matches!(outcome, CommandOutcome::Rejected { code: "E_UNKNOWN_ACTION", .. }));
}

#[tokio::test]
async fn one_bad_action_discards_the_whole_list() {
    let llm = MockLlm::replying(valid_reply(
        "Two shapes",
        json!([
            { "type": "createCircle", "parameters": { "x": 10, "y": 10, "radius": 20 } },
            { "type": "createCircle", "parameters": { "x": 10, "y": 10, "radius": 900 } }
        ]),
    ));
    let outcome = run_command(&llm, 4096, &request("two circles")).await.unwrap();
    assert!(matches!(outcome, CommandOutcome::Rejected { .. }));
}

#[tokio::test]
async fn text_only_reply_is_invalid_output() {
    let llm = MockLlm::new(vec![Ok(text_response("I cannot do that"))]);
    let outcome = run_command(&llm, 4096, &request("draw")).await.unwrap();
    assert_eq!(
        outcome,
        CommandOutcome::Rejected {
            explanation: "I cannot do that".into(),
            error: INVALID_MODEL_OUTPUT.into(),
            code: "E_INVALID_MODEL_OUTPUT",
        }
    );
}

#[tokio::test]
async fn malformed_tool_input_is_invalid_output() {
    let llm = MockLlm::replying(json!({ "explanation": "missing flag" }));
    let outcome = run_command(&llm, 4096, &request("draw")).await.unwrap();
    assert!(matches!(outcome, CommandOutcome::Rejected { code: "E_INVALID_MODEL_OUTPUT", .. }));
}

// =============================================================================
// run_command — hard failures
// =============================================================================

#[tokio::test]
async fn rate_limit_propagates() {
    let llm = MockLlm::failing(LlmError::ApiResponse { status: 429, body: "slow down".into() });
    let err = run_command(&llm, 4096, &request("draw")).await.unwrap_err();
    assert!(err.is_rate_limited());
    assert_eq!(err.error_code(), "E_RATE_LIMITED");
    assert!(err.retryable());
}

#[tokio::test]
async fn provider_failure_propagates() {
    let llm = MockLlm::failing(LlmError::ApiResponse { status: 400, body: "bad".into() });
    let err = run_command(&llm, 4096, &request("draw")).await.unwrap_err();
    assert!(!err.is_rate_limited());
    assert_eq!(err.error_code(), "E_LLM_ERROR");
    assert_eq!(err.to_string(), "AI service error: API response error: status 400");
}

#[test]
fn not_configured_error_code() {
    let err = CommandError::LlmNotConfigured;
    assert_eq!(err.error_code(), "E_LLM_NOT_CONFIGURED");
    assert!(!err.retryable());
}
